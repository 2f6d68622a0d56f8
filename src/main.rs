mod analysis;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::MichelinApp;
use clap::Parser;
use config::Args;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Michelin Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(MichelinApp::new(&args)))),
    )
}
