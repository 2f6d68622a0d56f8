use eframe::egui::{self, RichText, Ui};

use crate::analysis::Outcome;
use crate::config::Args;
use crate::data::model::Indicator;
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MichelinApp {
    pub state: AppState,
}

impl MichelinApp {
    /// Build the app and try the configured dataset. A missing file leaves
    /// the app running with the error in the status line.
    pub fn new(args: &Args) -> Self {
        let mut state = AppState::default();
        state.open(&args.data);
        Self { state }
    }
}

impl eframe::App for MichelinApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central(ui, &mut self.state);
        });
    }
}

fn central(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Restaurants, "Restaurants");
        ui.selectable_value(&mut state.tab, Tab::Countries, "Countries");
        ui.selectable_value(&mut state.tab, Tab::Regression, "Regression");
        ui.selectable_value(&mut state.tab, Tab::Map, "Map");
    });
    ui.separator();

    let Some(analysis) = &state.analysis else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a restaurant table to begin  (File → Open…)");
        });
        return;
    };

    let report = match &analysis.outcome {
        Outcome::Ready(report) => report,
        Outcome::Empty => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("No restaurants match the current filters.");
            });
            return;
        }
    };

    match state.tab {
        Tab::Restaurants => {
            if analysis.unconstrained {
                ui.label(RichText::new("No filters applied").weak());
            }
            tables::restaurant_table(ui, &analysis.filtered);
        }
        Tab::Countries => tables::country_table(ui, &report.countries),
        Tab::Regression => {
            let height = ((ui.available_height() - 120.0) / 2.0).max(120.0);
            egui::ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for indicator in Indicator::ALL {
                    plot::regression_plot(ui, indicator, report.regression(indicator), height);
                    ui.add_space(8.0);
                }
            });
        }
        Tab::Map => plot::map_plot(ui, &analysis.map, &state.colors),
    }
}
