use eframe::egui::{self, emath::Numeric, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::AwardType;
use crate::data::model::{Award, InclusiveRange, COL_GDP, COL_HOUSEHOLD};
use crate::state::{AppState, AwardMode};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let (Some(dataset), Some(panel)) = (&state.dataset, &mut state.panel) else {
        ui.label("No dataset loaded.");
        return;
    };
    let gdp_bounds = dataset.gdp_bounds();
    let household_bounds = dataset.household_bounds();
    let price_bounds = dataset.price_bounds();
    let mut reset = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Name");
            ui.text_edit_singleline(&mut panel.name);
            ui.strong("Country");
            ui.text_edit_singleline(&mut panel.country);
            ui.separator();

            // ---- Award selection ----
            ui.strong("Award");
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut panel.award_mode, AwardMode::Labels, "By label");
                ui.radio_value(&mut panel.award_mode, AwardMode::ByType, "By type");
            });
            match panel.award_mode {
                AwardMode::Labels => {
                    for award in Award::ALL {
                        let mut checked = panel.awards.contains(&award);
                        if ui.checkbox(&mut checked, award.label()).changed() {
                            if checked {
                                panel.awards.insert(award);
                            } else {
                                panel.awards.remove(&award);
                            }
                        }
                    }
                }
                AwardMode::ByType => {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.radio_value(&mut panel.award_type, AwardType::Stars, "Stars");
                        ui.radio_value(
                            &mut panel.award_type,
                            AwardType::BibGourmand,
                            "Bib Gourmand",
                        );
                    });
                    if panel.award_type == AwardType::Stars {
                        ui.horizontal(|ui: &mut Ui| {
                            for stars in 1..=3u8 {
                                let mut checked = panel.star_counts.contains(&stars);
                                let label = "★".repeat(stars as usize);
                                if ui.checkbox(&mut checked, label).changed() {
                                    if checked {
                                        panel.star_counts.insert(stars);
                                    } else {
                                        panel.star_counts.remove(&stars);
                                    }
                                }
                            }
                        });
                    }
                }
            }
            ui.separator();

            // ---- Numeric ranges ----
            ui.checkbox(&mut panel.price_enabled, RichText::new("Price").strong());
            ui.add_enabled_ui(panel.price_enabled, |ui: &mut Ui| {
                range_sliders(ui, &mut panel.price, price_bounds, false);
            });
            ui.separator();

            if let (Some(range), Some(bounds)) = (panel.gdp.as_mut(), gdp_bounds) {
                ui.strong(COL_GDP);
                range_sliders(ui, range, bounds, false);
                ui.separator();
            }
            if let (Some(range), Some(bounds)) = (panel.household.as_mut(), household_bounds) {
                ui.strong(COL_HOUSEHOLD);
                range_sliders(ui, range, bounds, true);
                ui.separator();
            }

            reset = ui.button("Reset").clicked();
        });

    if reset {
        state.reset_filters();
    }
    // Re-run the pipeline only when a widget actually changed.
    state.refresh();
}

/// Two sliders editing an inclusive range, kept ordered.
fn range_sliders<T: Numeric>(
    ui: &mut Ui,
    range: &mut InclusiveRange<T>,
    bounds: InclusiveRange<T>,
    logarithmic: bool,
) {
    let span = bounds.min..=bounds.max;
    if ui
        .add(Slider::new(&mut range.min, span.clone()).text("min").logarithmic(logarithmic))
        .changed()
        && range.min > range.max
    {
        range.max = range.min;
    }
    if ui
        .add(Slider::new(&mut range.max, span).text("max").logarithmic(logarithmic))
        .changed()
        && range.max < range.min
    {
        range.min = range.max;
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state
                .analysis
                .as_ref()
                .is_some_and(|a| a.report().is_some());
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = &state.data_path {
            ui.label(RichText::new(path.display().to_string()).monospace());
        }

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} restaurants loaded, {} visible",
                ds.len(),
                state.visible_count()
            ));
            if ds.dropped_rows > 0 {
                ui.label(
                    RichText::new(format!("({} without indicators skipped)", ds.dropped_rows))
                        .weak(),
                );
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open restaurant data")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export country summary")
        .add_filter("JSON", &["json"])
        .set_file_name("michelin_summary.json")
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}
