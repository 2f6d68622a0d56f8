use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{
    CountrySummary, Restaurant, COL_AWARD, COL_COUNTRY, COL_GDP, COL_HOUSEHOLD, COL_NAME,
    COL_PRICE,
};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Restaurant table (filtered rows)
// ---------------------------------------------------------------------------

pub fn restaurant_table(ui: &mut Ui, rows: &[Restaurant]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(180.0))
        .column(Column::auto().at_least(100.0))
        .columns(Column::auto(), 3)
        .column(Column::remainder())
        .header(HEADER_HEIGHT, |mut header| {
            for title in [COL_NAME, COL_COUNTRY, COL_AWARD, COL_PRICE, COL_GDP, COL_HOUSEHOLD] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui| {
                    ui.label(&r.name);
                });
                row.col(|ui| {
                    ui.label(&r.country);
                });
                row.col(|ui| {
                    ui.label(r.award.map_or(r.award_text.as_str(), |a| a.label()));
                });
                row.col(|ui| {
                    ui.label(r.price.as_deref().unwrap_or("–"));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", r.gdp_per_capita));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", r.household_spending));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Aggregated per-country table
// ---------------------------------------------------------------------------

pub fn country_table(ui: &mut Ui, countries: &[CountrySummary]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(100.0), 2)
        .column(Column::remainder())
        .header(HEADER_HEIGHT, |mut header| {
            for title in ["Country", "Restaurant_Count", "GDP_Per_Capita", "Household_Spending"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, countries.len(), |mut row| {
                let c = &countries[row.index()];
                row.col(|ui| {
                    ui.label(&c.country);
                });
                row.col(|ui| {
                    ui.label(c.restaurant_count.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", c.gdp_per_capita));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", c.household_spending));
                });
            });
        });
}
