use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::analysis::regression::{RegressionError, RegressionResult};
use crate::analysis::MapPoint;
use crate::color::AwardColors;
use crate::data::model::{Award, Indicator};

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "undefined".to_string()
    } else {
        format!("{value:.4}")
    }
}

// ---------------------------------------------------------------------------
// Regression scatter with fitted line
// ---------------------------------------------------------------------------

/// Render one indicator's regression: a stats line and the scatter plot.
pub fn regression_plot(
    ui: &mut Ui,
    indicator: Indicator,
    fit: &Result<RegressionResult, RegressionError>,
    height: f32,
) {
    ui.strong(format!("Restaurant count vs. {indicator}"));

    let result = match fit {
        Ok(result) => result,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).italics());
            return;
        }
    };

    ui.label(format!(
        "count = {:.6} · x + {:.3}    R² = {}    r = {}",
        result.slope,
        result.intercept,
        format_stat(result.r_squared),
        format_stat(result.correlation),
    ));
    if result.is_degenerate() {
        ui.label(
            RichText::new("Zero variance in one variable; R² and r are undefined.").weak(),
        );
    }

    let observed: PlotPoints = result.points.iter().map(|p| [p.x, p.y]).collect();

    Plot::new(("regression", indicator.label()))
        .height(height)
        .legend(Legend::default())
        .x_axis_label(indicator.label())
        .y_axis_label("Restaurant_Count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(observed)
                    .name("Countries")
                    .radius(4.0)
                    .color(Color32::LIGHT_BLUE),
            );
            for p in &result.points {
                plot_ui.text(
                    Text::new(PlotPoint::new(p.x, p.y), p.label.as_str())
                        .anchor(Align2::LEFT_BOTTOM),
                );
            }
            if let Some([start, end]) = result.line_span() {
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![start, end]))
                        .name("Least-squares fit")
                        .color(Color32::from_rgb(230, 90, 60))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Geographic scatter
// ---------------------------------------------------------------------------

/// Longitude/latitude scatter of the filtered restaurants, coloured by award.
pub fn map_plot(ui: &mut Ui, points: &[MapPoint], colors: &AwardColors) {
    if points.is_empty() {
        ui.label("None of the matching restaurants have coordinates.");
        return;
    }

    let groups = Award::ALL.into_iter().map(Some).chain([None]);

    Plot::new("restaurant_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|_, value| {
            nearest(points, value)
                .map(|p| format!("{}\n{:.4}, {:.4}", p.name, p.latitude, p.longitude))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for award in groups {
                let series: PlotPoints = points
                    .iter()
                    .filter(|p| p.award == award)
                    .map(|p| [p.longitude, p.latitude])
                    .collect();
                if series.points().is_empty() {
                    continue;
                }
                let name = award.map_or("Other", Award::label);
                plot_ui.points(
                    Points::new(series)
                        .name(name)
                        .color(colors.color_for(award))
                        .radius(3.0),
                );
            }
        });
}

/// Closest restaurant to the hovered plot position.
fn nearest<'a>(points: &'a [MapPoint], at: &PlotPoint) -> Option<&'a MapPoint> {
    points.iter().min_by(|a, b| {
        let da = (a.longitude - at.x).powi(2) + (a.latitude - at.y).powi(2);
        let db = (b.longitude - at.x).powi(2) + (b.latitude - at.y).powi(2);
        da.total_cmp(&db)
    })
}
