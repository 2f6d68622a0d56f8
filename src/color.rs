use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Award;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: award → Color32
// ---------------------------------------------------------------------------

/// Maps each award level to a distinct colour; unknown awards are gray.
#[derive(Debug, Clone)]
pub struct AwardColors {
    mapping: BTreeMap<Award, Color32>,
    default_color: Color32,
}

impl Default for AwardColors {
    fn default() -> Self {
        let mapping = Award::ALL
            .iter()
            .copied()
            .zip(generate_palette(Award::ALL.len()))
            .collect();
        AwardColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl AwardColors {
    pub fn color_for(&self, award: Option<Award>) -> Color32 {
        award
            .and_then(|a| self.mapping.get(&a).copied())
            .unwrap_or(self.default_color)
    }
}
