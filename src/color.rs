use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

/// Hue step between consecutive categories, the golden angle in degrees.
const HUE_STEP: f32 = 137.508;

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

/// `n` distinct colours; hues advance by the golden angle starting from blue.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (210.0 + i as f32 * HUE_STEP) % 360.0;
            let rgb = Srgb::from_color(Hsl::new(hue, 0.65, 0.5)).into_format::<u8>();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of one categorical column to distinct colours.
///
/// Built from the full session table so a category keeps its colour while
/// filters come and go.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
