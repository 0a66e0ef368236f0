use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Opacity of the detection band fill (0.2 of full).
const BAND_ALPHA: u8 = 51;

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

/// Fixed colours for the elements of the built-in line table.
fn builtin_color(id: &str) -> Option<Color32> {
    match id {
        "Hidrogeno" => Some(Color32::RED),
        "Helio" => Some(Color32::YELLOW),
        "Sodio" => Some(Color32::from_rgb(255, 165, 0)),
        "Calcio" => Some(Color32::BLUE),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Element → colour
// ---------------------------------------------------------------------------

/// One colour per element, shared by bands, bars and progress indicators.
#[derive(Debug, Clone)]
pub struct ElementColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ElementColors {
    /// Built-in elements keep their fixed colour; any other element gets a
    /// generated hue.
    pub fn new<S: AsRef<str>>(ids: &[S]) -> Self {
        let unknown: Vec<&str> = ids
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| builtin_color(id).is_none())
            .collect();
        let palette = generate_palette(unknown.len());

        let mut mapping: BTreeMap<String, Color32> = unknown
            .iter()
            .zip(palette)
            .map(|(id, c)| (id.to_string(), c))
            .collect();
        for id in ids.iter().map(|id| id.as_ref()) {
            if let Some(c) = builtin_color(id) {
                mapping.insert(id.to_string(), c);
            }
        }

        ElementColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, id: &str) -> Color32 {
        self.mapping
            .get(id)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Translucent variant for highlighted wavelength bands.
    pub fn band_fill(&self, id: &str) -> Color32 {
        let [r, g, b, _] = self.color_for(id).to_array();
        Color32::from_rgba_unmultiplied(r, g, b, BAND_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_elements_keep_their_colours() {
        let colors = ElementColors::new(&["Hidrogeno", "Calcio"]);
        assert_eq!(colors.color_for("Hidrogeno"), Color32::RED);
        assert_eq!(colors.color_for("Calcio"), Color32::BLUE);
    }

    #[test]
    fn other_elements_get_distinct_generated_colours() {
        let colors = ElementColors::new(&["Litio", "Argon", "Sodio"]);
        let litio = colors.color_for("Litio");
        let argon = colors.color_for("Argon");
        assert_ne!(litio, argon);
        assert_ne!(litio, Color32::GRAY);
        assert_eq!(colors.color_for("Sodio"), Color32::from_rgb(255, 165, 0));
        assert_eq!(colors.color_for("Xenon"), Color32::GRAY);
    }

    #[test]
    fn band_fill_is_translucent() {
        let colors = ElementColors::new(&["Hidrogeno"]);
        assert_eq!(colors.band_fill("Hidrogeno").a(), BAND_ALPHA);
    }
}
