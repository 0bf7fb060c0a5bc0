use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::charts::CategoryCounts;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting from the hue of `anchor` so the first bar matches the theme.
pub fn generate_palette(n: usize, anchor: Color32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let start: Hsl = Srgb::new(anchor.r(), anchor.g(), anchor.b())
        .into_format::<f32>()
        .into_color();
    let start_hue = start.hue.into_positive_degrees();

    (0..n)
        .map(|i| {
            let hue = start_hue + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.52);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
                (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
                (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Bar colours: category label → Color32
// ---------------------------------------------------------------------------

/// One colour per category, in the same order as [`CategoryCounts::iter`].
pub fn category_colors(counts: &CategoryCounts, anchor: Color32) -> Vec<(String, Color32)> {
    counts
        .iter()
        .zip(generate_palette(counts.len(), anchor))
        .map(|((label, _), c)| (label.to_string(), c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::charts::category_counts;
    use crate::data::table::Table;

    #[test]
    fn palette_has_requested_size_and_distinct_entries() {
        let colors = generate_palette(5, Color32::from_rgb(0x3f, 0xc1, 0xc9));
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0, Color32::WHITE).is_empty());
    }

    #[test]
    fn colours_follow_category_order() {
        let table = Table::parse_str("Type\nValve\nPump\nValve\n").unwrap();
        let colors = category_colors(&category_counts(&table, "Type"), Color32::RED);
        let labels: Vec<&str> = colors.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["Valve", "Pump"]);
    }
}
