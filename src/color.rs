use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::error::RenderError;

/// Matplotlib "tab10" green / orange / red used for the HF / PF / NF morphs.
pub const HF_GREEN: &str = "#2ca02c";
pub const PF_ORANGE: &str = "#ff7f0e";
pub const NF_RED: &str = "#d62728";

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Parse `#rrggbb` (or `rrggbb`) into a plotters colour.
pub fn parse_hex(group: &str, value: &str) -> Result<RGBColor, RenderError> {
    let rgb: Srgb<u8> = value.parse().map_err(|_| RenderError::InvalidColor {
        group: group.to_string(),
        value: value.to_string(),
    })?;
    Ok(RGBColor(rgb.red, rgb.green, rgb.blue))
}

// ---------------------------------------------------------------------------
// Group palette: group label → RGBColor
// ---------------------------------------------------------------------------

/// Maps each plotted group to its fill colour.
#[derive(Debug, Clone)]
pub struct GroupPalette {
    mapping: BTreeMap<String, RGBColor>,
    default_color: RGBColor,
}

impl GroupPalette {
    /// Build the palette for `order`. Groups with a configured hex colour use
    /// it; the rest take evenly spaced hues by their position in `order`.
    pub fn new(order: &[String], configured: &BTreeMap<String, String>) -> Result<Self, RenderError> {
        let generated = generate_palette(order.len());
        let mut mapping = BTreeMap::new();
        for (label, fallback) in order.iter().zip(generated) {
            let color = match configured.get(label) {
                Some(hex) => parse_hex(label, hex)?,
                None => fallback,
            };
            mapping.insert(label.clone(), color);
        }

        Ok(GroupPalette {
            mapping,
            default_color: RGBColor(128, 128, 128),
        })
    }

    /// Look up the colour for a given group.
    pub fn color_for(&self, group: &str) -> RGBColor {
        self.mapping.get(group).copied().unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(3).len(), 3);
    }

    #[test]
    fn parses_morph_colours() {
        assert_eq!(parse_hex("HF", HF_GREEN).unwrap(), RGBColor(0x2c, 0xa0, 0x2c));
        assert_eq!(parse_hex("NF", "d62728").unwrap(), RGBColor(0xd6, 0x27, 0x28));
        assert!(matches!(
            parse_hex("PF", "orange"),
            Err(RenderError::InvalidColor { group, .. }) if group == "PF"
        ));
    }

    #[test]
    fn configured_colours_win_over_generated() {
        let order = vec!["HF".to_string(), "XX".to_string()];
        let configured = BTreeMap::from([("HF".to_string(), HF_GREEN.to_string())]);
        let palette = GroupPalette::new(&order, &configured).unwrap();

        assert_eq!(palette.color_for("HF"), RGBColor(0x2c, 0xa0, 0x2c));
        assert_eq!(palette.color_for("XX"), generate_palette(2)[1]);
        assert_eq!(palette.color_for("nope"), RGBColor(128, 128, 128));
    }
}
