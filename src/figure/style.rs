use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Presentation parameters. Sizes are in typographic points (1/72 in).
// ---------------------------------------------------------------------------

/// Vertical axis range and ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YAxis {
    /// Fixed lower bound. When absent the axis starts at zero, or below the
    /// smallest observation if any value is negative.
    pub min: Option<f64>,
    /// Fixed upper bound. When absent the bound is `global max × headroom`.
    pub max: Option<f64>,
    pub headroom: f64,
    /// Distance between ticks. When absent a "nice" step is chosen.
    pub tick_step: Option<f64>,
    /// First tick; defaults to `min`.
    pub tick_start: Option<f64>,
}

impl Default for YAxis {
    fn default() -> Self {
        YAxis {
            min: None,
            max: None,
            headroom: 1.15,
            tick_step: None,
            tick_start: None,
        }
    }
}

/// Vertical gap between a group's highest observation and its letter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterOffset {
    /// In data units.
    Absolute(f64),
    /// As a fraction of the largest observation over all groups.
    FractionOfGlobalMax(f64),
}

impl Default for LetterOffset {
    fn default() -> Self {
        LetterOffset::FractionOfGlobalMax(0.05)
    }
}

impl LetterOffset {
    pub fn resolve(self, global_max: f64) -> f64 {
        match self {
            LetterOffset::Absolute(v) => v,
            LetterOffset::FractionOfGlobalMax(f) => global_max * f,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureStyle {
    pub title: String,
    pub y_label: String,
    pub font_family: String,

    /// Figure size in inches.
    pub width_in: f64,
    pub height_in: f64,

    /// Box width as a fraction of the distance between groups.
    pub box_width: f64,
    pub box_alpha: f64,
    pub line_width: f64,

    /// Half-width of the uniform horizontal jitter, in group-position units.
    pub jitter: f64,
    pub jitter_seed: u64,
    pub point_size: f64,
    pub point_alpha: f64,

    pub mean_marker_size: f64,
    pub mean_alpha: f64,

    pub letter_offset: LetterOffset,
    pub letter_font_size: f64,

    /// P-value anchor in axes fractions: (1, 0) is the bottom-right corner of
    /// the plotting area, negative `y` is below the x axis.
    pub p_value_position: (f64, f64),
    pub p_value_font_size: f64,

    pub title_font_size: f64,
    pub label_font_size: f64,
    pub tick_font_size: f64,

    pub y_axis: YAxis,
}

impl Default for FigureStyle {
    fn default() -> Self {
        FigureStyle {
            title: String::new(),
            y_label: String::new(),
            font_family: String::from("serif"),
            width_in: 6.0,
            height_in: 6.0,
            box_width: 0.8,
            box_alpha: 0.5,
            line_width: 1.0,
            jitter: 0.15,
            jitter_seed: 0,
            point_size: 5.0,
            point_alpha: 0.6,
            mean_marker_size: 7.5,
            mean_alpha: 0.7,
            letter_offset: LetterOffset::default(),
            letter_font_size: 12.0,
            p_value_position: (1.0, -0.12),
            p_value_font_size: 10.0,
            title_font_size: 14.0,
            label_font_size: 13.0,
            tick_font_size: 11.0,
            y_axis: YAxis::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_style_fills_defaults() {
        let style: FigureStyle = serde_json::from_str(
            r#"{"title": "GFP Intensity by Morph", "box_width": 0.6,
                "letter_offset": {"absolute": 5.0}, "y_axis": {"max": 85.0}}"#,
        )
        .unwrap();
        assert_eq!(style.box_width, 0.6);
        assert_eq!(style.jitter, 0.15);
        assert_eq!(style.letter_offset, LetterOffset::Absolute(5.0));
        assert_eq!(style.y_axis.max, Some(85.0));
        assert_eq!(style.y_axis.headroom, 1.15);
    }

    #[test]
    fn letter_offset_resolution() {
        assert_eq!(LetterOffset::Absolute(5.0).resolve(60.0), 5.0);
        assert!((LetterOffset::default().resolve(0.8) - 0.04).abs() < 1e-12);
    }
}
