use log::debug;
use plotters::style::RGBColor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::annotate::{format_p_value, y_range, y_ticks};
use super::style::FigureStyle;
use crate::color::GroupPalette;
use crate::error::{PipelineError, StatisticsError};
use crate::stats::{ComparisonResult, GroupSummary, GroupedValues, SignificanceLetters};

// ---------------------------------------------------------------------------
// Figure – a declarative scene, independent of any drawing backend
// ---------------------------------------------------------------------------

/// Everything drawn for one group at ordinal position `position`.
#[derive(Debug, Clone)]
pub struct GroupLayer {
    pub position: f64,
    pub color: RGBColor,
    pub summary: GroupSummary,
    /// Jittered observations in data coordinates.
    pub points: Vec<(f64, f64)>,
    /// Letter text and its baseline height in data units.
    pub letter: Option<(String, f64)>,
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub style: FigureStyle,
    pub groups: Vec<GroupLayer>,
    pub y_range: (f64, f64),
    pub y_ticks: Vec<f64>,
    pub p_value_text: String,
}

impl Figure {
    pub fn x_range(&self) -> (f64, f64) {
        (-0.5, self.groups.len() as f64 - 0.5)
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Lay out boxes, jittered points, mean markers, letters and the p-value for
/// the groups of `grouped`, in its display order.
///
/// `letters` is optional; when given, every group must have one.
pub fn compose(
    grouped: &GroupedValues,
    comparison: &ComparisonResult,
    letters: Option<&SignificanceLetters>,
    palette: &GroupPalette,
    style: &FigureStyle,
) -> Result<Figure, PipelineError> {
    let summaries = grouped.summaries()?;
    let global_max = summaries
        .iter()
        .map(|s| s.max)
        .reduce(f64::max)
        .ok_or_else(|| StatisticsError::EmptyGroup(String::from("<no groups>")))?;
    let global_min = summaries.iter().map(|s| s.min).fold(global_max, f64::min);

    let y_range = y_range(&style.y_axis, (global_min, global_max))?;
    let y_ticks = y_ticks(&style.y_axis, y_range)?;
    let letter_offset = style.letter_offset.resolve(global_max.abs());

    let mut rng = StdRng::seed_from_u64(style.jitter_seed);
    let jitter = style.jitter.abs();

    let mut groups = Vec::with_capacity(summaries.len());
    for (i, ((label, values), summary)) in grouped.iter().zip(summaries).enumerate() {
        let position = i as f64;
        let points = values
            .iter()
            .map(|&v| (position + rng.random_range(-jitter..=jitter), v))
            .collect();

        let letter = letters
            .map(|l| l.letter_for(label))
            .transpose()?
            .map(|text| (text.to_string(), summary.max + letter_offset));

        debug!(
            "group {label}: n = {}, mean = {:.4}, whiskers = [{:.4}, {:.4}]",
            summary.count, summary.mean, summary.lower_whisker, summary.upper_whisker
        );

        groups.push(GroupLayer {
            position,
            color: palette.color_for(label),
            summary,
            points,
            letter,
        });
    }

    Ok(Figure {
        style: style.clone(),
        groups,
        y_range,
        y_ticks,
        p_value_text: format_p_value(comparison.p_value),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::{ColumnMap, Dataset, Observation};
    use crate::error::RenderError;
    use crate::stats::ComparisonMethod;
    use crate::figure::style::LetterOffset;

    fn grouped(rows: &[(&str, f64)]) -> GroupedValues {
        let ds = Dataset {
            columns: ColumnMap {
                value: "v".into(),
                group: "g".into(),
                key: None,
            },
            observations: rows.iter().map(|(g, v)| Observation::new(g, *v)).collect(),
        };
        GroupedValues::partition(&ds, &["HF".to_string(), "NF".to_string()])
    }

    fn external(p: f64) -> ComparisonResult {
        ComparisonResult {
            method: ComparisonMethod::External,
            statistic: None,
            df: None,
            p_value: p,
        }
    }

    fn palette() -> GroupPalette {
        GroupPalette::new(&["HF".to_string(), "NF".to_string()], &BTreeMap::new()).unwrap()
    }

    #[test]
    fn letters_sit_above_each_group_maximum() {
        let g = grouped(&[("HF", 0.5), ("HF", 0.7), ("NF", 0.3), ("NF", 0.9)]);
        let letters = SignificanceLetters::new().with("HF", "a").with("NF", "a");
        let fig = compose(&g, &external(1.0), Some(&letters), &palette(), &FigureStyle::default()).unwrap();

        let (text, y) = fig.groups[0].letter.clone().unwrap();
        assert_eq!(text, "a");
        assert!((y - (0.7 + 0.9 * 0.05)).abs() < 1e-12);
        let (_, y) = fig.groups[1].letter.clone().unwrap();
        assert!((y - (0.9 + 0.9 * 0.05)).abs() < 1e-12);

        assert_eq!(fig.p_value_text, "p = 1.0000");
        assert!((fig.y_range.1 - 0.9 * 1.15).abs() < 1e-12);
        assert_eq!(fig.x_range(), (-0.5, 1.5));
    }

    #[test]
    fn jitter_stays_in_band_and_is_reproducible() {
        let g = grouped(&[("HF", 1.0), ("HF", 2.0), ("HF", 3.0), ("NF", 1.5), ("NF", 2.5)]);
        let style = FigureStyle::default();
        let a = compose(&g, &external(0.5), None, &palette(), &style).unwrap();
        let b = compose(&g, &external(0.5), None, &palette(), &style).unwrap();

        for layer in &a.groups {
            assert!(layer.letter.is_none());
            for (x, _) in &layer.points {
                assert!((x - layer.position).abs() <= style.jitter);
            }
        }
        assert_eq!(a.groups[1].points, b.groups[1].points);
        assert_eq!(a.groups[0].points.iter().map(|p| p.1).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn absolute_letter_offset() {
        let g = grouped(&[("HF", 40.0), ("NF", 20.0)]);
        let style = FigureStyle {
            letter_offset: LetterOffset::Absolute(5.0),
            ..FigureStyle::default()
        };
        let letters = SignificanceLetters::new().with("HF", "a").with("NF", "b");
        let fig = compose(&g, &external(0.00003), Some(&letters), &palette(), &style).unwrap();
        assert_eq!(fig.groups[1].letter, Some(("b".to_string(), 25.0)));
        assert_eq!(fig.p_value_text, "p < 0.0001");
    }

    #[test]
    fn missing_letter_or_empty_group_fails() {
        let g = grouped(&[("HF", 0.5), ("NF", 0.4)]);
        let letters = SignificanceLetters::new().with("HF", "a");
        let err = compose(&g, &external(0.5), Some(&letters), &palette(), &FigureStyle::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Render(RenderError::MissingLetter(g)) if g == "NF"));

        let g = grouped(&[("HF", 0.5)]);
        let err = compose(&g, &external(0.5), None, &palette(), &FigureStyle::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Statistics(StatisticsError::EmptyGroup(g)) if g == "NF"));
    }

    #[test]
    fn negative_values_stay_inside_the_axis() {
        let g = grouped(&[("HF", -1.0), ("HF", 2.0), ("NF", 3.0), ("NF", 4.0)]);
        let fig = compose(&g, &external(0.5), None, &palette(), &FigureStyle::default()).unwrap();
        let (lo, hi) = fig.y_range;
        assert!(lo < -1.0 && hi > 4.0);
        for layer in &fig.groups {
            assert!(layer.points.iter().all(|(_, y)| *y >= lo && *y <= hi));
        }
        assert!(fig.y_ticks.iter().all(|t| *t >= lo && *t <= hi));

        let g = grouped(&[("HF", -1.0), ("HF", -2.0), ("NF", -3.0), ("NF", -4.0)]);
        let fig = compose(&g, &external(0.5), None, &palette(), &FigureStyle::default()).unwrap();
        assert_eq!(fig.y_range.1, 0.0);
        assert!(fig.y_range.0 < -4.0);
    }

    #[test]
    fn all_zero_values_collapse_the_axis() {
        let g = grouped(&[("HF", 0.0), ("NF", 0.0)]);
        let err = compose(&g, &external(0.5), None, &palette(), &FigureStyle::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Render(RenderError::AxisCollapse { .. })));
    }
}
