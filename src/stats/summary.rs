use log::warn;

use crate::data::model::Dataset;
use crate::error::StatisticsError;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Per-group value partition
// ---------------------------------------------------------------------------

/// Values of a dataset split by group label, in a fixed display order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedValues {
    groups: Vec<(String, Vec<f64>)>,
}

impl GroupedValues {
    /// Partition the complete rows of `dataset` by label, following `order`.
    ///
    /// Labels in `order` without any rows yield an empty group. Labels present
    /// in the data but absent from `order` are not plotted and are only logged.
    pub fn partition(dataset: &Dataset, order: &[String]) -> Self {
        let mut groups: Vec<(String, Vec<f64>)> =
            order.iter().map(|label| (label.clone(), Vec::new())).collect();
        let mut ignored = 0usize;

        for obs in dataset.observations.iter().filter(|o| o.is_complete()) {
            let (Some(label), Some(value)) = (obs.group.as_deref(), obs.value) else {
                continue;
            };
            match groups.iter_mut().find(|(l, _)| l == label) {
                Some((_, values)) => values.push(value),
                None => ignored += 1,
            }
        }
        if ignored > 0 {
            warn!("{ignored} row(s) belong to groups outside the display order and are ignored");
        }
        GroupedValues { groups }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(l, _)| l.as_str())
    }

    pub fn values(&self, label: &str) -> Option<&[f64]> {
        self.groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.groups.iter().map(|(l, v)| (l.as_str(), v.as_slice()))
    }

    /// Summaries for every group, in display order. Fails on the first empty group.
    pub fn summaries(&self) -> Result<Vec<GroupSummary>, StatisticsError> {
        self.iter()
            .map(|(label, values)| GroupSummary::from_values(label, values))
            .collect()
    }

    /// Largest value over all groups.
    pub fn global_max(&self) -> Option<f64> {
        self.groups
            .iter()
            .flat_map(|(_, v)| v.iter().copied())
            .reduce(f64::max)
    }
}

// ---------------------------------------------------------------------------
// GroupSummary
// ---------------------------------------------------------------------------

/// Descriptive statistics of one group, enough to draw a box and its annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub label: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
}

impl GroupSummary {
    pub fn from_values(label: &str, values: &[f64]) -> Result<Self, StatisticsError> {
        let mean = mean(label, values)?;
        let sorted = sorted(values);
        // Non-empty: `mean` already rejected the empty case.
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        Ok(GroupSummary {
            label: label.to_string(),
            count: values.len(),
            mean,
            min,
            max,
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            lower_whisker: lower_whisker_sorted(&sorted),
            upper_whisker: upper_whisker_sorted(&sorted),
        })
    }
}

// ---------------------------------------------------------------------------
// Scalar statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean. An empty group has no mean and is reported as such.
pub fn mean(label: &str, values: &[f64]) -> Result<f64, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptyGroup(label.to_string()));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance (n − 1 denominator). Requires at least two values.
pub fn sample_variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

/// Quantile with linear interpolation between closest ranks.
/// Returns `None` for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(quantile_sorted(&sorted(values), q))
}

/// Largest observation within `Q3 + 1.5·IQR`, never below Q3.
pub fn upper_whisker(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(upper_whisker_sorted(&sorted(values)))
}

/// Smallest observation within `Q1 − 1.5·IQR`, never above Q1.
pub fn lower_whisker(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(lower_whisker_sorted(&sorted(values)))
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}

fn upper_whisker_sorted(sorted: &[f64]) -> f64 {
    let q1 = quantile_sorted(sorted, 0.25);
    let q3 = quantile_sorted(sorted, 0.75);
    let fence = q3 + WHISKER_IQR_FACTOR * (q3 - q1);
    sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= fence)
        .map_or(q3, |w| w.max(q3))
}

fn lower_whisker_sorted(sorted: &[f64]) -> f64 {
    let q1 = quantile_sorted(sorted, 0.25);
    let q3 = quantile_sorted(sorted, 0.75);
    let fence = q1 - WHISKER_IQR_FACTOR * (q3 - q1);
    sorted
        .iter()
        .copied()
        .find(|v| *v >= fence)
        .map_or(q1, |w| w.min(q1))
}
