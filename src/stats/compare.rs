use log::debug;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::summary::{mean, sample_variance, GroupedValues};
use crate::error::StatisticsError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Variance assumption of the two-sample t-test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    /// Student's test with pooled variance.
    #[default]
    Equal,
    /// Welch's test.
    Unequal,
}

/// Where the p-value shown on the figure comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Independent two-sample t-test between two groups of the dataset.
    TTest {
        groups: [String; 2],
        #[serde(default)]
        variance: Variance,
    },
    /// A p-value computed by an external tool (e.g. a one-way ANOVA in JMP).
    External { p_value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMethod {
    Student,
    Welch,
    External,
}

/// Test statistic (when computed here) and two-sided p-value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub method: ComparisonMethod,
    pub statistic: Option<f64>,
    pub df: Option<f64>,
    pub p_value: f64,
}

impl Comparison {
    pub fn evaluate(&self, grouped: &GroupedValues) -> Result<ComparisonResult, StatisticsError> {
        match self {
            Comparison::TTest { groups: [a, b], variance } => {
                let xs = grouped
                    .values(a)
                    .ok_or_else(|| StatisticsError::UnknownGroup(a.clone()))?;
                let ys = grouped
                    .values(b)
                    .ok_or_else(|| StatisticsError::UnknownGroup(b.clone()))?;
                two_sample_t_test((a.as_str(), xs), (b.as_str(), ys), *variance)
            }
            Comparison::External { p_value } => {
                if !(0.0..=1.0).contains(p_value) {
                    return Err(StatisticsError::InvalidPValue(*p_value));
                }
                Ok(ComparisonResult {
                    method: ComparisonMethod::External,
                    statistic: None,
                    df: None,
                    p_value: *p_value,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Two-sample t-test
// ---------------------------------------------------------------------------

/// Independent two-sample t-test of `a` against `b`, two-sided.
///
/// The statistic is positive when `a` has the larger mean. Each sample needs
/// at least two values.
pub fn two_sample_t_test(
    (label_a, a): (&str, &[f64]),
    (label_b, b): (&str, &[f64]),
    variance: Variance,
) -> Result<ComparisonResult, StatisticsError> {
    for (label, values) in [(label_a, a), (label_b, b)] {
        if values.len() < 2 {
            return Err(StatisticsError::InsufficientObservations {
                group: label.to_string(),
                n: values.len(),
                required: 2,
            });
        }
    }

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(label_a, a)?, mean(label_b, b)?);
    let (v1, v2) = (sample_variance(a, m1), sample_variance(b, m2));

    let (se, df, method) = match variance {
        Variance::Equal => {
            let df = n1 + n2 - 2.0;
            let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
            ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df, ComparisonMethod::Student)
        }
        Variance::Unequal => {
            let (s1, s2) = (v1 / n1, v2 / n2);
            let df = (s1 + s2).powi(2) / (s1.powi(2) / (n1 - 1.0) + s2.powi(2) / (n2 - 1.0));
            ((s1 + s2).sqrt(), df, ComparisonMethod::Welch)
        }
    };

    if se == 0.0 || !se.is_finite() {
        return Err(StatisticsError::DegenerateVariance);
    }

    let t = (m1 - m2) / se;
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatisticsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);

    debug!("{method:?} t-test {label_a} vs {label_b}: t = {t:.4}, df = {df:.2}, p = {p_value:.6}");

    Ok(ComparisonResult {
        method,
        statistic: Some(t),
        df: Some(df),
        p_value,
    })
}
