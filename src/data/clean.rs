use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Cleaning options
// ---------------------------------------------------------------------------

/// Rows to drop before any statistic is computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Keys (e.g. sample numbers) excluded from the analysis.
    #[serde(default)]
    pub exclude_keys: BTreeSet<CellValue>,
}

impl CleanOptions {
    pub fn excluding<I: IntoIterator<Item = CellValue>>(keys: I) -> Self {
        CleanOptions {
            exclude_keys: keys.into_iter().map(|k| k.normalized()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cleaning steps
// ---------------------------------------------------------------------------

/// Exclude keys, trim group labels, then drop incomplete rows.
///
/// Never reorders rows and never adds any; applying it twice is the same as
/// applying it once.
pub fn clean(dataset: &Dataset, options: &CleanOptions) -> Dataset {
    let mut out = dataset.clone();
    let before = out.len();

    exclude_keys(&mut out, &options.exclude_keys);
    let after_exclude = out.len();

    normalize_labels(&mut out);

    drop_incomplete(&mut out);
    let after_drop = out.len();

    debug!(
        "cleaning: {before} rows, {} excluded by key, {} incomplete, {after_drop} kept",
        before - after_exclude,
        after_exclude - after_drop
    );
    out
}

/// Remove rows whose key is in `excluded`. Rows without a key are kept.
pub fn exclude_keys(dataset: &mut Dataset, excluded: &BTreeSet<CellValue>) {
    if excluded.is_empty() {
        return;
    }
    let excluded: BTreeSet<CellValue> = excluded.iter().map(|k| k.normalized()).collect();
    dataset.observations.retain(|o| match &o.key {
        Some(key) => !excluded.contains(&key.normalized()),
        None => true,
    });
}

/// Strip leading and trailing whitespace from group labels.
pub fn normalize_labels(dataset: &mut Dataset) {
    for obs in &mut dataset.observations {
        if let Some(group) = obs.group.as_mut() {
            let trimmed = group.trim();
            if trimmed.len() != group.len() {
                *group = trimmed.to_string();
            }
        }
    }
}

/// Remove rows missing the measurement or the group label.
pub fn drop_incomplete(dataset: &mut Dataset) {
    dataset.observations.retain(|o| o.is_complete());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnMap, Observation};

    fn dataset(observations: Vec<Observation>) -> Dataset {
        Dataset {
            columns: ColumnMap {
                value: "Volume mm³".into(),
                group: "morph".into(),
                key: Some("no".into()),
            },
            observations,
        }
    }

    fn messy() -> Dataset {
        dataset(vec![
            Observation::new("HF ", 0.41).with_key(CellValue::Integer(101)),
            Observation::new(" NF", 0.22).with_key(CellValue::Integer(135)),
            Observation {
                value: None,
                group: Some("HF".into()),
                key: Some(CellValue::Integer(102)),
            },
            Observation::new("NF", 0.31).with_key(CellValue::Float(148.0)),
            Observation {
                value: Some(0.5),
                group: None,
                key: Some(CellValue::Integer(103)),
            },
            Observation::new("\tNF\t", 0.29).with_key(CellValue::Integer(104)),
            Observation::new("HF", f64::NAN).with_key(CellValue::Integer(105)),
        ])
    }

    fn options() -> CleanOptions {
        CleanOptions::excluding([CellValue::Integer(135), CellValue::Integer(148)])
    }

    #[test]
    fn applies_all_three_steps_in_order() {
        let cleaned = clean(&messy(), &options());
        let groups: Vec<&str> = cleaned
            .observations
            .iter()
            .map(|o| o.group.as_deref().unwrap())
            .collect();
        let keys: Vec<CellValue> = cleaned
            .observations
            .iter()
            .map(|o| o.key.clone().unwrap())
            .collect();

        assert_eq!(groups, vec!["HF", "NF"]);
        assert_eq!(keys, vec![CellValue::Integer(101), CellValue::Integer(104)]);
    }

    #[test]
    fn float_keys_match_integer_exclusions() {
        let mut ds = dataset(vec![Observation::new("NF", 0.3).with_key(CellValue::Float(148.0))]);
        exclude_keys(&mut ds, &options().exclude_keys);
        assert!(ds.is_empty());
    }

    #[test]
    fn is_idempotent() {
        let once = clean(&messy(), &options());
        let twice = clean(&once, &options());
        assert_eq!(once, twice);
    }

    #[test]
    fn never_grows_and_keeps_relative_order() {
        let input = messy();
        let cleaned = clean(&input, &CleanOptions::default());
        assert!(cleaned.len() <= input.len());

        // Surviving rows appear in the input in the same relative order.
        let input_keys: Vec<CellValue> = input.observations.iter().filter_map(|o| o.key.clone()).collect();
        let positions: Vec<usize> = cleaned
            .observations
            .iter()
            .map(|o| {
                let key = o.key.as_ref().unwrap();
                input_keys.iter().position(|k| k == key).unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_result_is_valid() {
        let ds = dataset(vec![Observation {
            value: None,
            group: None,
            key: None,
        }]);
        assert!(clean(&ds, &CleanOptions::default()).is_empty());
    }
}
