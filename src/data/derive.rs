use std::collections::BTreeMap;

use log::debug;

use super::model::{CellValue, Dataset};
use crate::error::StatisticsError;

/// Replace every value by its share (in percent) of the total for its key.
///
/// For the release counts this turns "planulae released by colony A as HF"
/// into "percent of colony A's release that was HF". Only complete rows are
/// considered; run [`clean`](super::clean::clean) first.
pub fn percent_of_key_total(dataset: &Dataset) -> Result<Dataset, StatisticsError> {
    let mut totals: BTreeMap<CellValue, f64> = BTreeMap::new();
    for (row, obs) in dataset.observations.iter().enumerate() {
        let Some(value) = obs.value else { continue };
        let key = obs.key.as_ref().ok_or(StatisticsError::MissingKey(row))?;
        *totals.entry(key.normalized()).or_insert(0.0) += value;
    }

    if let Some((key, _)) = totals.iter().find(|(_, total)| **total == 0.0) {
        return Err(StatisticsError::ZeroKeyTotal(key.to_string()));
    }
    debug!("per-key totals: {totals:?}");

    let mut out = dataset.clone();
    for obs in &mut out.observations {
        if let (Some(value), Some(key)) = (obs.value.as_mut(), obs.key.as_ref()) {
            // Every complete row contributed to `totals` above.
            if let Some(total) = totals.get(&key.normalized()) {
                *value = *value / total * 100.0;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColumnMap, Observation};

    fn release(rows: &[(&str, &str, f64)]) -> Dataset {
        Dataset {
            columns: ColumnMap {
                value: "Total Release".into(),
                group: "Morph".into(),
                key: Some("Colony".into()),
            },
            observations: rows
                .iter()
                .map(|(colony, morph, v)| {
                    Observation::new(morph, *v).with_key(CellValue::String(colony.to_string()))
                })
                .collect(),
        }
    }

    #[test]
    fn shares_sum_to_one_hundred_per_key() {
        let ds = release(&[
            ("A", "HF", 199.0),
            ("A", "PF", 164.0),
            ("A", "NF", 30.0),
            ("B", "HF", 23.0),
            ("B", "PF", 22.0),
            ("B", "NF", 13.0),
        ]);
        let pct = percent_of_key_total(&ds).unwrap();

        for colony in ["A", "B"] {
            let sum: f64 = pct
                .observations
                .iter()
                .filter(|o| o.key == Some(CellValue::String(colony.into())))
                .filter_map(|o| o.value)
                .sum();
            assert!((sum - 100.0).abs() < 1e-9, "colony {colony} sums to {sum}");
        }
        assert!((pct.observations[0].value.unwrap() - 199.0 / 393.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_is_an_error() {
        let ds = release(&[("A", "HF", 0.0), ("A", "NF", 0.0)]);
        assert!(matches!(
            percent_of_key_total(&ds),
            Err(StatisticsError::ZeroKeyTotal(k)) if k == "A"
        ));
    }

    #[test]
    fn rows_without_key_are_an_error() {
        let mut ds = release(&[("A", "HF", 1.0)]);
        ds.observations[0].key = None;
        assert!(matches!(percent_of_key_total(&ds), Err(StatisticsError::MissingKey(0))));
    }
}
