use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common spreadsheet dtypes.
/// Used as a `BTreeSet` key for exclusion lists, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` measurement.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Integral floats collapse to integers so that `135` and `135.0` are the
    /// same key regardless of which loader produced them.
    pub fn normalized(&self) -> CellValue {
        match self {
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                CellValue::Integer(*v as i64)
            }
            other => other.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – rectangular data as loaded, before any interpretation
// ---------------------------------------------------------------------------

/// Column names and rows in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table from an in-memory literal. Every row must match the header width.
    pub fn from_literal(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, LoadError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(LoadError::Malformed {
                    row: i,
                    column: String::from("*"),
                    reason: format!("expected {} cells, found {}", columns.len(), row.len()),
                });
            }
        }
        Ok(Table { columns, rows })
    }

    pub fn column_index(&self, name: &str) -> Result<usize, LoadError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Observation / Dataset – the projected measurement rows
// ---------------------------------------------------------------------------

/// Which table columns carry the measurement, the group label and the row key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub value: String,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// One row: a measurement, its group label and an optional identifying key.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub value: Option<f64>,
    pub group: Option<String>,
    pub key: Option<CellValue>,
}

impl Observation {
    pub fn new(group: &str, value: f64) -> Self {
        Observation {
            value: Some(value),
            group: Some(group.to_string()),
            key: None,
        }
    }

    pub fn with_key(mut self, key: CellValue) -> Self {
        self.key = Some(key);
        self
    }

    /// Whether both the measurement and the group label are present.
    pub fn is_complete(&self) -> bool {
        self.value.is_some_and(|v| !v.is_nan()) && self.group.is_some()
    }
}

/// Ordered observations sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: ColumnMap,
    pub observations: Vec<Observation>,
}

impl Dataset {
    /// Project the mapped columns out of a loaded table.
    ///
    /// Null cells become `None`. A measurement cell holding non-numeric text
    /// is a load error rather than a silently dropped row.
    pub fn from_table(table: &Table, columns: &ColumnMap) -> Result<Self, LoadError> {
        let value_idx = table.column_index(&columns.value)?;
        let group_idx = table.column_index(&columns.group)?;
        let key_idx = columns
            .key
            .as_deref()
            .map(|k| table.column_index(k))
            .transpose()?;

        let observations = table
            .rows
            .iter()
            .enumerate()
            .map(|(row_no, row)| {
                let value = match &row[value_idx] {
                    CellValue::Null => None,
                    CellValue::String(s) if s.trim().is_empty() => None,
                    cell => Some(cell.as_f64().ok_or_else(|| LoadError::Malformed {
                        row: row_no,
                        column: columns.value.clone(),
                        reason: format!("'{cell}' is not a number"),
                    })?),
                };
                let group = match &row[group_idx] {
                    CellValue::Null => None,
                    cell => Some(cell.to_string()),
                };
                let key = key_idx
                    .map(|i| &row[i])
                    .filter(|cell| !cell.is_null())
                    .cloned();
                Ok(Observation { value, group, key })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        Ok(Dataset {
            columns: columns.clone(),
            observations,
        })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Largest complete measurement, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.observations
            .iter()
            .filter(|o| o.is_complete())
            .filter_map(|o| o.value)
            .reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> ColumnMap {
        ColumnMap {
            value: "Volume".into(),
            group: "morph".into(),
            key: Some("no".into()),
        }
    }

    #[test]
    fn literal_rows_must_match_header_width() {
        let err = Table::from_literal(
            vec!["a".into(), "b".into()],
            vec![vec![CellValue::Integer(1)]],
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { row: 0, .. }));
    }

    #[test]
    fn projection_keeps_order_and_nulls() {
        let table = Table::from_literal(
            vec!["no".into(), "morph".into(), "Volume".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::String(" HF".into()), CellValue::Float(0.4)],
                vec![CellValue::Integer(2), CellValue::Null, CellValue::Float(0.5)],
                vec![CellValue::Integer(3), CellValue::String("NF".into()), CellValue::Null],
            ],
        )
        .unwrap();

        let ds = Dataset::from_table(&table, &columns()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.observations[0].group.as_deref(), Some(" HF"));
        assert_eq!(ds.observations[0].key, Some(CellValue::Integer(1)));
        assert!(ds.observations[1].group.is_none());
        assert!(ds.observations[2].value.is_none());
        assert_eq!(ds.max_value(), Some(0.4));
    }

    #[test]
    fn missing_column_is_reported() {
        let table = Table::from_literal(vec!["morph".into(), "Volume".into()], vec![]).unwrap();
        let err = Dataset::from_table(&table, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "no"));
    }

    #[test]
    fn non_numeric_measurement_is_malformed() {
        let table = Table::from_literal(
            vec!["no".into(), "morph".into(), "Volume".into()],
            vec![vec![CellValue::Integer(1), CellValue::String("HF".into()), CellValue::String("big".into())]],
        )
        .unwrap();
        let err = Dataset::from_table(&table, &columns()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { row: 0, .. }));
    }

    #[test]
    fn integral_floats_normalize_to_integers() {
        assert_eq!(CellValue::Float(135.0).normalized(), CellValue::Integer(135));
        assert_eq!(CellValue::Float(1.5).normalized(), CellValue::Float(1.5));
    }
}
