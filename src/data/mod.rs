/// Data layer: core types, loading, cleaning and derived columns.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet / literal
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  value / group / key projected from the Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  exclude keys, trim labels, drop incomplete rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  optional: percent of per-key total
///   └──────────┘
/// ```

pub mod clean;
pub mod derive;
pub mod loader;
pub mod model;
