//! Group statistics: per-group summaries, the two-sample comparison and the
//! caller-supplied significance letters.

pub mod compare;
pub mod letters;
pub mod summary;

pub use compare::{Comparison, ComparisonMethod, ComparisonResult, Variance};
pub use letters::SignificanceLetters;
pub use summary::{GroupSummary, GroupedValues};
