//! Two-group comparison figures: load a small table, clean it, compare the
//! groups, and export an annotated box/strip plot.
//!
//! ```text
//!  loader → clean → derive → stats → figure::compose → export
//! ```
//!
//! [`job::run_job`] wires the stages together from a [`job::JobConfig`].

pub mod color;
pub mod data;
pub mod error;
pub mod export;
pub mod figure;
pub mod job;
pub mod stats;
