//! Figure composition and drawing.
//!
//! `compose` turns grouped values, the comparison result and the injected
//! letters into a backend-independent [`Figure`]; `render` draws it through
//! plotters for the exporter.

pub mod annotate;
pub mod compose;
pub mod render;
pub mod style;

pub use compose::{compose, Figure};
pub use style::{FigureStyle, LetterOffset, YAxis};
