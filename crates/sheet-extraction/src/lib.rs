//! Locating and extracting metric series from weakly-structured sheets.
//!
//! The locator finds period headers and label rows inside a raw grid;
//! the extractors drive it with declarative per-sheet label tables and
//! produce typed [`analysis_core::MetricSeries`] values.

pub mod extractor;
pub mod locator;
pub mod tables;

pub use extractor::*;
pub use locator::*;
pub use tables::*;
