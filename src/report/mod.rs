//! Reporting utilities: fit tables and figure summaries.

pub mod format;

pub use format::*;
