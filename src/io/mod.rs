//! Input/output helpers.
//!
//! - CSV ingest into a [`crate::domain::Dataset`] (`ingest`)
//! - fit and generated-table exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
