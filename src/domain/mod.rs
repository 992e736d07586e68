//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - cell values, predicates and series (`Value`, `Predicate`, `Series`)
//! - the loaded table (`Dataset`)
//! - fit outputs (`FitResult`, `FitQuality`) and run configuration

pub mod dataset;
pub mod types;

pub use dataset::*;
pub use types::*;
