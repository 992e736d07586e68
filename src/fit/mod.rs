//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit a single series in a chosen space (linear / log-log / semi-log-x)
//! - fit one series per group value (parallel), skipping groups that fail

pub mod fitter;
pub mod groups;

pub use fitter::*;
pub use groups::*;
