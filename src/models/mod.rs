//! Fit-space model evaluation.
//!
//! Models are implemented as small, pure functions so that fitting and plotting
//! code can stay generic over the fit space.

pub mod model;

pub use model::*;
