//! Data preparation: row filtering and synthetic benchmark tables.

pub mod filter;
pub mod sample;

pub use filter::*;
pub use sample::*;
