//! `size-curves` library crate.
//!
//! The binary (`sizes`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - figures can be rebuilt from scripts or notebooks via the same builders
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod figures;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
