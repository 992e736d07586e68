//! Figure renderers: ASCII grid, Plotters charts and SVG files.

pub mod ascii;
pub mod chart;
pub mod svg;

pub use ascii::*;
pub use chart::*;
pub use svg::*;
