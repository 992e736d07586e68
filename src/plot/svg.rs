//! SVG export via Plotters' `SVGBackend`.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;
use crate::figures::Figure;
use crate::plot::chart::{draw_figure, ChartTheme};

pub const DEFAULT_SVG_SIZE: (u32, u32) = (960, 640);

/// Write a figure to an SVG file.
pub fn write_svg(figure: &Figure, path: &Path, size: (u32, u32)) -> Result<(), AppError> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)
        .and_then(|_| draw_figure(&root, figure, &ChartTheme::SVG))
        .and_then(|_| root.present())
        .map_err(|e| AppError::new(4, format!("Failed to write SVG '{}': {e}", path.display())))?;
    log::info!("wrote {} to {}", figure.kind.display_name(), path.display());
    Ok(())
}

/// Render a figure to an SVG document in memory.
pub fn render_svg(figure: &Figure, size: (u32, u32)) -> Result<String, AppError> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        root.fill(&WHITE)
            .and_then(|_| draw_figure(&root, figure, &ChartTheme::SVG))
            .and_then(|_| root.present())
            .map_err(|e| AppError::new(4, format!("Failed to render SVG: {e}")))?;
    }
    Ok(out)
}
