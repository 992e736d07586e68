//! Figure descriptions.
//!
//! A [`Figure`] is everything a renderer needs: scatter layers, fitted lines,
//! horizontal reference lines and axis metadata. Builders load the CSVs,
//! filter and fit; renderers (ASCII, SVG, TUI) only draw.
//!
//! All coordinates are stored in data space. When an axis is [`AxisScale::Log`]
//! renderers plot `ln(value)`, and builders guarantee every value on such an
//! axis is strictly positive.

pub mod history_tree;
pub mod query_proof;
pub mod record;

use std::path::Path;

use crate::domain::{Axis, FigureConfig, FigureKind, FitResult, FitSpace, Series};
use crate::error::{DataError, FitError};
use crate::fit::{fit_series, predict_curve, predict_curve_positive};
use crate::io::load_dataset;
use crate::models::ln_checked;

/// Points per sampled fit line.
const LINE_SAMPLES: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

impl AxisScale {
    /// Map a data value to display coordinates.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            AxisScale::Linear => v,
            AxisScale::Log => v.ln(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Triangle,
}

impl Marker {
    pub fn glyph(self) -> char {
        match self {
            Marker::Circle => 'o',
            Marker::Triangle => '^',
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScatterLayer {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub marker: Marker,
    /// Palette index; renderers map it to a concrete color.
    pub color: usize,
}

#[derive(Debug, Clone)]
pub struct LineLayer {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub dashed: bool,
    pub color: usize,
}

#[derive(Debug, Clone)]
pub struct HLine {
    pub label: String,
    pub y: f64,
    pub dashed: bool,
}

/// A fitted series as listed in the fit table.
#[derive(Debug, Clone)]
pub struct FigureFit {
    pub label: String,
    pub fit: FitResult,
}

/// A series that was dropped from the figure.
#[derive(Debug, Clone)]
pub struct Skipped {
    pub label: String,
    pub error: FitError,
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub kind: FigureKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
    pub scatters: Vec<ScatterLayer>,
    pub lines: Vec<LineLayer>,
    pub hlines: Vec<HLine>,
    pub fits: Vec<FigureFit>,
    pub skipped: Vec<Skipped>,
}

impl Figure {
    pub fn new(kind: FigureKind, title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            scatters: Vec::new(),
            lines: Vec::new(),
            hlines: Vec::new(),
            fits: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn log_log(mut self) -> Self {
        self.x_scale = AxisScale::Log;
        self.y_scale = AxisScale::Log;
        self
    }

    pub fn display(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.x_scale.apply(x), self.y_scale.apply(y))
    }

    /// Display-space bounds over every layer: `(x_min, x_max, y_min, y_max)`.
    ///
    /// `None` when the figure has nothing to draw.
    pub fn display_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        let points = self
            .scatters
            .iter()
            .flat_map(|s| s.points.iter())
            .chain(self.lines.iter().flat_map(|l| l.points.iter()));
        for &p in points {
            let (x, y) = self.display(p);
            if x.is_finite() && y.is_finite() {
                x_min = x_min.min(x);
                x_max = x_max.max(x);
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        if !x_min.is_finite() {
            return None;
        }
        for h in &self.hlines {
            let y = self.y_scale.apply(h.y);
            if y.is_finite() {
                y_min = y_min.min(y);
                y_max = y_max.max(y);
            }
        }
        Some((x_min, x_max, y_min, y_max))
    }

    /// Scatter a series, fit it and overlay the fitted line.
    ///
    /// A series that cannot be fitted (or cannot be shown on this figure's
    /// log axes) is recorded in `skipped` and nothing is drawn for it.
    pub fn add_fitted(&mut self, series: &Series, style: SeriesStyle<'_>) {
        let fit = fit_series(series, style.space, 1);
        self.add_fit_result(series, fit, style);
    }

    /// Like [`Figure::add_fitted`] for a series that was already fitted.
    pub fn add_fit_result(&mut self, series: &Series, fit: Result<FitResult, FitError>, style: SeriesStyle<'_>) {
        match fit.and_then(|fit| self.fitted_layers(series, fit, &style)) {
            Ok((scatter, line, fit)) => {
                self.scatters.push(scatter);
                self.lines.push(line);
                self.fits.push(FigureFit {
                    label: series.label.clone(),
                    fit,
                });
            }
            Err(error) => self.skip(&series.label, error),
        }
    }

    pub fn skip(&mut self, label: &str, error: FitError) {
        log::warn!("skipping '{label}' in {}: {error}", self.kind.display_name());
        self.skipped.push(Skipped {
            label: label.to_string(),
            error,
        });
    }

    fn fitted_layers(
        &self,
        series: &Series,
        fit: FitResult,
        style: &SeriesStyle<'_>,
    ) -> Result<(ScatterLayer, LineLayer, FitResult), FitError> {
        if self.x_scale == AxisScale::Log {
            ln_checked(series.x(), Axis::X)?;
        }
        if self.y_scale == AxisScale::Log {
            ln_checked(series.y(), Axis::Y)?;
        }

        let xs = sample_xs(series.x(), self.x_scale);
        let ys = match self.y_scale {
            AxisScale::Log => predict_curve_positive(&fit, &xs)?,
            AxisScale::Linear => predict_curve(&fit, &xs),
        };

        let scatter = ScatterLayer {
            label: series.label.clone(),
            points: series.points().collect(),
            marker: style.marker,
            color: style.color,
        };
        let line = LineLayer {
            label: style.line_label.to_string(),
            points: xs.into_iter().zip(ys).collect(),
            dashed: style.dashed,
            color: style.color,
        };
        Ok((scatter, line, fit))
    }
}

/// How [`Figure::add_fitted`] draws and fits one series.
#[derive(Debug, Clone)]
pub struct SeriesStyle<'a> {
    pub space: FitSpace,
    pub marker: Marker,
    pub color: usize,
    pub dashed: bool,
    /// Legend label for the fitted line; empty hides it from the legend.
    pub line_label: &'a str,
}

/// Evenly spaced abscissae across the data range (geometric on log axes).
fn sample_xs(x: &[f64], scale: AxisScale) -> Vec<f64> {
    let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (0..LINE_SAMPLES)
        .map(|i| {
            let t = i as f64 / (LINE_SAMPLES - 1) as f64;
            match scale {
                AxisScale::Linear => lo + t * (hi - lo),
                AxisScale::Log => (lo.ln() + t * (hi.ln() - lo.ln())).exp(),
            }
        })
        .collect()
}

/// Build one figure from the CSVs in `config.data_dir`.
pub fn build_figure(kind: FigureKind, config: &FigureConfig) -> Result<Figure, DataError> {
    let figure = match kind {
        FigureKind::RecordAggregation => record::record_aggregation(config)?,
        FigureKind::RecordSizes => record::record_sizes(config)?,
        FigureKind::HistoryTree => history_tree::history_tree(config)?,
        FigureKind::QueryProof => query_proof::query_proof(config, "query_proof_size.csv", kind)?,
        FigureKind::QueryProofUnsorted => {
            query_proof::query_proof(config, "query_proof_unsorted_size.csv", kind)?
        }
    };
    log::info!(
        "built {}: {} fits, {} skipped",
        kind.display_name(),
        figure.fits.len(),
        figure.skipped.len()
    );
    Ok(figure)
}

pub(crate) fn load(data_dir: &Path, file_name: &str) -> Result<crate::domain::Dataset, DataError> {
    load_dataset(&data_dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> SeriesStyle<'static> {
        SeriesStyle {
            space: FitSpace::Linear,
            marker: Marker::Circle,
            color: 0,
            dashed: false,
            line_label: "fit",
        }
    }

    #[test]
    fn add_fitted_draws_scatter_and_line() {
        let mut fig = Figure::new(FigureKind::RecordAggregation, "t", "x", "y");
        let s = Series::from_points("s", vec![(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]);
        fig.add_fitted(&s, style());
        assert_eq!(fig.scatters.len(), 1);
        assert_eq!(fig.lines[0].points.len(), LINE_SAMPLES);
        assert_eq!(fig.lines[0].points[0], (1.0, 3.0));
        assert!((fig.lines[0].points[LINE_SAMPLES - 1].1 - 7.0).abs() < 1e-9);
        assert!((fig.fits[0].fit.slope() - 2.0).abs() < 1e-12);
        assert!(fig.skipped.is_empty());
    }

    #[test]
    fn log_axes_skip_non_positive_predictions() {
        // Fitted line y = 100x - 132.3 is negative at x = 1.
        let mut fig = Figure::new(FigureKind::HistoryTree, "t", "x", "y").log_log();
        let s = Series::from_points("s", vec![(1.0, 1.0), (2.0, 1.0), (3.0, 201.0)]);
        fig.add_fitted(&s, style());
        assert!(fig.scatters.is_empty());
        assert_eq!(fig.skipped.len(), 1);
        assert!(matches!(fig.skipped[0].error, FitError::NonPositiveValue { axis: Axis::Y, .. }));
    }

    #[test]
    fn bounds_include_hlines_and_log_scale() {
        let mut fig = Figure::new(FigureKind::QueryProof, "t", "x", "y");
        assert!(fig.display_bounds().is_none());
        fig.add_fitted(&Series::from_points("s", vec![(0.0, 1.0), (10.0, 2.0)]), style());
        fig.hlines.push(HLine { label: "all".into(), y: 50.0, dashed: true });
        assert_eq!(fig.display_bounds(), Some((0.0, 10.0, 1.0, 50.0)));

        let xs = sample_xs(&[1.0, 100.0], AxisScale::Log);
        assert!((xs[0] - 1.0).abs() < 1e-12);
        assert!((xs[LINE_SAMPLES - 1] - 100.0).abs() < 1e-9);
    }
}
