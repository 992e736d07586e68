//! Plotters rendering of a [`Figure`], shared by the SVG writer and the TUI.
//!
//! The drawing code is generic over the Plotters backend: the SVG writer passes
//! an `SVGBackend` drawing area, the TUI passes the `plotters-ratatui-backend`
//! one. Only the [`ChartTheme`] differs.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::figures::{AxisScale, Figure, Marker};

/// Series colors by palette index.
const PALETTE: [RGBColor; 6] = [
    RGBColor(220, 30, 30),
    RGBColor(30, 80, 220),
    RGBColor(30, 160, 60),
    RGBColor(200, 0, 200),
    RGBColor(0, 170, 190),
    RGBColor(230, 140, 0),
];

/// Points used to draw a dashed horizontal line.
const HLINE_DASHES: usize = 41;

pub fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub foreground: RGBColor,
    pub background: RGBColor,
    pub font_size: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    /// Marker radius in pixels; `None` draws single pixels.
    pub marker_size: Option<u32>,
    pub caption: bool,
    pub legend: bool,
    /// Tick labels and axis descriptions drawn by Plotters.
    pub axis_labels: bool,
}

impl ChartTheme {
    pub const SVG: ChartTheme = ChartTheme {
        foreground: BLACK,
        background: WHITE,
        font_size: 14,
        margin: 12,
        x_label_area: 40,
        y_label_area: 60,
        marker_size: Some(4),
        caption: true,
        legend: true,
        axis_labels: true,
    };

    // The ratatui backend maps circle radii to canvas units incorrectly, so
    // terminal markers are single pixels. Tick labels are drawn as ratatui
    // text around the chart instead.
    pub const TERMINAL: ChartTheme = ChartTheme {
        foreground: WHITE,
        background: BLACK,
        font_size: 10,
        margin: 1,
        x_label_area: 0,
        y_label_area: 0,
        marker_size: None,
        caption: false,
        legend: false,
        axis_labels: false,
    };
}

/// Draw a figure onto any Plotters drawing area.
///
/// A figure with nothing to draw leaves the area untouched.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    theme: &ChartTheme,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let Some(([x0, x1], [y0, y1])) = chart_bounds(figure) else {
        return Ok(());
    };
    let fg = theme.foreground;
    let text = ("sans-serif", theme.font_size).into_font().color(&fg);
    let x_tick = |v: &f64| tick_label(figure.x_scale, *v);
    let y_tick = |v: &f64| tick_label(figure.y_scale, *v);

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(theme.margin)
        .set_label_area_size(LabelAreaPosition::Left, theme.y_label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, theme.x_label_area);
    if theme.caption {
        builder.caption(&figure.title, ("sans-serif", theme.font_size + 6).into_font().color(&fg));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh().disable_y_mesh().axis_style(&fg);
    if theme.axis_labels {
        mesh.x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&x_tick)
            .y_label_formatter(&y_tick)
            .label_style(text.clone())
            .axis_desc_style(text.clone());
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    for h in &figure.hlines {
        let y = figure.y_scale.apply(h.y);
        if !y.is_finite() {
            continue;
        }
        let points: Vec<(f64, f64)> = (0..HLINE_DASHES)
            .map(|i| (x0 + (x1 - x0) * i as f64 / (HLINE_DASHES - 1) as f64, y))
            .collect();
        chart.draw_series(path_elements(&points, h.dashed, ShapeStyle::from(&fg)))?;
    }

    for line in &figure.lines {
        let color = series_color(line.color);
        let points: Vec<(f64, f64)> = line.points.iter().map(|&p| figure.display(p)).collect();
        let anno = chart.draw_series(path_elements(&points, line.dashed, color.stroke_width(2)))?;
        if !line.label.is_empty() {
            anno.label(line.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
        }
    }

    for layer in &figure.scatters {
        let color = series_color(layer.color);
        let points: Vec<(f64, f64)> = layer.points.iter().map(|&p| figure.display(p)).collect();
        let anno = match (theme.marker_size, layer.marker) {
            (None, _) => chart.draw_series(points.iter().map(|&p| Pixel::new(p, color)))?,
            (Some(r), Marker::Circle) => chart.draw_series(points.iter().map(|&p| Circle::new(p, r, color.filled())))?,
            (Some(r), Marker::Triangle) => {
                chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, r, color.filled())))?
            }
        };
        anno.label(layer.label.as_str())
            .legend(move |(x, y)| Circle::new((x + 8, y), 4, color.filled()));
    }

    if theme.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(text)
            .background_style(&theme.background.mix(0.85))
            .border_style(&fg)
            .draw()?;
    }
    Ok(())
}

/// Solid lines are one path; dashed lines draw every other segment.
fn path_elements(points: &[(f64, f64)], dashed: bool, style: ShapeStyle) -> Vec<PathElement<(f64, f64)>> {
    if !dashed {
        return vec![PathElement::new(points.to_vec(), style)];
    }
    points
        .windows(2)
        .step_by(2)
        .map(|w| PathElement::new(vec![w[0], w[1]], style))
        .collect()
}

/// Padded display-space bounds `([x0, x1], [y0, y1])` of a figure.
pub fn chart_bounds(figure: &Figure) -> Option<([f64; 2], [f64; 2])> {
    let (x0, x1, y0, y1) = figure.display_bounds()?;
    let (x0, x1) = pad(x0, x1);
    let (y0, y1) = pad(y0, y1);
    Some(([x0, x1], [y0, y1]))
}

fn pad(min: f64, max: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let p = (span * 0.05).max(1e-9);
    (min - p, max + p)
}

pub fn fmt_tick(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Tick label in data units: log axes are drawn in `ln` space.
pub fn tick_label(scale: AxisScale, v: f64) -> String {
    match scale {
        AxisScale::Linear => fmt_tick(v),
        AxisScale::Log => fmt_tick(v.exp()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_paths_skip_alternate_segments() {
        let pts: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 0.0)).collect();
        assert_eq!(path_elements(&pts, false, ShapeStyle::from(&BLACK)).len(), 1);
        // segments 0-1 and 2-3
        assert_eq!(path_elements(&pts, true, ShapeStyle::from(&BLACK)).len(), 2);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(series_color(0), series_color(PALETTE.len()));
        assert_ne!(series_color(0), series_color(1));
    }

    #[test]
    fn tick_labels_are_compact() {
        assert_eq!(fmt_tick(12345.678), "12346");
        assert_eq!(fmt_tick(1.23456), "1.23");
    }

    #[test]
    fn log_ticks_show_data_units() {
        assert_eq!(tick_label(AxisScale::Log, 1024f64.ln()), "1024");
        assert_eq!(tick_label(AxisScale::Linear, 2.5), "2.50");
    }
}
