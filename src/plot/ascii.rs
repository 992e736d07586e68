//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: the layer's marker (`o`, `^`)
//! - fitted lines: `-`
//! - horizontal reference lines: `=`

use crate::figures::Figure;

/// Render a figure as a `width x height` character grid with a header and legend.
pub fn render_ascii(figure: &Figure, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    out.push_str(&figure.title);
    out.push('\n');

    let Some((x_min, x_max, y_min, y_max)) = figure.display_bounds() else {
        out.push_str("(no data)\n");
        return out;
    };
    let (x_min, x_max) = if x_max > x_min { (x_min, x_max) } else { pad_range(x_min, x_max, 0.05) };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let to_cell = |(x, y): (f64, f64)| -> (usize, usize) {
        (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height))
    };

    // Reference lines first, then fits, so points overlay both.
    for h in &figure.hlines {
        let y = figure.y_scale.apply(h.y);
        if y.is_finite() {
            let row = map_y(y, y_min, y_max, height);
            draw_line(&mut grid, 0, row, width - 1, row, '=');
        }
    }

    for line in &figure.lines {
        let mut prev = None;
        for &p in &line.points {
            let (x, y) = figure.display(p);
            if !(x.is_finite() && y.is_finite()) {
                prev = None;
                continue;
            }
            let (cx, cy) = to_cell((x, y));
            let (x0, y0) = prev.unwrap_or((cx, cy));
            draw_line(&mut grid, x0, y0, cx, cy, '-');
            prev = Some((cx, cy));
        }
    }

    for layer in &figure.scatters {
        let glyph = layer.marker.glyph();
        for &p in &layer.points {
            let (x, y) = figure.display(p);
            if x.is_finite() && y.is_finite() {
                let (cx, cy) = to_cell((x, y));
                grid[cy][cx] = glyph;
            }
        }
    }

    out.push_str(&format!(
        "x: {} [{x_min:.3}, {x_max:.3}] | y: {} [{y_min:.2}, {y_max:.2}]\n",
        figure.x_label, figure.y_label
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for layer in &figure.scatters {
        out.push_str(&format!("  {} {}\n", layer.marker.glyph(), layer.label));
    }
    for line in figure.lines.iter().filter(|l| !l.label.is_empty()) {
        out.push_str(&format!("  - {}\n", line.label));
    }
    for h in &figure.hlines {
        out.push_str(&format!("  = {} ({:.0})\n", h.label, h.y));
    }

    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham). Only blank cells are written.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid.get_mut(y0 as usize).and_then(|row| row.get_mut(x0 as usize)) {
            if *cell == ' ' {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
