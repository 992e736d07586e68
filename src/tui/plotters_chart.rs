//! Plotters-powered figure widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`,
//! reusing the same drawing code as the SVG export.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::figures::Figure;
use crate::plot::{draw_figure, ChartTheme};

/// Render-only chart for one figure.
pub struct FigureChart<'a> {
    pub figure: &'a Figure,
}

impl<'a> Widget for FigureChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let figure = self.figure;
        let widget = widget_fn(move |root| {
            draw_figure(&root, figure, &ChartTheme::TERMINAL)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
