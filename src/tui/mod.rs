//! Ratatui-based terminal UI.
//!
//! The TUI lists the benchmark figures on the left and renders the selected
//! one (Plotters chart plus fit table) on the right. Figures are built once at
//! startup and rebuilt on demand with `r`.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Terminal,
};

use crate::domain::{FigureConfig, FigureKind};
use crate::error::AppError;
use crate::figures::Figure;
use crate::plot::{chart_bounds, tick_label};

mod plotters_chart;

use plotters_chart::FigureChart;

/// Start the TUI.
pub fn run(config: FigureConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: FigureConfig,
    figures: Vec<(FigureKind, Result<Figure, String>)>,
    selected: usize,
    status: String,
}

impl App {
    fn new(config: FigureConfig) -> Self {
        let mut app = Self {
            config,
            figures: Vec::new(),
            selected: 0,
            status: String::new(),
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        self.figures = crate::app::pipeline::build_all_figures(&self.config);
        let failed = self.figures.iter().filter(|(_, f)| f.is_err()).count();
        self.status = if failed == 0 {
            format!("Loaded {} figures from {}", self.figures.len(), self.config.data_dir.display())
        } else {
            format!(
                "{failed} of {} figures failed to load from {}",
                self.figures.len(),
                self.config.data_dir.display()
            )
        };
    }

    fn current(&self) -> Option<&(FigureKind, Result<Figure, String>)> {
        self.figures.get(self.selected)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < self.figures.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('s') => self.save_svg(),
            _ => {}
        }
        false
    }

    fn save_svg(&mut self) {
        let Some((kind, figure)) = self.current() else {
            return;
        };
        let Ok(figure) = figure else {
            self.status = format!("{} has no data to save.", kind.display_name());
            return;
        };
        let path = PathBuf::from(format!("{}.svg", kind.slug()));
        self.status = match crate::plot::write_svg(figure, &path, crate::plot::DEFAULT_SVG_SIZE) {
            Ok(()) => format!("Wrote {}", path.display()),
            Err(err) => format!("SVG export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let groups: Vec<String> = self.config.groups.iter().map(|g| g.to_string()).collect();
        let window = self
            .config
            .window
            .as_ref()
            .map(|w| w.to_string())
            .unwrap_or_else(|| "all".to_string());
        let line = Line::from(vec![
            Span::styled("sizes", Style::default().fg(Color::Cyan)),
            Span::raw(" | serialized size benchmarks"),
            Span::styled(
                format!(
                    " | data: {} | groups: {} | w: {window}",
                    self.config.data_dir.display(),
                    groups.join(",")
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(area);

        self.draw_figure_list(frame, chunks[0]);

        let Some((kind, figure)) = self.current() else {
            return;
        };
        match figure {
            Ok(figure) => {
                let table_height = fit_table_height(figure);
                let right = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(table_height)])
                    .split(chunks[1]);
                self.draw_chart(frame, right[0], figure);
                self.draw_fit_table(frame, right[1], figure);
            }
            Err(err) => {
                let block = Block::default().title(kind.display_name()).borders(Borders::ALL);
                let msg = Paragraph::new(err.as_str())
                    .style(Style::default().fg(Color::Yellow))
                    .block(block);
                frame.render_widget(msg, chunks[1]);
            }
        }
    }

    fn draw_figure_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .figures
            .iter()
            .map(|(kind, figure)| {
                let style = if figure.is_ok() {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(kind.display_name()).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Figures").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, figure: &Figure) {
        let block = Block::default().title(figure.title.as_str()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((x_bounds, y_bounds)) = chart_bounds(figure) else {
            let msg = Paragraph::new("No data to plot.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        frame.render_widget(FigureChart { figure }, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, figure, x_bounds, y_bounds);
        }
    }

    fn draw_fit_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect, figure: &Figure) {
        let mut lines: Vec<Line> = crate::report::format_fit_table(&figure.fits)
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        for s in &figure.skipped {
            lines.push(Line::from(Span::styled(
                format!("skipped {}: {}", s.label, s.error),
                Style::default().fg(Color::Yellow),
            )));
        }
        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Fits").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  r reload  s save svg  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Header, rule and one row per fit and skipped series, plus the border.
fn fit_table_height(figure: &Figure) -> u16 {
    let coefficient_rows = figure.fits.iter().filter(|f| f.fit.degree > 1).count();
    let rows = 2 + figure.fits.len() + coefficient_rows + figure.skipped.len();
    (rows + 2).min(14) as u16
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    figure: &Figure,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = tick_label(figure.x_scale, x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = tick_label(figure.y_scale, y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(figure.x_label.as_str())
        .alignment(Alignment::Center)
        .style(style);
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(figure.y_label.as_str())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width.saturating_sub(insets.right),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
