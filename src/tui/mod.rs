//! Ratatui-based terminal UI.
//!
//! The widget layer of the dashboard: a controls panel (series, preset,
//! start, end, Graph trigger), the chart, and an error display. Widget events
//! are forwarded to the session's [`UpdateController`]; the UI itself never
//! touches the plot data.

use std::io;
use std::panic;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use tracing::error;

use crate::config::{DashboardConfig, PAGE_TITLE, X_LABEL, Y_LABEL};
use crate::data::SeriesSource;
use crate::error::AppError;
use crate::session::{CycleOutcome, Session, SessionEvent, UpdateController};

mod plotters_chart;

use plotters_chart::{ChartSeries, SeriesChart, date_to_x, x_to_date};

/// Start the TUI and run until the user quits.
pub fn run<S: SeriesSource>(config: &DashboardConfig, source: S) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;
    let _hook = PanicLogHook::install();

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let controller = UpdateController::new(source, Session::new(config.initial_inputs()));
    let mut app = App::new(controller);
    app.request(SessionEvent::Regenerate);
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

/// Sends panic messages to the log instead of the screen while the UI is up.
struct PanicLogHook;

impl PanicLogHook {
    fn install() -> Self {
        panic::set_hook(Box::new(|info| {
            error!("panic: {info}");
        }));
        Self
    }
}

impl Drop for PanicLogHook {
    fn drop(&mut self) {
        // Dropping the taken hook reinstates the default one.
        let _ = panic::take_hook();
    }
}

/// Focusable controls, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Series,
    Preset,
    Start,
    End,
    Graph,
}

impl Field {
    const ALL: [Field; 5] = [Field::Series, Field::Preset, Field::Start, Field::End, Field::Graph];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    fn prev(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }

    fn is_text(self) -> bool {
        matches!(self, Field::Series | Field::Start | Field::End)
    }

    fn title(self) -> &'static str {
        match self {
            Field::Series => "Data series name",
            Field::Preset => "Popular series",
            Field::Start => "Start date",
            Field::End => "End date",
            Field::Graph => "Graph",
        }
    }
}

struct App<S> {
    controller: UpdateController<S>,
    focus: Field,
    /// Edit buffer while a text input is being edited.
    editing: Option<String>,
    /// Event waiting to run after the next draw.
    pending: Option<SessionEvent>,
    status: String,
    /// Series identifier of the data currently plotted.
    loaded_series: Option<String>,
    /// Hovered row of the plot table.
    cursor: usize,
    /// Plot revision `cursor` refers to.
    cursor_revision: Option<u64>,
}

impl<S: SeriesSource> App<S> {
    fn new(controller: UpdateController<S>) -> Self {
        Self {
            controller,
            focus: Field::Series,
            editing: None,
            pending: None,
            status: String::new(),
            loaded_series: None,
            cursor: 0,
            cursor_revision: None,
        }
    }

    fn session(&self) -> &Session {
        self.controller.session()
    }

    /// Queue a cycle; it runs after the "Fetching" status has been drawn.
    fn request(&mut self, event: SessionEvent) {
        let series = match event {
            SessionEvent::Regenerate => self.session().inputs.series.trim().to_string(),
            SessionEvent::PresetChanged(preset) => preset.series_id().to_string(),
        };
        self.status = format!("Fetching {series}...");
        self.pending = Some(event);
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

            if self.run_pending() {
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
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

    /// Run the queued cycle, if any. Blocks for the duration of the fetch.
    fn run_pending(&mut self) -> bool {
        let Some(event) = self.pending.take() else {
            return false;
        };

        let outcome = self.controller.handle(event);
        self.status = match outcome {
            CycleOutcome::Updated { rows } => {
                let series = self.session().inputs.series.trim().to_string();
                let status = format!("Loaded {series}: {rows} observations");
                self.loaded_series = Some(series);
                status
            }
            CycleOutcome::Failed(_) | CycleOutcome::Fault(_) => "Update failed; showing last good data.".to_string(),
        };
        self.sync_cursor();
        true
    }

    /// Park the hover cursor on the newest row whenever the plot changes.
    fn sync_cursor(&mut self) {
        let plot = self.session().plot();
        let (revision, len) = (plot.revision(), plot.table().len());
        if self.cursor_revision != Some(revision) {
            self.cursor = len.saturating_sub(1);
            self.cursor_revision = Some(revision);
        }
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Down | KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Enter => match self.focus {
                Field::Graph => self.request(SessionEvent::Regenerate),
                field if field.is_text() => {
                    self.editing = Some(self.field_value(field).to_string());
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.title());
                }
                _ => {}
            },
            KeyCode::Char('g') => self.request(SessionEvent::Regenerate),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.session().plot().table().len().saturating_sub(1),
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                if let Some(value) = self.editing.take() {
                    let field = self.focus;
                    *self.field_value_mut(field) = value;
                    self.status = format!("{} updated. Press g or Graph to refresh.", field.title());
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if !c.is_control() => buffer.push(c),
            _ => {}
        }
    }

    /// Left/Right: change the preset when it has focus, else move the hover cursor.
    fn adjust(&mut self, delta: i32) {
        if self.focus == Field::Preset {
            let current = self.session().inputs.preset;
            let preset = if delta >= 0 { current.next() } else { current.prev() };
            self.request(SessionEvent::PresetChanged(preset));
            return;
        }

        let len = self.session().plot().table().len();
        if len == 0 {
            return;
        }
        self.cursor = if delta >= 0 {
            (self.cursor + 1).min(len - 1)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    fn field_value(&self, field: Field) -> &str {
        let inputs = &self.session().inputs;
        match field {
            Field::Series => &inputs.series,
            Field::Start => &inputs.start,
            Field::End => &inputs.end,
            Field::Preset => inputs.preset.label(),
            Field::Graph => "",
        }
    }

    fn field_value_mut(&mut self, field: Field) -> &mut String {
        let inputs = &mut self.controller.session_mut().inputs;
        match field {
            Field::Start => &mut inputs.start,
            Field::End => &mut inputs.end,
            _ => &mut inputs.series,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        self.sync_cursor();

        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_errors(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.session().plot().table();
        let span = table
            .date_span()
            .map(|(a, b)| format!("{a} → {b}"))
            .unwrap_or_else(|| "-".to_string());
        let line = Line::from(vec![
            Span::styled(PAGE_TITLE, Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(
                    " | series: {} | span: {span} | n={}",
                    self.loaded_series.as_deref().unwrap_or("-"),
                    table.len(),
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
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(area);

        self.draw_controls(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_controls(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|&field| {
                let text = match field {
                    Field::Graph => "[ Graph ]".to_string(),
                    Field::Preset => format!("{}: ◂ {} ▸", field.title(), self.session().inputs.preset.label()),
                    _ => match (&self.editing, field == self.focus) {
                        (Some(buffer), true) => format!("{}: {buffer}_", field.title()),
                        _ => format!("{}: {}", field.title(), self.field_value(field)),
                    },
                };
                ListItem::new(text)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Controls").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.focus.index()));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing.is_some() {
            let hint = Paragraph::new("Editing…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let plot = self.session().plot();
        let title = match plot.tooltip(self.cursor) {
            Some(tooltip) => format!("{PAGE_TITLE} | {tooltip}"),
            None => PAGE_TITLE.to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = ChartSeries::from_table(plot.table()) else {
            let msg = if plot.revision() == 0 {
                "Waiting for data..."
            } else {
                "No data in range."
            };
            let p = Paragraph::new(msg).style(Style::default().fg(Color::Yellow));
            frame.render_widget(p, inner);
            return;
        };

        let hover = plot.table().row(self.cursor).map(|(d, v)| (date_to_x(d), v));
        let (chart_rect, insets) = chart_layout(inner);
        let widget = SeriesChart {
            series: &series,
            hover,
            x_label: X_LABEL,
            y_label: Y_LABEL,
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_value,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds);
        }
    }

    fn draw_errors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let p = Paragraph::new(Text::from(self.session().error_text()))
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Enter edit/graph  ←/→ preset or hover  g graph  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn fmt_axis_date(v: f64) -> String {
    x_to_date(v).map(|d| d.format("%Y-%m").to_string()).unwrap_or_default()
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
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

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
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
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_date(x_val);
        let label_len = label.chars().count() as u16;
        let start = x
            .saturating_sub(label_len / 2)
            .min((inner.x + inner.width).saturating_sub(label_len));
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
        let label = fmt_axis_value(y_val);
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
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

    let x_label = Paragraph::new(X_LABEL)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(Y_LABEL).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
