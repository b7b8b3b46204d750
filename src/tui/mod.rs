//! Ratatui-based terminal UI.
//!
//! The TUI shows one chart per model stage, all following a shared time
//! window. Keys scroll, page and zoom the window; each pane can switch its
//! plot mode or be hidden.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::{debug, trace};

use crate::app::session::Session;
use crate::error::AppError;
use crate::render::series::{SeriesKind, pane_series};
use crate::view::PaneId;

mod plotters_chart;

use plotters_chart::PaneChart;

/// Start the TUI.
pub fn run(session: Session) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session, PathBuf::from(crate::debug::DEBUG_DIR));
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
    session: Session,
    /// Index into the pane list, not a pane id.
    selected: usize,
    editing_duration: bool,
    duration_input: String,
    debug_dir: PathBuf,
    status: String,
}

impl App {
    fn new(mut session: Session, debug_dir: PathBuf) -> Self {
        // Initial draw requests are satisfied by the first frame.
        session.renderer_mut().drain();
        Self {
            session,
            selected: 0,
            editing_duration: false,
            duration_input: String::new(),
            debug_dir,
            status: "Ready.".to_string(),
        }
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
                    let dirty = self.session.renderer_mut().drain();
                    trace!(panes = dirty.len(), "panes marked for redraw");
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_duration {
            self.handle_duration_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Left => {
                self.session.step(-1);
            }
            KeyCode::Right => {
                self.session.step(1);
            }
            KeyCode::PageUp => {
                self.session.page(-1);
            }
            KeyCode::PageDown => {
                self.session.page(1);
            }
            KeyCode::Home => {
                self.session.scroll_to(0.0);
            }
            KeyCode::End => {
                self.session.scroll_to(f64::INFINITY);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.session.zoom_out();
                self.status = format!("duration: {:.3} s", self.session.window().duration());
            }
            KeyCode::Char('-') => {
                if !self.session.zoom_in() {
                    self.status = "Already at minimum duration.".to_string();
                } else {
                    self.status = format!("duration: {:.3} s", self.session.window().duration());
                }
            }
            KeyCode::Char('d') => {
                self.editing_duration = true;
                self.duration_input.clear();
                self.status = "Duration in seconds. Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < self.session.panes().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('m') => {
                if let Some(id) = self.selected_id() {
                    self.status = match self.session.cycle_pane_mode(id) {
                        Ok(mode) => format!("pane {id}: {}", mode.name()),
                        Err(err) => err.to_string(),
                    };
                }
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.status = match self.session.toggle_pane_visibility(id) {
                        Ok(true) => format!("pane {id} shown"),
                        Ok(false) => format!("pane {id} hidden"),
                        Err(err) => err.to_string(),
                    };
                }
            }
            KeyCode::Char('b') => {
                self.status = match crate::debug::write_debug_bundle(&self.session, &self.debug_dir) {
                    Ok(path) => format!("Wrote debug bundle: {}", path.display()),
                    Err(err) => format!("Debug write failed: {err}"),
                };
            }
            _ => {}
        }

        false
    }

    fn handle_duration_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_duration = false;
                self.status = "Duration edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_duration = false;
                self.apply_duration_input();
            }
            KeyCode::Backspace => {
                self.duration_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' {
                    self.duration_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_duration_input(&mut self) {
        let trimmed = self.duration_input.trim();
        let duration = match trimmed.parse::<f64>() {
            Ok(d) => d,
            Err(e) => {
                self.status = format!("Invalid duration '{trimmed}': {e}");
                return;
            }
        };
        self.status = match self.session.set_duration(duration) {
            Ok(_) => format!("duration: {:.3} s", self.session.window().duration()),
            Err(err) => err.to_string(),
        };
        debug!(input = trimmed, status = %self.status, "duration prompt applied");
    }

    fn selected_id(&self) -> Option<PaneId> {
        self.session.panes().iter().nth(self.selected).map(|p| p.id())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_panes(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let w = self.session.window();
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("nv", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" {}", self.session.source().name)),
        ]));

        let mut summary = format!(
            "window: [{:.3}, {:.3}] s | duration: {:.3} s | extent: {:.3} s",
            w.start(),
            w.stop(),
            w.duration(),
            w.max_extent()
        );
        if w.visible_span() < w.duration() {
            summary.push_str(&format!(" | showing {:.3} s", w.visible_span()));
        }
        if self.editing_duration {
            summary.push_str(&format!(" | new duration: {}_", self.duration_input));
        }
        lines.push(Line::from(Span::styled(summary, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_panes(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let panes = self.session.panes();
        if panes.is_empty() {
            let msg = Paragraph::new("No stages to show.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, area);
            return;
        }

        let constraints: Vec<Constraint> = panes
            .iter()
            .map(|p| if p.is_visible() { Constraint::Min(5) } else { Constraint::Length(1) })
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (i, (pane, rect)) in panes.iter().zip(rows.iter()).enumerate() {
            let selected = i == self.selected;
            let title_style = if selected {
                Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let title = format!(" {} {} [{}] ", pane.id(), pane.stage().keyword, pane.mode().name());

            if !pane.is_visible() {
                let line = Line::from(vec![
                    Span::styled(title, title_style),
                    Span::styled("hidden", Style::default().fg(Color::DarkGray)),
                ]);
                frame.render_widget(Paragraph::new(line), *rect);
                continue;
            }

            let block = Block::default()
                .title(Span::styled(title, title_style))
                .borders(Borders::ALL);
            let inner = block.inner(*rect);
            frame.render_widget(block, *rect);
            frame.render_widget(Clear, inner);

            // Braille canvas cells hold two points across.
            let series = pane_series(pane, self.session.source(), usize::from(inner.width) * 2);
            match series.kind {
                SeriesKind::Heatmap => {
                    let rows = crate::plot::ascii::heat_rows(
                        &series,
                        usize::from(inner.width),
                        usize::from(inner.height),
                    );
                    let text = Text::from(rows.into_iter().map(Line::from).collect::<Vec<_>>());
                    frame.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Yellow)), inner);
                }
                SeriesKind::Line | SeriesKind::Scatter => {
                    frame.render_widget(PaneChart { series: &series }, inner);
                }
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ step  PgUp/PgDn page  +/- zoom  d duration  ↑/↓ select  m mode  space hide  b debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::build_session;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn app(dir: PathBuf) -> App {
        let cli = Cli::parse_from(["nv", "tui", "-m", "lvl.1-wc.2x1", "--seconds", "30", "--fs", "10", "--channels", "2"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui command");
        };
        App::new(build_session(&args).unwrap(), dir)
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            assert!(!app.handle_key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn arrows_and_pages_move_the_window() {
        let mut app = app(PathBuf::from("unused"));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.session.window().start(), 1.0);
        assert!(app.session.renderer().contains(PaneId(0)));
        assert!(!app.session.renderer().contains(PaneId(1)));

        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.session.window().start(), 11.0);
        app.handle_key(KeyCode::End);
        assert_eq!(app.session.window().start(), 20.0);
        app.handle_key(KeyCode::Home);
        assert_eq!(app.session.window().start(), 0.0);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.session.window().start(), 0.0);
    }

    #[test]
    fn zoom_keys_change_duration() {
        let mut app = app(PathBuf::from("unused"));
        app.handle_key(KeyCode::Char('+'));
        assert_eq!(app.session.window().duration(), 11.0);
        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('-'));
        assert_eq!(app.session.window().duration(), 9.0);
        assert_eq!(app.status, "duration: 9.000 s");
    }

    #[test]
    fn duration_prompt_applies_or_reports() {
        let mut app = app(PathBuf::from("unused"));
        type_keys(&mut app, "d2.5");
        assert!(app.editing_duration);
        // 'q' is ignored while the prompt is open.
        assert!(!app.handle_key(KeyCode::Char('q')));
        app.handle_key(KeyCode::Enter);
        assert!(!app.editing_duration);
        assert_eq!(app.session.window().duration(), 2.5);
        assert_eq!(app.session.window().stop(), 2.5);

        type_keys(&mut app, "d0");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.session.window().duration(), 2.5);
        assert!(app.status.contains("0.001"), "status: {}", app.status);

        type_keys(&mut app, "d7");
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.session.window().duration(), 2.5);
    }

    #[test]
    fn pane_keys_cycle_mode_and_visibility() {
        let mut app = app(PathBuf::from("unused"));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected, 1);

        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.status, "pane #1: strf_timeseries");
        assert!(app.session.panes().get(PaneId(1)).unwrap().is_scrollable());

        app.handle_key(KeyCode::Char(' '));
        assert!(!app.session.panes().get(PaneId(1)).unwrap().is_visible());
        assert_eq!(app.status, "pane #1 hidden");
    }

    #[test]
    fn debug_key_writes_bundle_and_q_quits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path().to_path_buf());
        app.handle_key(KeyCode::Char('b'));
        assert!(app.status.starts_with("Wrote debug bundle:"), "status: {}", app.status);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
