use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io::{self, Write};
use std::sync::Once;
use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::i18n::I18n;
use crate::present;
use crate::view::{Outcome, ResultView, ViewState};

// Upper bound on how long the loop sleeps waiting for input
const IDLE_POLL: Duration = Duration::from_millis(250);
// Table borders plus header row
const TABLE_CHROME: u16 = 3;

pub struct Browser<'a> {
    view: &'a ResultView<'a>,
    i18n: &'a I18n,
    state: ViewState,
    input: String,
    debouncer: Debouncer<String>,
    selected: usize,
    scroll_offset: usize,
    viewport: usize,
    // Set by navigation, resize and fresh lists; a failed load clears it
    scroll_armed: bool,
}

impl<'a> Browser<'a> {
    pub fn new(view: &'a ResultView<'a>, i18n: &'a I18n, quiet: Duration) -> Self {
        let mut state = ViewState::new();
        let first = view.load_next_page(&mut state);
        Self {
            view,
            i18n,
            state,
            input: String::new(),
            debouncer: Debouncer::new(quiet),
            selected: 0,
            scroll_offset: 0,
            viewport: 20,
            scroll_armed: matches!(first, Outcome::Appended(_)),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return matches!(
                key.code,
                KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('d') | KeyCode::Char('D')
            );
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-(self.viewport as isize)),
            KeyCode::PageDown => self.move_selection(self.viewport as isize),
            KeyCode::Home => self.move_selection(isize::MIN / 2),
            KeyCode::End => self.move_selection(isize::MAX / 2),
            KeyCode::Enter => {
                // Skip the wait
                if let Some(value) = self.debouncer.cancel() {
                    self.dispatch(&value);
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.debouncer.schedule(self.input.clone(), now);
            }
            KeyCode::Delete => {
                self.input.clear();
                self.debouncer.schedule(String::new(), now);
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.debouncer.schedule(self.input.clone(), now);
            }
            _ => {}
        }
        false
    }

    /// Fire a due search and top up the list if the view is near its end.
    pub fn tick(&mut self, now: Instant) {
        if let Some(value) = self.debouncer.poll(now) {
            self.dispatch(&value);
        }
        if !self.scroll_armed {
            return;
        }
        match self.view.on_scroll(&mut self.state, self.viewport, self.scroll_offset) {
            // Keep topping up while the window is still near the end
            Outcome::Appended(_) => {}
            Outcome::Failed => {
                tracing::debug!("scroll-triggered load failed");
                self.scroll_armed = false;
            }
            _ => self.scroll_armed = false,
        }
    }

    fn resize(&mut self, viewport: usize) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.scroll_armed = true;
        }
    }

    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.debouncer
            .time_until_due(now)
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL))
    }

    fn dispatch(&mut self, value: &str) {
        tracing::debug!(input = value, "dispatching query");
        match self.view.dispatch(&mut self.state, value) {
            Outcome::Skipped => {}
            outcome => {
                self.selected = 0;
                self.scroll_offset = 0;
                self.scroll_armed = outcome != Outcome::Failed;
            }
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.state.rows().len();
        self.scroll_armed = true;
        if len == 0 {
            return;
        }
        let target = (self.selected as isize)
            .saturating_add(delta)
            .clamp(0, len as isize - 1);
        self.selected = target as usize;
        self.keep_selection_visible();
    }

    fn keep_selection_visible(&mut self) {
        let viewport = self.viewport.max(1);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + viewport {
            self.scroll_offset = self.selected + 1 - viewport;
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(TABLE_CHROME + 1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(f.size());

        self.resize(chunks[2].height.saturating_sub(TABLE_CHROME).max(1) as usize);
        self.keep_selection_visible();

        let prompt = Line::from(vec![
            Span::styled(
                format!("{}: ", self.i18n.t("search_prompt")),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(self.input.as_str()),
            Span::styled("▏", Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(prompt), chunks[0]);

        let status = present::status_text(self.state.status(), self.i18n);
        f.render_widget(
            Paragraph::new(Span::styled(status, Style::default().fg(Color::Green))),
            chunks[1],
        );

        let end = (self.scroll_offset + self.viewport).min(self.state.rows().len());
        let rows: Vec<Row> = self.state.rows()[self.scroll_offset.min(end)..end]
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let row = Row::new(vec![
                    Cell::from(entry.display_term()),
                    Cell::from(entry.display_translation()),
                ]);
                if self.scroll_offset + i == self.selected {
                    row.style(Style::default().bg(Color::Blue).fg(Color::White))
                } else {
                    row
                }
            })
            .collect();
        let header = Row::new(vec![
            Cell::from(self.i18n.t("column_term")),
            Cell::from(self.i18n.t("column_translation")),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));
        let table = Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
            .header(header)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(table, chunks[2]);

        if let Some(notice) = self.state.notice() {
            f.render_widget(
                Paragraph::new(Span::styled(
                    present::notice_text(notice, self.i18n),
                    Style::default().fg(Color::Red),
                )),
                chunks[3],
            );
        }

        f.render_widget(
            Paragraph::new(Span::styled(
                self.i18n.t("navigate_hint"),
                Style::default().fg(Color::DarkGray),
            )),
            chunks[4],
        );
    }
}

/// Full-screen browser. Returns `Ok(false)` when raw mode is unavailable so
/// the caller can fall back to the simple mode.
pub fn run(view: &ResultView, i18n: &I18n, quiet: Duration, use_alt_screen: bool) -> Result<bool> {
    static INIT_CTRL_C: Once = Once::new();
    INIT_CTRL_C.call_once(|| {
        let _ = ctrlc::set_handler(move || {
            // Best-effort restore terminal state and exit with 130
            let _ = terminal::disable_raw_mode();
            print!("\x1b[?25h\x1b[?1049l");
            let _ = io::stdout().flush();
            std::process::exit(130);
        });
    });

    if let Err(e) = terminal::enable_raw_mode() {
        tracing::warn!(error = %e, "raw mode unavailable");
        return Ok(false);
    }

    let mut stdout = io::stdout();
    if use_alt_screen {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut browser = Browser::new(view, i18n, quiet);
    let result = event_loop(&mut terminal, &mut browser);

    // Restore terminal settings before surfacing any error
    terminal.clear().ok();
    terminal.show_cursor().ok();
    if use_alt_screen {
        execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    }
    terminal::disable_raw_mode().ok();

    result.map(|_| true)
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, browser: &mut Browser) -> Result<()> {
    loop {
        browser.tick(Instant::now());
        terminal.draw(|f| browser.draw(f))?;

        if event::poll(browser.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if browser.handle_key(key, Instant::now()) {
                        return Ok(());
                    }
                }
                // Resize and the rest just trigger the next redraw
                _ => {}
            }
        }
    }
}
