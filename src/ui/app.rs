use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::controller::JokeController;
use crate::models::{Rating, RatingFilter};
use crate::prefs::ViewState;

use super::adapter::JokeRowView;
use super::forms::{edit_draft, ConfirmJokeRemove, DraftAction};
use super::helpers::{centered_rect, filter_badge, surface_error};
use super::screens::FilterMenu;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Bordered single-line input for the draft.
const INPUT_HEIGHT: u16 = 3;
const PROMPT: &str = "> ";

/// Which part of the screen receives key presses.
enum Mode {
    Normal,
    Editing,
    ChoosingFilter(FilterMenu),
    ConfirmRemove(ConfirmJokeRemove),
}

struct StatusMessage {
    text: String,
    kind: StatusKind,
}

enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal front-end state: the controller plus what is on screen.
pub struct App {
    controller: JokeController,
    state: ViewState,
    rows: Vec<JokeRowView>,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Load the list for the restored filter and bind the first rows.
    pub fn new(controller: JokeController, state: ViewState) -> Result<Self> {
        let mut app = Self {
            controller,
            state,
            rows: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            status: None,
        };
        app.controller.refresh(&app.state)?;
        app.sync_rows()?;
        Ok(app)
    }

    /// Current filter and draft, saved by the caller on exit.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Handle one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Editing => self.handle_editing_key(code)?,
            Mode::ChoosingFilter(menu) => self.handle_filter_menu(code, menu)?,
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm)?,
        };

        Ok(exit)
    }

    /// Ctrl+U empties the draft from any mode.
    pub(crate) fn handle_ctrl_u(&mut self) {
        self.state.draft.clear();
    }

    /// Called between key presses; picks up writes that landed since the list
    /// was last read.
    pub(crate) fn tick(&mut self) -> Result<()> {
        if self.controller.refresh_if_stale(&self.state)? {
            self.sync_rows()?;
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => {
                self.clear_status();
                return Ok(Mode::Editing);
            }
            KeyCode::Char('l') => self.rate_selected(Rating::Liked)?,
            KeyCode::Char('d') => self.rate_selected(Rating::Disliked)?,
            KeyCode::Char('u') => self.rate_selected(Rating::Unrated)?,
            KeyCode::Char('f') => {
                self.clear_status();
                return Ok(Mode::ChoosingFilter(FilterMenu::new(self.state.filter)));
            }
            KeyCode::Char(digit @ '1'..='4') => {
                let index = digit as usize - '1' as usize;
                self.apply_filter(RatingFilter::ALL[index])?;
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(joke) = self.rows.get(self.selected).map(|view| view.joke().clone()) {
                    self.clear_status();
                    return Ok(Mode::ConfirmRemove(ConfirmJokeRemove::from(joke)));
                }
                self.set_status("No joke selected to remove.", StatusKind::Error);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_editing_key(&mut self, code: KeyCode) -> Result<Mode> {
        match edit_draft(&mut self.state.draft, code) {
            DraftAction::Leave => return Ok(Mode::Normal),
            DraftAction::Submit => match self.controller.add_joke_from_draft(&mut self.state) {
                Ok(Some(joke)) => {
                    self.sync_rows()?;
                    if let Some(position) = self.rows.iter().position(|row| row.joke().id == joke.id)
                    {
                        self.selected = position;
                    }
                    self.set_status("Joke added.", StatusKind::Info);
                }
                Ok(None) => self.set_status("Type a joke first.", StatusKind::Error),
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            DraftAction::Edited | DraftAction::Ignored => {}
        }
        Ok(Mode::Editing)
    }

    fn handle_filter_menu(&mut self, code: KeyCode, mut menu: FilterMenu) -> Result<Mode> {
        match code {
            KeyCode::Esc => return Ok(Mode::Normal),
            KeyCode::Up | KeyCode::Char('k') => menu.move_by(-1),
            KeyCode::Down | KeyCode::Char('j') => menu.move_by(1),
            KeyCode::Enter => {
                self.apply_filter(menu.current())?;
                return Ok(Mode::Normal);
            }
            _ => {}
        }
        Ok(Mode::ChoosingFilter(menu))
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmJokeRemove) -> Result<Mode> {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.controller.remove_joke(&mut self.state, &confirm.joke) {
                    Ok(0) => self.set_status("Joke was already gone.", StatusKind::Error),
                    Ok(_) => self.set_status("Joke removed.", StatusKind::Info),
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                self.sync_rows()?;
                Ok(Mode::Normal)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Ok(Mode::Normal),
            _ => Ok(Mode::ConfirmRemove(confirm)),
        }
    }

    fn rate_selected(&mut self, rating: Rating) -> Result<()> {
        let Some(view) = self.rows.get_mut(self.selected) else {
            self.set_status("No joke selected to rate.", StatusKind::Error);
            return Ok(());
        };
        view.select_rating(rating);

        match self.controller.dispatch_pending_changes(&mut self.state) {
            Ok(0) => {}
            Ok(_) => self.set_status(format!("Marked as {}.", rating.label()), StatusKind::Info),
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
        self.sync_rows()
    }

    fn apply_filter(&mut self, filter: RatingFilter) -> Result<()> {
        match self.controller.set_filter(&mut self.state, filter) {
            Ok(()) => {
                self.selected = 0;
                self.set_status(format!("Showing {}.", filter.label()), StatusKind::Info);
            }
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
        self.sync_rows()
    }

    /// Rebind row views to the adapter's current result, reusing the views
    /// from the previous pass.
    fn sync_rows(&mut self) -> Result<()> {
        let mut recycled = mem::take(&mut self.rows);
        let count = self.controller.adapter().count();
        let mut rows = Vec::with_capacity(count);
        for position in 0..count {
            let view = self
                .controller
                .adapter_mut()
                .get_view(position, recycled.pop())?;
            rows.push(view);
        }
        self.rows = rows;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        Ok(())
    }

    fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_jokes(frame, chunks[1]);
        self.draw_input(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        match &self.mode {
            Mode::ChoosingFilter(menu) => self.draw_filter_menu(frame, area, menu),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Normal | Mode::Editing => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled("Jokes", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  filter:"),
            filter_badge(self.state.filter),
            Span::styled(
                format!("({})", self.rows.len()),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_jokes(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        if self.rows.is_empty() {
            let message = match self.state.filter {
                RatingFilter::ShowAll => "No jokes yet. Press 'a' to add one.".to_string(),
                filter => format!("No {} jokes.", filter.label().to_lowercase()),
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self.rows.iter().map(JokeRowView::to_list_item).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        if !matches!(self.mode, Mode::Editing) {
            list_state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect) {
        let editing = matches!(self.mode, Mode::Editing);
        let border_style = if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title("New joke")
            .border_style(border_style);
        let paragraph = Paragraph::new(format!("{PROMPT}{}", self.state.draft)).block(block.clone());
        frame.render_widget(paragraph, area);

        if editing {
            let inner = block.inner(area);
            let offset = u16::try_from(PROMPT.chars().count() + self.state.draft.chars().count())
                .unwrap_or(u16::MAX);
            let cursor_x = inner.x.saturating_add(offset);
            frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match &self.status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.kind.style())),
            None => Line::from(""),
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&'static str, &'static str)] = match self.mode {
            Mode::Normal => &[
                ("[↑↓]", " Move   "),
                ("[a]", " Add   "),
                ("[l/d/u]", " Like/Dislike/Clear   "),
                ("[f]", " Filter   "),
                ("[x]", " Remove   "),
                ("[q]", " Quit"),
            ],
            Mode::Editing => &[
                ("[Enter]", " Add joke   "),
                ("[Ctrl+U]", " Clear   "),
                ("[Esc]", " Back to list"),
            ],
            Mode::ChoosingFilter(_) => &[
                ("[↑↓]", " Choose   "),
                ("[Enter]", " Apply   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmRemove(_) => &[("[Y]", " Remove   "), ("[N]", " Keep")],
        };

        Line::from(
            keys.iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_filter_menu(&self, frame: &mut Frame, area: Rect, menu: &FilterMenu) {
        let popup_area = centered_rect(40, 40, area);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = RatingFilter::ALL
            .iter()
            .enumerate()
            .map(|(index, filter)| ListItem::new(format!("{} {}", index + 1, filter.label())))
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Filter").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(menu.selected));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmJokeRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let max_chars = (inner.width as usize).saturating_sub(12).max(8);
        let lines = vec![
            Line::from(confirm.prompt(max_chars)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
