//! Binds query results to the rows shown in the joke list.

use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use crate::db::JokeCursor;
use crate::models::{Joke, Rating};

/// One rendered row: the joke it shows plus the rating selector next to it.
///
/// The selector behaves like a radio group: whenever the displayed rating
/// changes and a listener is attached, the listener receives the joke with its
/// new rating.
#[derive(Debug)]
pub struct JokeRowView {
    joke: Joke,
    displayed: Rating,
    listener: Option<Sender<Joke>>,
}

impl JokeRowView {
    pub fn new(joke: Joke) -> Self {
        let displayed = joke.rating;
        Self {
            joke,
            displayed,
            listener: None,
        }
    }

    pub fn joke(&self) -> &Joke {
        &self.joke
    }

    pub fn set_on_joke_change_listener(&mut self, listener: Option<Sender<Joke>>) {
        self.listener = listener;
    }

    /// Show a different joke in this row.
    pub fn set_joke(&mut self, joke: Joke) {
        let rating = joke.rating;
        self.joke = joke;
        self.show_rating(rating);
    }

    /// The user picked a rating for this row.
    pub fn select_rating(&mut self, rating: Rating) {
        self.joke.rating = rating;
        self.show_rating(rating);
    }

    fn show_rating(&mut self, rating: Rating) {
        if self.displayed == rating {
            return;
        }
        self.displayed = rating;
        if let Some(listener) = &self.listener {
            // A closed channel only means nobody listens anymore.
            let _ = listener.send(self.joke.clone());
        }
    }

    pub fn to_list_item(&self) -> ListItem<'static> {
        let marker = |rating: Rating, symbol: &'static str, color: Color| {
            if self.displayed == rating {
                Span::styled(
                    format!("[{symbol}]"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {symbol} "), Style::default().fg(Color::DarkGray))
            }
        };

        ListItem::new(Line::from(vec![
            marker(Rating::Liked, "+", Color::Green),
            marker(Rating::Disliked, "-", Color::Red),
            Span::raw(" "),
            Span::raw(self.joke.text.clone()),
        ]))
    }
}

/// Owns the current result set and hands out row views for its positions.
#[derive(Debug, Default)]
pub struct JokeListAdapter {
    cursor: Option<JokeCursor>,
    listener: Option<Sender<Joke>>,
}

impl JokeListAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_joke_change_listener(&mut self, listener: Sender<Joke>) {
        self.listener = Some(listener);
    }

    /// Replace the result set, returning the previous one.
    pub fn swap_cursor(&mut self, cursor: Option<JokeCursor>) -> Option<JokeCursor> {
        std::mem::replace(&mut self.cursor, cursor)
    }

    pub fn cursor(&self) -> Option<&JokeCursor> {
        self.cursor.as_ref()
    }

    pub fn count(&self) -> usize {
        self.cursor.as_ref().map_or(0, JokeCursor::len)
    }

    pub fn joke_at(&mut self, position: usize) -> Result<Joke> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| anyhow!("no jokes loaded"))?;
        if !cursor.move_to_position(position) {
            return Err(anyhow!("no joke at position {position}"));
        }
        Ok(Joke::from_cursor(cursor)?)
    }

    /// Row view for `position`, reusing `convert_view` when one is available.
    pub fn get_view(
        &mut self,
        position: usize,
        convert_view: Option<JokeRowView>,
    ) -> Result<JokeRowView> {
        let joke = self.joke_at(position)?;
        Ok(match convert_view {
            Some(mut view) => {
                self.bind_view(&mut view, joke);
                view
            }
            None => self.new_view(joke),
        })
    }

    fn new_view(&self, joke: Joke) -> JokeRowView {
        let mut view = JokeRowView::new(joke);
        view.set_on_joke_change_listener(self.listener.clone());
        view
    }

    /// Rebinding changes the displayed rating, which would otherwise report a
    /// rating change for a joke the user never touched.
    fn bind_view(&self, view: &mut JokeRowView, joke: Joke) {
        view.set_on_joke_change_listener(None);
        view.set_joke(joke);
        view.set_on_joke_change_listener(self.listener.clone());
    }
}
