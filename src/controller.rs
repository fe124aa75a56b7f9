//! User actions on jokes, expressed as provider calls followed by a refresh of
//! the list adapter. The controller keeps no filter or draft of its own; every
//! operation works on the [`ViewState`] it is handed.

use std::sync::mpsc::{self, Receiver};

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::db::{Column, ContentValues, JokeProvider, Locator};
use crate::models::{Joke, RatingFilter};
use crate::prefs::ViewState;
use crate::ui::adapter::JokeListAdapter;

pub struct JokeController {
    provider: JokeProvider,
    adapter: JokeListAdapter,
    rating_changes: Receiver<Joke>,
}

impl JokeController {
    pub fn new(provider: JokeProvider) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut adapter = JokeListAdapter::new();
        adapter.set_on_joke_change_listener(tx);
        Self {
            provider,
            adapter,
            rating_changes: rx,
        }
    }

    pub fn adapter(&self) -> &JokeListAdapter {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut JokeListAdapter {
        &mut self.adapter
    }

    /// Store a new unrated joke. Blank text is ignored and yields `None`.
    pub fn add_joke(&mut self, state: &mut ViewState, text: &str) -> Result<Option<Joke>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let mut joke = Joke::new(text);
        let created = self
            .provider
            .insert(&Locator::new_record().to_string(), &joke.to_values())
            .context("failed to insert joke")?;
        joke.id = created
            .record_id()
            .ok_or_else(|| anyhow!("insert returned {created} without an id"))?;
        info!(id = joke.id, "added joke");

        self.refresh(state)?;
        Ok(Some(joke))
    }

    /// Add whatever is in the draft and clear it once the joke is stored.
    pub fn add_joke_from_draft(&mut self, state: &mut ViewState) -> Result<Option<Joke>> {
        let draft = state.draft.clone();
        let added = self.add_joke(state, &draft)?;
        if added.is_some() {
            state.draft.clear();
        }
        Ok(added)
    }

    pub fn set_filter(&mut self, state: &mut ViewState, filter: RatingFilter) -> Result<()> {
        state.filter = filter;
        info!(filter = filter.label(), "filter changed");
        self.refresh(state)
    }

    /// Persist the joke's current rating.
    pub fn on_rating_changed(&mut self, state: &mut ViewState, joke: &Joke) -> Result<usize> {
        let mut values = ContentValues::new();
        values.put_rating(Column::Rating, joke.rating);
        let updated = self
            .provider
            .update(&Locator::record(joke.id).to_string(), &values)
            .context("failed to update joke rating")?;
        info!(id = joke.id, rating = joke.rating.label(), updated, "rated joke");

        self.refresh(state)?;
        Ok(updated)
    }

    pub fn remove_joke(&mut self, state: &mut ViewState, joke: &Joke) -> Result<usize> {
        let removed = self
            .provider
            .delete(&Locator::record(joke.id).to_string())
            .context("failed to delete joke")?;
        info!(id = joke.id, removed, "removed joke");

        self.refresh(state)?;
        Ok(removed)
    }

    /// Re-read the list for the current filter and hand it to the adapter.
    pub fn refresh(&mut self, state: &ViewState) -> Result<()> {
        let projection: Vec<&str> = Column::ALL.iter().map(|column| column.name()).collect();
        let cursor = self
            .provider
            .query(&Locator::filter(state.filter).to_string(), Some(projection.as_slice()))
            .context("failed to load jokes")?;
        drop(self.adapter.swap_cursor(Some(cursor)));
        Ok(())
    }

    /// Refresh only when a write reached the current result since it was read.
    pub fn refresh_if_stale(&mut self, state: &ViewState) -> Result<bool> {
        let stale = self
            .adapter
            .cursor()
            .map_or(true, |cursor| cursor.has_changed());
        if stale {
            self.refresh(state)?;
        }
        Ok(stale)
    }

    /// Persist rating changes reported by row views. Returns how many were
    /// applied.
    pub fn dispatch_pending_changes(&mut self, state: &mut ViewState) -> Result<usize> {
        let pending: Vec<Joke> = self.rating_changes.try_iter().collect();
        for joke in &pending {
            self.on_rating_changed(state, joke)?;
        }
        Ok(pending.len())
    }
}
