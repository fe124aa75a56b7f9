//! Ratatui front-end: one list of jokes, an input line for new ones, and
//! popups for choosing a filter and confirming removals.

pub mod adapter;
mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use adapter::{JokeListAdapter, JokeRowView};
pub use app::App;
pub use terminal::run_app;
