//! Core library surface for the Joke View TUI application.
//!
//! The binary only wires these pieces together: configuration and logging,
//! the SQLite-backed joke provider, the controller that turns user actions
//! into provider calls, and the terminal front-end.
pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod models;
pub mod prefs;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use db::{open_database, JokeProvider, Locator, ProviderError};

/// The domain types other layers manipulate.
pub use models::{Joke, Rating, RatingFilter};

pub use config::Config;
pub use controller::JokeController;
pub use prefs::ViewState;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
