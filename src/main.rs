//! Binary entry point that glues the SQLite-backed joke store to the TUI: load
//! configuration, start logging, open the database, restore the saved view
//! state, and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use joke_view::{
    logging, open_database, run_app, App, Config, JokeController, JokeProvider, ViewState,
};
use tracing::{error, info};

/// Returning a `Result` bubbles fatal initialization problems (an unwritable
/// data directory, a database from a newer version) up to the terminal.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;
    info!(data_dir = %config.data_dir().display(), "joke-view starting");

    let conn = open_database(&config.database_path())?;
    let state = ViewState::load(&config.preferences_path())?;
    let controller = JokeController::new(JokeProvider::new(conn));
    let mut app = App::new(controller, state)?;

    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!("event loop failed: {err:#}");
    }

    app.state()
        .save(&config.preferences_path())
        .context("failed to save view state")?;
    info!("joke-view stopped");
    result
}
