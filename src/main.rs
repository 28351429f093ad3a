//! Binary entry point that glues the SQLite-backed song library to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we set up file logging, open the store, resume any
//! persisted session, and drive the Ratatui event loop until the user exits.
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use songsmith::{data_dir, run_app, App, IdentityProvider, SqliteStore, DB_FILE_NAME};
use tracing_subscriber::EnvFilter;

/// Log file kept next to the database in the data directory. Logging cannot
/// go to stdout because the terminal is owned by the UI.
const LOG_FILE_NAME: &str = "songsmith.log";

/// Initialize logging and persistence, restore the signed-in writer if one is
/// recorded, and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable data directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let data_dir = data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    init_tracing(&data_dir)?;

    let store = SqliteStore::open_at(data_dir.join(DB_FILE_NAME))?;
    let mut app = match store.current_user()? {
        Some(account) => App::signed_in(store, account),
        None => App::signed_out(store),
    };
    run_app(&mut app)
}

fn init_tracing(dir: &Path) -> anyhow::Result<()> {
    let log_file = File::create(dir.join(LOG_FILE_NAME))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
