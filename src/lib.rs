//! Core library surface for the Songsmith TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the integration tests can reuse the same pieces.
//! The notes on the re-exports below record why each one is part of the
//! surface.
pub mod editor;
pub mod error;
pub mod models;
pub mod store;
pub mod ui;

/// Persistence entry points, typically used by `main.rs` to bring up the
/// embedded SQLite store inside the writer's data directory.
pub use store::{data_dir, SqliteStore, DB_FILE_NAME};

/// Trait seams the editor is generic over, re-exported for test doubles and
/// alternative backends.
pub use store::{IdentityProvider, SongStore};

/// The session context owning the signed-in writer's collection and draft.
pub use editor::SongEditor;

/// The primary domain types that other layers manipulate.
pub use models::{Account, Song, SongDraft};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
