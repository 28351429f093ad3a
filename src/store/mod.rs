//! Persistence layer: the record-store seam plus the shipped SQLite backend.
//!
//! The editor core talks to [`SongStore`] and [`IdentityProvider`] only, so
//! the backend can be swapped (or faked in tests) without touching session
//! logic. [`SqliteStore`] is the implementation the binary wires up.

mod sqlite;

pub use sqlite::{data_dir, SqliteStore, DB_FILE_NAME};

use crate::error::StoreError;
use crate::models::{Account, Song, SongDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Column a song listing is sorted by.
pub enum SortKey {
    UpdatedAt,
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Direction applied to the sort key.
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Ordering request passed to [`SongStore::list_songs`]. Implementations
/// break ties on the song id in the same direction so listings stay stable
/// when two rows share a timestamp.
pub struct SongOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SongOrder {
    /// Most recently updated first. This is the collection manager's default
    /// and what drives the sidebar ordering.
    pub const RECENT_FIRST: SongOrder = SongOrder {
        key: SortKey::UpdatedAt,
        direction: SortDirection::Descending,
    };
}

impl Default for SongOrder {
    fn default() -> Self {
        SongOrder::RECENT_FIRST
    }
}

/// Keyed record store for songs. Every method is scoped to an owning account
/// id: implementations must never return or touch another owner's rows, so a
/// forged id in a request can only ever reach the caller's own data.
///
/// Mutations either fully apply or fully fail. `update_song` and
/// `delete_song` report [`StoreError::NotFound`] when no row matched, which
/// callers treat as non-fatal (the record was already gone).
pub trait SongStore {
    /// All songs for `owner` in the requested order.
    fn list_songs(&self, owner: i64, order: SongOrder) -> Result<Vec<Song>, StoreError>;

    /// Persist a new song from the draft and return the stored record with
    /// its assigned id and timestamps.
    fn insert_song(&self, owner: i64, draft: &SongDraft) -> Result<Song, StoreError>;

    /// Overwrite all four editable fields of the identified song and bump its
    /// `updated_at`. Never a partial update.
    fn update_song(&self, owner: i64, id: i64, draft: &SongDraft) -> Result<(), StoreError>;

    /// Remove the identified song.
    fn delete_song(&self, owner: i64, id: i64) -> Result<(), StoreError>;
}

/// Source of the signed-in identity. `Ok(None)` means nobody is signed in
/// and the caller must show the sign-in surface instead of an editor.
pub trait IdentityProvider {
    fn current_user(&self) -> Result<Option<Account>, StoreError>;
}
