//! SQLite-backed implementation of the record store. One file under the
//! user's home holds profiles, songs, and the signed-in session, so the
//! whole studio travels as a single database.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, Row};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::{Account, Genre, Mood, Song, SongDraft};
use crate::store::{IdentityProvider, SongOrder, SongStore, SortDirection, SortKey};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".songsmith";
/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "songsmith.sqlite";

/// Resolve the application data directory beneath the user's home. The
/// database and the log file both live here.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| StoreError::Unavailable("could not locate home directory".into()))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Embedded SQLite record store. Also acts as the identity provider by
/// persisting the signed-in profile in a single-row table, so relaunching
/// the app resumes the previous session.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at an explicit path and run
    /// lazy migrations. The parent directory is created as well so first
    /// launches work on a clean machine.
    pub fn open_at(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                StoreError::Unavailable(format!("failed to create data directory: {err}"))
            })?;
        }

        let conn =
            Connection::open(db_path).map_err(unavailable("failed to open SQLite database"))?;
        ensure_schema(&conn)?;

        info!(path = %db_path.display(), "opened song store");
        Ok(SqliteStore { conn })
    }

    /// Open a throwaway in-memory store. Used by the test suites so they
    /// never touch the real data directory.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(unavailable("failed to open in-memory store"))?;
        ensure_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Every profile on this machine, sorted by name for the sign-in list.
    pub fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM accounts ORDER BY name COLLATE NOCASE")
            .map_err(unavailable("failed to prepare profile query"))?;

        let accounts = stmt
            .query_map([], row_to_account)
            .map_err(unavailable("failed to load profiles"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable("failed to collect profiles"))?;

        Ok(accounts)
    }

    /// Create a new profile, returning the hydrated record so the caller can
    /// sign it in without re-querying.
    pub fn create_account(&self, name: &str) -> Result<Account, StoreError> {
        self.conn
            .execute("INSERT INTO accounts (name) VALUES (?1)", params![name])
            .map_err(|err| map_unique_name(err, name))?;

        let id = self.conn.last_insert_rowid();
        let created_at: String = self
            .conn
            .query_row(
                "SELECT created_at FROM accounts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(unavailable("failed to read created profile"))?;

        info!(id, name, "created profile");
        Ok(Account {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    /// Mark a profile as the signed-in session. Replaces any previous
    /// session; there is at most one signed-in profile per store.
    pub fn sign_in(&self, account_id: i64) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO active_session (id, account_id) VALUES (0, ?1)",
                params![account_id],
            )
            .map_err(unavailable("failed to sign in"))?;

        debug!(account_id, "signed in");
        Ok(())
    }

    /// Clear the signed-in session. Idempotent: signing out twice is fine.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM active_session", [])
            .map_err(unavailable("failed to sign out"))?;

        debug!("signed out");
        Ok(())
    }

    /// Read back one song by id, scoped to its owner. Insert uses this to
    /// hydrate the store-assigned id and timestamps.
    fn fetch_song(&self, owner: i64, id: i64) -> Result<Song, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, owner, title, lyrics, genre, mood, created_at, updated_at
                 FROM songs
                 WHERE owner = ?1 AND id = ?2",
            )
            .map_err(unavailable("failed to prepare song fetch"))?;

        match stmt.query_row(params![owner, id], row_to_song) {
            Ok(song) => Ok(song),
            Err(SqlError::QueryReturnedNoRows) => Err(StoreError::NotFound),
            Err(err) => Err(unavailable("failed to fetch song")(err)),
        }
    }
}

impl SongStore for SqliteStore {
    fn list_songs(&self, owner: i64, order: SongOrder) -> Result<Vec<Song>, StoreError> {
        // ORDER BY cannot be a bound parameter; the clause is assembled from
        // the closed enum instead of caller text.
        let sql = format!(
            "SELECT id, owner, title, lyrics, genre, mood, created_at, updated_at
             FROM songs
             WHERE owner = ?1
             ORDER BY {}",
            order_clause(order)
        );

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(unavailable("failed to prepare song list query"))?;

        let songs = stmt
            .query_map([owner], row_to_song)
            .map_err(unavailable("failed to iterate songs"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable("failed to collect songs"))?;

        Ok(songs)
    }

    fn insert_song(&self, owner: i64, draft: &SongDraft) -> Result<Song, StoreError> {
        self.conn
            .execute(
                "INSERT INTO songs (owner, title, lyrics, genre, mood)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    owner,
                    draft.title,
                    draft.lyrics,
                    draft.genre.as_str(),
                    draft.mood.as_str()
                ],
            )
            .map_err(unavailable("failed to insert song"))?;

        let id = self.conn.last_insert_rowid();
        debug!(id, owner, "inserted song");

        // Re-read the row so the caller sees the store-assigned timestamps.
        self.fetch_song(owner, id)
    }

    fn update_song(&self, owner: i64, id: i64, draft: &SongDraft) -> Result<(), StoreError> {
        let updated = self
            .conn
            .execute(
                "UPDATE songs
                 SET title = ?1, lyrics = ?2, genre = ?3, mood = ?4,
                     updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
                 WHERE owner = ?5 AND id = ?6",
                params![
                    draft.title,
                    draft.lyrics,
                    draft.genre.as_str(),
                    draft.mood.as_str(),
                    owner,
                    id
                ],
            )
            .map_err(unavailable("failed to update song"))?;

        if updated == 0 {
            Err(StoreError::NotFound)
        } else {
            debug!(id, owner, "updated song");
            Ok(())
        }
    }

    fn delete_song(&self, owner: i64, id: i64) -> Result<(), StoreError> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM songs WHERE owner = ?1 AND id = ?2",
                params![owner, id],
            )
            .map_err(unavailable("failed to delete song"))?;

        if deleted == 0 {
            Err(StoreError::NotFound)
        } else {
            debug!(id, owner, "deleted song");
            Ok(())
        }
    }
}

impl IdentityProvider for SqliteStore {
    fn current_user(&self) -> Result<Option<Account>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT a.id, a.name, a.created_at
                 FROM accounts a
                 INNER JOIN active_session s ON s.account_id = a.id",
            )
            .map_err(unavailable("failed to prepare session query"))?;

        match stmt.query_row([], row_to_account) {
            Ok(account) => Ok(Some(account)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(unavailable("failed to read active session")(err)),
        }
    }
}

/// Run lazy migrations and toggle `PRAGMA foreign_keys = ON` so the
/// referential integrity checks in the schema behave the same during tests
/// and production runs.
fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(unavailable("failed to enable foreign keys"))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        )",
        [],
    )
    .map_err(unavailable("failed to create accounts table"))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner INTEGER NOT NULL,
            title TEXT NOT NULL,
            lyrics TEXT NOT NULL,
            genre TEXT NOT NULL,
            mood TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            FOREIGN KEY(owner) REFERENCES accounts(id) ON DELETE CASCADE
        )",
        [],
    )
    .map_err(unavailable("failed to create songs table"))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS active_session (
            id INTEGER PRIMARY KEY CHECK (id = 0),
            account_id INTEGER NOT NULL,
            FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE
        )",
        [],
    )
    .map_err(unavailable("failed to create session table"))?;

    Ok(())
}

/// ORDER BY fragment for a listing request. The id tiebreaker keeps rows
/// with identical timestamps in a stable order.
fn order_clause(order: SongOrder) -> &'static str {
    match (order.key, order.direction) {
        (SortKey::UpdatedAt, SortDirection::Descending) => "updated_at DESC, id DESC",
        (SortKey::UpdatedAt, SortDirection::Ascending) => "updated_at ASC, id ASC",
        (SortKey::CreatedAt, SortDirection::Descending) => "created_at DESC, id DESC",
        (SortKey::CreatedAt, SortDirection::Ascending) => "created_at ASC, id ASC",
        (SortKey::Title, SortDirection::Descending) => "title COLLATE NOCASE DESC, id DESC",
        (SortKey::Title, SortDirection::Ascending) => "title COLLATE NOCASE ASC, id ASC",
    }
}

/// Wrap a driver failure together with the step that was being attempted.
fn unavailable(step: &'static str) -> impl FnOnce(SqlError) -> StoreError {
    move |err| StoreError::Unavailable(format!("{step}: {err}"))
}

/// Coerce SQLite constraint errors into human-readable messages. The only
/// constraint we guard is the uniqueness of profile names.
fn map_unique_name(err: SqlError, name: &str) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::Unavailable(format!("A profile named \"{name}\" already exists."))
    } else {
        unavailable("failed to create profile")(err)
    }
}

fn row_to_song(row: &Row<'_>) -> rusqlite::Result<Song> {
    let genre_text: String = row.get(4)?;
    let mood_text: String = row.get(5)?;

    Ok(Song {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        lyrics: row.get(3)?,
        genre: normalize_genre(&genre_text),
        mood: normalize_mood(&mood_text),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

/// Rows written by this crate always hold recognized text, but a hand-edited
/// database must not poison the editor, so unknown values fall back to the
/// default rather than erroring the whole listing.
fn normalize_genre(text: &str) -> Genre {
    Genre::parse(text).unwrap_or_else(|| {
        warn!(genre = text, "unrecognized genre in store, using default");
        Genre::default()
    })
}

fn normalize_mood(text: &str) -> Mood {
    Mood::parse(text).unwrap_or_else(|| {
        warn!(mood = text, "unrecognized mood in store, using default");
        Mood::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_account() -> (SqliteStore, Account) {
        let store = SqliteStore::open_in_memory().unwrap();
        let account = store.create_account("Casey").unwrap();
        (store, account)
    }

    /// Force a row's updated_at to a known value so ordering tests do not
    /// depend on wall-clock resolution.
    fn plant_updated_at(store: &SqliteStore, id: i64, stamp: &str) {
        store
            .conn
            .execute(
                "UPDATE songs SET updated_at = ?1 WHERE id = ?2",
                params![stamp, id],
            )
            .unwrap();
    }

    #[test]
    fn insert_returns_hydrated_record() {
        let (store, account) = store_with_account();

        let song = store.insert_song(account.id, &SongDraft::default()).unwrap();
        assert!(song.id > 0);
        assert_eq!(song.owner, account.id);
        assert_eq!(song.title, "Untitled Song");
        assert!(song.lyrics.is_empty());
        assert_eq!(song.genre, Genre::Pop);
        assert_eq!(song.mood, Mood::Happy);
        // Both timestamps come from the same insert statement.
        assert_eq!(song.created_at, song.updated_at);
        assert!(!song.created_at.is_empty());
    }

    #[test]
    fn listing_is_scoped_to_owner() {
        let (store, casey) = store_with_account();
        let jordan = store.create_account("Jordan").unwrap();

        let mine = store.insert_song(casey.id, &SongDraft::default()).unwrap();
        store.insert_song(jordan.id, &SongDraft::default()).unwrap();

        let songs = store.list_songs(casey.id, SongOrder::RECENT_FIRST).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, mine.id);

        let theirs = store.list_songs(jordan.id, SongOrder::RECENT_FIRST).unwrap();
        assert_eq!(theirs.len(), 1);
        assert_ne!(theirs[0].id, mine.id);
    }

    #[test]
    fn update_overwrites_all_fields_and_bumps_timestamp() {
        let (store, account) = store_with_account();
        let song = store.insert_song(account.id, &SongDraft::default()).unwrap();
        plant_updated_at(&store, song.id, "2000-01-01 00:00:00.000");

        let draft = SongDraft {
            title: "Midnight Rain".to_string(),
            lyrics: "verse one".to_string(),
            genre: Genre::Blues,
            mood: Mood::Melancholic,
        };
        store.update_song(account.id, song.id, &draft).unwrap();

        let songs = store.list_songs(account.id, SongOrder::RECENT_FIRST).unwrap();
        assert_eq!(songs[0].title, "Midnight Rain");
        assert_eq!(songs[0].lyrics, "verse one");
        assert_eq!(songs[0].genre, Genre::Blues);
        assert_eq!(songs[0].mood, Mood::Melancholic);
        assert!(songs[0].updated_at.as_str() > "2000-01-01 00:00:00.000");
        assert_eq!(songs[0].created_at, song.created_at);
    }

    #[test]
    fn update_missing_song_reports_not_found() {
        let (store, account) = store_with_account();
        let err = store
            .update_song(account.id, 9999, &SongDraft::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn mutating_another_owners_song_reports_not_found() {
        let (store, casey) = store_with_account();
        let jordan = store.create_account("Jordan").unwrap();
        let song = store.insert_song(casey.id, &SongDraft::default()).unwrap();

        let err = store
            .update_song(jordan.id, song.id, &SongDraft::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        let err = store.delete_song(jordan.id, song.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        // The song is untouched for its real owner.
        assert_eq!(
            store.list_songs(casey.id, SongOrder::RECENT_FIRST).unwrap().len(),
            1
        );
    }

    #[test]
    fn delete_removes_row_and_reports_missing_ids() {
        let (store, account) = store_with_account();
        let song = store.insert_song(account.id, &SongDraft::default()).unwrap();

        store.delete_song(account.id, song.id).unwrap();
        assert!(store
            .list_songs(account.id, SongOrder::RECENT_FIRST)
            .unwrap()
            .is_empty());

        let err = store.delete_song(account.id, song.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn recent_first_ordering_breaks_ties_by_id() {
        let (store, account) = store_with_account();
        let first = store.insert_song(account.id, &SongDraft::default()).unwrap();
        let second = store.insert_song(account.id, &SongDraft::default()).unwrap();
        let third = store.insert_song(account.id, &SongDraft::default()).unwrap();

        plant_updated_at(&store, first.id, "2026-01-03 12:00:00.000");
        plant_updated_at(&store, second.id, "2026-01-01 12:00:00.000");
        plant_updated_at(&store, third.id, "2026-01-02 12:00:00.000");

        let songs = store.list_songs(account.id, SongOrder::RECENT_FIRST).unwrap();
        let ids: Vec<i64> = songs.iter().map(|song| song.id).collect();
        assert_eq!(ids, vec![first.id, third.id, second.id]);

        // Identical timestamps fall back to the newer id first.
        plant_updated_at(&store, first.id, "2026-01-01 12:00:00.000");
        plant_updated_at(&store, third.id, "2026-01-01 12:00:00.000");
        let songs = store.list_songs(account.id, SongOrder::RECENT_FIRST).unwrap();
        let ids: Vec<i64> = songs.iter().map(|song| song.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn title_ordering_ignores_case() {
        let (store, account) = store_with_account();
        for title in ["banana", "Apple", "cherry"] {
            let draft = SongDraft {
                title: title.to_string(),
                ..SongDraft::default()
            };
            store.insert_song(account.id, &draft).unwrap();
        }

        let order = SongOrder {
            key: SortKey::Title,
            direction: SortDirection::Ascending,
        };
        let titles: Vec<String> = store
            .list_songs(account.id, order)
            .unwrap()
            .into_iter()
            .map(|song| song.title)
            .collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn unknown_genre_and_mood_text_normalize_to_defaults() {
        let (store, account) = store_with_account();
        let song = store.insert_song(account.id, &SongDraft::default()).unwrap();

        store
            .conn
            .execute(
                "UPDATE songs SET genre = 'Shoegaze', mood = 'Confused' WHERE id = ?1",
                params![song.id],
            )
            .unwrap();

        let songs = store.list_songs(account.id, SongOrder::RECENT_FIRST).unwrap();
        assert_eq!(songs[0].genre, Genre::Pop);
        assert_eq!(songs[0].mood, Mood::Happy);
    }

    #[test]
    fn duplicate_profile_names_are_rejected() {
        let (store, _) = store_with_account();
        let err = store.create_account("Casey").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn session_survives_reopening_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join(DB_FILE_NAME);

        {
            let store = SqliteStore::open_at(&db_path).unwrap();
            let account = store.create_account("Casey").unwrap();
            store.sign_in(account.id).unwrap();
        }

        let store = SqliteStore::open_at(&db_path).unwrap();
        let user = store.current_user().unwrap().expect("session persisted");
        assert_eq!(user.name, "Casey");

        store.sign_out().unwrap();
        assert!(store.current_user().unwrap().is_none());
    }

    #[test]
    fn fresh_store_has_no_signed_in_user() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.current_user().unwrap().is_none());
    }
}
