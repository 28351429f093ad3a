//! The editor core: one signed-in account's view of its song collection and
//! editing session. Every store round trip funnels through [`SongEditor`] so
//! the consistency rules (reload after mutation, busy gating, selection
//! cleanup) live in exactly one place and the UI stays a thin shell.

mod collection;
mod session;
mod suggest;

pub use collection::SongCollection;
pub use session::EditingSession;
pub use suggest::{CannedSuggestions, SuggestionProvider, SUGGESTIONS};

use tracing::{debug, info, warn};

use crate::error::{EditorError, StoreError};
use crate::models::{Account, Genre, Mood, Song, SongDraft};
use crate::store::{SongOrder, SongStore};

/// Facade over the collection, the editing session, and the record store,
/// built for exactly one signed-in account. Constructed after the identity
/// check succeeds and torn down (via [`SongEditor::into_store`]) on
/// sign-out, so editing state can never outlive or leak across sessions.
///
/// Mutations are serialized by a busy flag: each one refuses to start while
/// another is outstanding and resets the flag on every exit path, success or
/// failure, so one failed call can never wedge the editor.
pub struct SongEditor<S> {
    store: S,
    account: Account,
    collection: SongCollection,
    session: EditingSession,
    suggester: Box<dyn SuggestionProvider>,
    busy: bool,
}

impl<S: SongStore> SongEditor<S> {
    /// Build an editor for the given account. No store call happens here;
    /// the caller follows up with [`SongEditor::reload`] and surfaces any
    /// failure itself.
    pub fn new(store: S, account: Account) -> Self {
        Self::with_suggester(store, account, Box::new(CannedSuggestions::new()))
    }

    /// Like [`SongEditor::new`] with an explicit suggestion provider, for
    /// tests and future smarter analyzers.
    pub fn with_suggester(
        store: S,
        account: Account,
        suggester: Box<dyn SuggestionProvider>,
    ) -> Self {
        Self {
            store,
            account,
            collection: SongCollection::new(),
            session: EditingSession::new(),
            suggester,
            busy: false,
        }
    }

    /// Tear the editor down and hand the store back, for the sign-out flow.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// The cached songs in recent-first order.
    pub fn songs(&self) -> &[Song] {
        self.collection.songs()
    }

    pub fn collection(&self) -> &SongCollection {
        &self.collection
    }

    pub fn session(&self) -> &EditingSession {
        &self.session
    }

    /// Whether a mutation is outstanding. While true, every further
    /// mutation returns [`EditorError::Busy`] instead of touching the store.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The persisted record behind the current selection, if any.
    pub fn selected_song(&self) -> Option<&Song> {
        self.session
            .selected()
            .and_then(|id| self.collection.get(id))
    }

    pub fn draft(&self) -> &SongDraft {
        self.session.draft()
    }

    /// Mutable access to the draft for keystroke-level editing. Local only;
    /// nothing reaches the store until [`SongEditor::save`].
    pub fn draft_mut(&mut self) -> &mut SongDraft {
        self.session.draft_mut()
    }

    pub fn set_title(&mut self, title: &str) {
        self.session.draft_mut().title = title.to_string();
    }

    pub fn set_lyrics(&mut self, lyrics: &str) {
        self.session.draft_mut().lyrics = lyrics.to_string();
    }

    pub fn set_genre(&mut self, genre: Genre) {
        self.session.draft_mut().genre = genre;
    }

    pub fn set_mood(&mut self, mood: Mood) {
        self.session.draft_mut().mood = mood;
    }

    /// Select a cached song by id, reseeding the draft from its persisted
    /// fields and discarding unsaved edits to the previous selection.
    pub fn select(&mut self, id: i64) {
        match self.collection.get(id) {
            Some(song) => self.session.select(song),
            None => warn!(id, "ignoring selection of a song not in the collection"),
        }
    }

    /// One writing tip for the current draft lyrics.
    pub fn suggest(&mut self) -> String {
        self.suggester.suggest(&self.session.draft().lyrics)
    }

    /// Refresh the collection from the store. On failure the previous
    /// snapshot is kept, stale but available, so the sidebar never goes
    /// blank because of one flaky call.
    pub fn reload(&mut self) -> Result<(), EditorError> {
        self.begin_mutation()?;
        let result = self.reload_inner();
        self.busy = false;
        result
    }

    /// Persist a new song with default fields, refresh the collection, and
    /// select the new song for editing.
    pub fn create_song(&mut self) -> Result<Song, EditorError> {
        self.begin_mutation()?;
        let result = self.create_song_inner();
        self.busy = false;
        result
    }

    /// Commit the draft to the selected song. Returns the refreshed record
    /// with its bumped `updated_at`. The draft is left exactly as it was,
    /// so a failed save can simply be retried.
    pub fn save(&mut self) -> Result<Song, EditorError> {
        self.begin_mutation()?;
        let result = self.save_inner();
        self.busy = false;
        result
    }

    /// Delete a song by id and refresh the collection. Deleting the
    /// selected song leaves the session empty.
    pub fn delete_song(&mut self, id: i64) -> Result<(), EditorError> {
        self.begin_mutation()?;
        let result = self.delete_song_inner(id);
        self.busy = false;
        result
    }

    /// Refuse re-entry while a mutation is outstanding.
    fn begin_mutation(&mut self) -> Result<(), EditorError> {
        if self.busy {
            return Err(EditorError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    fn reload_inner(&mut self) -> Result<(), EditorError> {
        let songs = self
            .store
            .list_songs(self.account.id, SongOrder::RECENT_FIRST)?;
        self.collection.replace(songs);

        match self.session.selected() {
            // The selected record vanished from the store. The session goes
            // empty rather than silently jumping to a different song.
            Some(id) if !self.collection.contains(id) => self.session.clear(),
            // Nothing selected: pick the most recently updated song so the
            // editor is not pointlessly blank while songs exist.
            None => {
                if let Some(first) = self.collection.first() {
                    self.session.select(first);
                }
            }
            Some(_) => {}
        }

        Ok(())
    }

    fn create_song_inner(&mut self) -> Result<Song, EditorError> {
        let created = self
            .store
            .insert_song(self.account.id, &SongDraft::default())?;
        info!(id = created.id, "created song");

        self.reload_inner()?;
        self.select(created.id);
        Ok(created)
    }

    fn save_inner(&mut self) -> Result<Song, EditorError> {
        let id = self.session.selected().ok_or(EditorError::NoSelection)?;

        match self
            .store
            .update_song(self.account.id, id, self.session.draft())
        {
            Ok(()) => {
                debug!(id, "saved song");
                self.reload_inner()?;
                match self.collection.get(id) {
                    Some(song) => Ok(song.clone()),
                    None => Err(StoreError::NotFound.into()),
                }
            }
            Err(StoreError::NotFound) => {
                // The record vanished underneath the session. The selection
                // cannot refer to it anymore; the cache stays as it was
                // until the next load.
                self.session.clear();
                Err(StoreError::NotFound.into())
            }
            // The draft stays untouched so the user can retry without
            // re-entering anything.
            Err(err) => Err(err.into()),
        }
    }

    fn delete_song_inner(&mut self, id: i64) -> Result<(), EditorError> {
        match self.store.delete_song(self.account.id, id) {
            Ok(()) => {
                info!(id, "deleted song");
                // The reload decides the selection's fate: a deleted
                // selected song is missing from the fresh snapshot, so the
                // session goes empty instead of auto-selecting a neighbor.
                self.reload_inner()
            }
            Err(StoreError::NotFound) => {
                // Already gone. Surfaced, but non-fatal; just drop a
                // selection that pointed at the missing record.
                if self.session.selected() == Some(id) {
                    self.session.clear();
                }
                Err(StoreError::NotFound.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
