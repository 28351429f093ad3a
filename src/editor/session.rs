//! The editing session: which song is selected and the local draft of its
//! editable fields. The draft legitimately diverges from the persisted
//! record between selection/save, so nothing here talks to the store.

use crate::models::{Song, SongDraft};

#[derive(Debug, Default)]
/// Two-state machine: empty (no selection, pristine draft) or selected
/// (a song id plus a draft seeded from its persisted fields). The session
/// never outlives the signed-in editor view.
pub struct EditingSession {
    selected: Option<i64>,
    draft: SongDraft,
}

impl EditingSession {
    /// A fresh empty session with default draft values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the selected song, if any.
    pub fn selected(&self) -> Option<i64> {
        self.selected
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    /// Read access to the local draft.
    pub fn draft(&self) -> &SongDraft {
        &self.draft
    }

    /// Mutable access to the local draft. Edits made here stay local until
    /// a save commits them; reselecting throws them away.
    pub fn draft_mut(&mut self) -> &mut SongDraft {
        &mut self.draft
    }

    /// Select a song and reseed the draft from its persisted fields. Any
    /// unsaved edits to the previous selection are discarded without
    /// warning; saving first is the caller's job.
    pub fn select(&mut self, song: &Song) {
        self.selected = Some(song.id);
        self.draft = song.to_draft();
    }

    /// Back to the empty state: no selection, draft reset to defaults.
    pub fn clear(&mut self) {
        self.selected = None;
        self.draft = SongDraft::default();
    }
}
