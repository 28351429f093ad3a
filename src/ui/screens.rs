use std::time::{Duration, Instant};

use crate::editor::SongEditor;
use crate::error::StoreError;
use crate::models::{Account, Song};
use crate::store::SqliteStore;

/// How long a writing tip stays on screen before it is dismissed.
const TIP_DURATION: Duration = Duration::from_secs(5);

/// Backing state for the profile picker shown before a writer signs in.
pub(crate) struct SignInScreen {
    pub(crate) store: SqliteStore,
    pub(crate) accounts: Vec<Account>,
    pub(crate) selected: usize,
}

impl SignInScreen {
    pub(crate) fn new(store: SqliteStore, accounts: Vec<Account>) -> Self {
        let mut screen = Self {
            store,
            accounts,
            selected: 0,
        };
        screen.ensure_in_bounds();
        screen
    }

    /// Re-read the profile list, keeping the cursor on `focus_id` when given.
    pub(crate) fn refresh(&mut self, focus_id: Option<i64>) -> Result<(), StoreError> {
        self.accounts = self.store.list_accounts()?;
        if self.accounts.is_empty() {
            self.selected = 0;
            return Ok(());
        }

        if let Some(id) = focus_id {
            if let Some(idx) = self.accounts.iter().position(|account| account.id == id) {
                self.selected = idx;
                return Ok(());
            }
        }

        self.ensure_in_bounds();
        Ok(())
    }

    pub(crate) fn current_account(&self) -> Option<&Account> {
        self.accounts.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.accounts.is_empty() {
            return;
        }
        let len = self.accounts.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    fn ensure_in_bounds(&mut self) {
        if self.accounts.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.accounts.len() {
            self.selected = self.accounts.len() - 1;
        }
    }
}

/// Which pane receives plain keyboard input on the editor screen.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum Focus {
    Sidebar,
    Title,
    Genre,
    Mood,
    Lyrics,
}

impl Focus {
    pub(crate) fn next(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Title,
            Focus::Title => Focus::Genre,
            Focus::Genre => Focus::Mood,
            Focus::Mood => Focus::Lyrics,
            Focus::Lyrics => Focus::Sidebar,
        }
    }

    pub(crate) fn previous(self) -> Self {
        match self {
            Focus::Sidebar => Focus::Lyrics,
            Focus::Title => Focus::Sidebar,
            Focus::Genre => Focus::Title,
            Focus::Mood => Focus::Genre,
            Focus::Lyrics => Focus::Mood,
        }
    }
}

/// A writing tip with its auto-dismissal deadline.
pub(crate) struct SuggestionBanner {
    pub(crate) text: String,
    pub(crate) until: Instant,
}

/// Backing state for the main writing workspace.
pub(crate) struct EditorScreen {
    pub(crate) editor: SongEditor<SqliteStore>,
    pub(crate) cursor: usize,
    pub(crate) focus: Focus,
    pub(crate) banner: Option<SuggestionBanner>,
}

impl EditorScreen {
    pub(crate) fn new(editor: SongEditor<SqliteStore>) -> Self {
        let mut screen = Self {
            editor,
            cursor: 0,
            focus: Focus::Sidebar,
            banner: None,
        };
        screen.sync_cursor_to_selection();
        screen
    }

    /// Song the sidebar cursor is resting on, independent of what is loaded
    /// into the editing session.
    pub(crate) fn cursor_song(&self) -> Option<&Song> {
        self.editor.songs().get(self.cursor)
    }

    pub(crate) fn move_cursor(&mut self, offset: isize) {
        let songs = self.editor.songs();
        if songs.is_empty() {
            return;
        }
        let len = songs.len() as isize;
        let mut new = self.cursor as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.cursor = new as usize;
    }

    pub(crate) fn cursor_first(&mut self) {
        if !self.editor.songs().is_empty() {
            self.cursor = 0;
        }
    }

    pub(crate) fn cursor_last(&mut self) {
        let len = self.editor.songs().len();
        if len > 0 {
            self.cursor = len - 1;
        }
    }

    /// Snap the cursor onto the session's song, falling back to a bounds
    /// clamp when nothing is selected.
    pub(crate) fn sync_cursor_to_selection(&mut self) {
        if let Some(id) = self.editor.session().selected() {
            if let Some(idx) = self.editor.collection().position(id) {
                self.cursor = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        let len = self.editor.songs().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Pull focus back to the sidebar whenever the session loses its song.
    pub(crate) fn normalize_focus(&mut self) {
        if self.editor.selected_song().is_none() {
            self.focus = Focus::Sidebar;
        }
    }

    /// Whether the draft has drifted from the stored copy of the selected
    /// song.
    pub(crate) fn has_unsaved_changes(&self) -> bool {
        match self.editor.selected_song() {
            Some(song) => song.to_draft() != *self.editor.draft(),
            None => false,
        }
    }

    pub(crate) fn show_tip(&mut self, text: String) {
        self.banner = Some(SuggestionBanner {
            text,
            until: Instant::now() + TIP_DURATION,
        });
    }

    /// Drop the tip banner once its deadline has passed.
    pub(crate) fn expire_stale_banner(&mut self) {
        if let Some(banner) = &self.banner {
            if banner.until <= Instant::now() {
                self.banner = None;
            }
        }
    }
}
