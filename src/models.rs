//! Domain models that mirror the SQLite schema and get passed throughout the
//! editor and the TUI. The intent is that these types stay light-weight data
//! holders so other layers can focus on presentation and persistence logic.
//! Keeping the commentary here means later refactors can reconstruct the
//! assumptions even if other context is lost.

use std::fmt;

/// Title assigned to a freshly created song and to a cleared-out title field.
pub const UNTITLED_SONG: &str = "Untitled Song";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The ten genres a song can be tagged with. The set is closed: the store
/// persists the `as_str` text and the editor only ever offers these values,
/// so a song written through this crate never carries an out-of-set genre.
pub enum Genre {
    Pop,
    Rock,
    HipHop,
    Country,
    Folk,
    RnB,
    Electronic,
    Jazz,
    Blues,
    Alternative,
}

impl Default for Genre {
    fn default() -> Self {
        Genre::Pop
    }
}

impl Genre {
    /// Every genre in selector order. The selector widget cycles through this
    /// slice, and `parse` uses it as the single source of truth.
    pub const ALL: [Genre; 10] = [
        Genre::Pop,
        Genre::Rock,
        Genre::HipHop,
        Genre::Country,
        Genre::Folk,
        Genre::RnB,
        Genre::Electronic,
        Genre::Jazz,
        Genre::Blues,
        Genre::Alternative,
    ];

    /// Text form stored in the database and shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
            Genre::HipHop => "Hip-Hop",
            Genre::Country => "Country",
            Genre::Folk => "Folk",
            Genre::RnB => "R&B",
            Genre::Electronic => "Electronic",
            Genre::Jazz => "Jazz",
            Genre::Blues => "Blues",
            Genre::Alternative => "Alternative",
        }
    }

    /// Match stored text back to a variant. Returns `None` for anything not
    /// produced by `as_str`, letting the store decide how to normalize.
    pub fn parse(text: &str) -> Option<Genre> {
        Genre::ALL.iter().copied().find(|genre| genre.as_str() == text)
    }

    /// The following genre in selector order, wrapping at the end.
    pub fn next(self) -> Genre {
        let idx = Genre::ALL.iter().position(|genre| *genre == self).unwrap_or(0);
        Genre::ALL[(idx + 1) % Genre::ALL.len()]
    }

    /// The preceding genre in selector order, wrapping at the start.
    pub fn previous(self) -> Genre {
        let idx = Genre::ALL.iter().position(|genre| *genre == self).unwrap_or(0);
        Genre::ALL[(idx + Genre::ALL.len() - 1) % Genre::ALL.len()]
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The ten moods a song can be tagged with. Same closed-set contract as
/// [`Genre`].
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Romantic,
    Melancholic,
    Uplifting,
    Dark,
    Peaceful,
    Angry,
    Nostalgic,
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Happy
    }
}

impl Mood {
    /// Every mood in selector order.
    pub const ALL: [Mood; 10] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Romantic,
        Mood::Melancholic,
        Mood::Uplifting,
        Mood::Dark,
        Mood::Peaceful,
        Mood::Angry,
        Mood::Nostalgic,
    ];

    /// Text form stored in the database and shown in the UI.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Energetic => "Energetic",
            Mood::Romantic => "Romantic",
            Mood::Melancholic => "Melancholic",
            Mood::Uplifting => "Uplifting",
            Mood::Dark => "Dark",
            Mood::Peaceful => "Peaceful",
            Mood::Angry => "Angry",
            Mood::Nostalgic => "Nostalgic",
        }
    }

    /// Match stored text back to a variant; `None` for unrecognized text.
    pub fn parse(text: &str) -> Option<Mood> {
        Mood::ALL.iter().copied().find(|mood| mood.as_str() == text)
    }

    /// The following mood in selector order, wrapping at the end.
    pub fn next(self) -> Mood {
        let idx = Mood::ALL.iter().position(|mood| *mood == self).unwrap_or(0);
        Mood::ALL[(idx + 1) % Mood::ALL.len()]
    }

    /// The preceding mood in selector order, wrapping at the start.
    pub fn previous(self) -> Mood {
        let idx = Mood::ALL.iter().position(|mood| *mood == self).unwrap_or(0);
        Mood::ALL[(idx + Mood::ALL.len() - 1) % Mood::ALL.len()]
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The four editable fields of a song. Doubles as the editing session's local
/// draft and as the store's insert/update payload: a save always overwrites
/// all four fields, never a subset.
pub struct SongDraft {
    pub title: String,
    pub lyrics: String,
    pub genre: Genre,
    pub mood: Mood,
}

impl Default for SongDraft {
    /// The creation defaults: an untitled song with empty lyrics, tagged with
    /// the first genre and mood in selector order.
    fn default() -> Self {
        Self {
            title: UNTITLED_SONG.to_string(),
            lyrics: String::new(),
            genre: Genre::default(),
            mood: Mood::default(),
        }
    }
}

#[derive(Debug, Clone)]
/// In-memory representation of a persisted song. The struct mirrors rows in
/// the `songs` table; `id` and the timestamps are assigned by the store and
/// never edited locally.
pub struct Song {
    /// Primary key from the SQLite store. Selection state references songs
    /// through this id rather than by list position, so reordering after a
    /// save cannot silently switch which song is being edited.
    pub id: i64,
    /// Id of the account that created the song. Set once at insert; every
    /// store query is scoped to it, so one profile never sees another's
    /// songs.
    pub owner: i64,
    /// Display title. Never blank; the store receives [`UNTITLED_SONG`] when
    /// the user clears the field.
    pub title: String,
    /// Free-form lyrics text, possibly empty.
    pub lyrics: String,
    /// One of the ten fixed genres.
    pub genre: Genre,
    /// One of the ten fixed moods.
    pub mood: Mood,
    /// UTC text timestamp (`YYYY-MM-DD HH:MM:SS.SSS`) set once at insert.
    pub created_at: String,
    /// UTC text timestamp refreshed by the store on every successful update.
    /// The format sorts lexicographically in time order, which the
    /// recently-edited-first listing relies on.
    pub updated_at: String,
}

impl Song {
    /// Copy the four editable fields into a draft, seeding an editing session
    /// from the persisted state.
    pub fn to_draft(&self) -> SongDraft {
        SongDraft {
            title: self.title.clone(),
            lyrics: self.lyrics.clone(),
            genre: self.genre,
            mood: self.mood,
        }
    }

    /// Compose the `Genre • Mood` line shown under the title in the song
    /// list. Many views rely on this ready-to-use formatting.
    pub fn byline(&self) -> String {
        format!("{} • {}", self.genre, self.mood)
    }

    /// Date portion of the last-updated timestamp for compact display.
    pub fn updated_date(&self) -> &str {
        self.updated_at.get(..10).unwrap_or(&self.updated_at)
    }
}

#[derive(Debug, Clone)]
/// A local profile that owns songs. Stands in for the hosted account a
/// deployed service would authenticate; the sign-in screen picks one of
/// these.
pub struct Account {
    /// Primary key from the SQLite store.
    pub id: i64,
    /// Unique display name chosen when the profile was created.
    pub name: String,
    /// UTC text timestamp set once at profile creation.
    pub created_at: String,
}

impl Account {
    /// Date portion of the creation timestamp for compact display.
    pub fn created_date(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }
}

impl fmt::Display for Account {
    /// Write the profile name to any formatter. Display is implemented so the
    /// type plays nicely with Ratatui widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_text_round_trips() {
        for genre in Genre::ALL {
            assert_eq!(Genre::parse(genre.as_str()), Some(genre));
        }
        assert_eq!(Genre::parse("Polka"), None);
        assert_eq!(Genre::parse(""), None);
    }

    #[test]
    fn mood_text_round_trips() {
        for mood in Mood::ALL {
            assert_eq!(Mood::parse(mood.as_str()), Some(mood));
        }
        assert_eq!(Mood::parse("Confused"), None);
    }

    #[test]
    fn selector_cycling_wraps() {
        assert_eq!(Genre::Alternative.next(), Genre::Pop);
        assert_eq!(Genre::Pop.previous(), Genre::Alternative);
        assert_eq!(Mood::Nostalgic.next(), Mood::Happy);
        assert_eq!(Mood::Happy.previous(), Mood::Nostalgic);

        // A full lap of next() lands back on the starting value.
        let mut genre = Genre::Folk;
        for _ in 0..Genre::ALL.len() {
            genre = genre.next();
        }
        assert_eq!(genre, Genre::Folk);
    }

    #[test]
    fn draft_defaults_match_creation_values() {
        let draft = SongDraft::default();
        assert_eq!(draft.title, UNTITLED_SONG);
        assert!(draft.lyrics.is_empty());
        assert_eq!(draft.genre, Genre::Pop);
        assert_eq!(draft.mood, Mood::Happy);
    }

    #[test]
    fn song_display_helpers() {
        let song = Song {
            id: 1,
            owner: 1,
            title: "Driving North".to_string(),
            lyrics: String::new(),
            genre: Genre::Folk,
            mood: Mood::Nostalgic,
            created_at: "2026-03-01 09:15:00.000".to_string(),
            updated_at: "2026-03-02 18:40:12.345".to_string(),
        };
        assert_eq!(song.byline(), "Folk • Nostalgic");
        assert_eq!(song.updated_date(), "2026-03-02");
    }
}
