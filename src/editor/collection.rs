//! In-memory cache of the owner's song list in store order. The cache is
//! only ever replaced wholesale by a fresh load, never patched in place,
//! so its ordering and metadata always reflect one authoritative snapshot.

use crate::models::Song;

#[derive(Debug, Default)]
pub struct SongCollection {
    songs: Vec<Song>,
}

impl SongCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached songs in store order (most recently updated first under
    /// the default ordering).
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Look up a cached song by id.
    pub fn get(&self, id: i64) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// First song in the current ordering, the auto-select candidate.
    pub fn first(&self) -> Option<&Song> {
        self.songs.first()
    }

    /// Position of a song in the current ordering. The UI uses this to keep
    /// its list cursor on the same song across reloads.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.songs.iter().position(|song| song.id == id)
    }

    /// Swap in a freshly loaded snapshot. Callers keep the old snapshot by
    /// simply not calling this when a load fails.
    pub fn replace(&mut self, songs: Vec<Song>) {
        self.songs = songs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Genre, Mood};

    fn song(id: i64) -> Song {
        Song {
            id,
            owner: 1,
            title: format!("Song {id}"),
            lyrics: String::new(),
            genre: Genre::Pop,
            mood: Mood::Happy,
            created_at: "2026-02-01 10:00:00.000".to_string(),
            updated_at: "2026-02-01 10:00:00.000".to_string(),
        }
    }

    #[test]
    fn lookups_reflect_the_latest_snapshot() {
        let mut collection = SongCollection::new();
        assert!(collection.is_empty());
        assert!(collection.first().is_none());

        collection.replace(vec![song(5), song(3), song(9)]);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.first().map(|s| s.id), Some(5));
        assert_eq!(collection.position(9), Some(2));
        assert!(collection.contains(3));
        assert!(!collection.contains(4));

        collection.replace(vec![song(3)]);
        assert_eq!(collection.len(), 1);
        assert!(!collection.contains(5));
    }
}
