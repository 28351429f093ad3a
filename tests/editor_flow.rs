//! End-to-end tests that drive the editor core against a real SQLite store
//! through the crate's public API, the same way the running application does.

use std::thread;
use std::time::Duration;

use songsmith::editor::SUGGESTIONS;
use songsmith::models::{Genre, Mood, UNTITLED_SONG};
use songsmith::{IdentityProvider, SongEditor, SqliteStore};

/// Store timestamps carry millisecond resolution; sleeping a little before
/// the next write guarantees it lands on a strictly later stamp.
fn advance_clock() {
    thread::sleep(Duration::from_millis(15));
}

/// An editor over a throwaway in-memory store with one freshly created
/// profile, already loaded.
fn fresh_editor(name: &str) -> SongEditor<SqliteStore> {
    let store = SqliteStore::open_in_memory().unwrap();
    let account = store.create_account(name).unwrap();
    let mut editor = SongEditor::new(store, account);
    editor.reload().unwrap();
    editor
}

#[test]
fn fresh_profile_starts_with_an_empty_library() {
    let editor = fresh_editor("Morgan");

    assert!(editor.songs().is_empty());
    assert!(!editor.session().has_selection());
    assert!(editor.selected_song().is_none());
    assert_eq!(editor.draft().title, UNTITLED_SONG);
    assert!(editor.draft().lyrics.is_empty());
}

#[test]
fn creating_into_an_empty_library_auto_selects_the_new_song() {
    let mut editor = fresh_editor("Morgan");

    let created = editor.create_song().unwrap();

    assert_eq!(editor.songs().len(), 1);
    assert_eq!(editor.session().selected(), Some(created.id));

    let song = editor.selected_song().unwrap();
    assert_eq!(song.title, UNTITLED_SONG);
    assert!(song.lyrics.is_empty());
    assert_eq!(song.genre, Genre::Pop);
    assert_eq!(song.mood, Mood::Happy);

    // The draft is seeded from the persisted record, ready for editing.
    assert_eq!(*editor.draft(), created.to_draft());
}

#[test]
fn each_new_song_lands_at_the_top_of_the_list() {
    let mut editor = fresh_editor("Morgan");

    let first = editor.create_song().unwrap();
    advance_clock();
    let second = editor.create_song().unwrap();
    advance_clock();
    let third = editor.create_song().unwrap();

    let ids: Vec<i64> = editor.songs().iter().map(|song| song.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    // The selection follows the newest creation.
    assert_eq!(editor.session().selected(), Some(third.id));
}

#[test]
fn saving_bumps_updated_at_and_reorders_the_list() {
    let mut editor = fresh_editor("Morgan");

    let oldest = editor.create_song().unwrap();
    advance_clock();
    let newest = editor.create_song().unwrap();
    assert_eq!(editor.songs()[0].id, newest.id);

    editor.select(oldest.id);
    editor.set_title("Back On Top");
    advance_clock();
    let saved = editor.save().unwrap();

    assert_eq!(saved.id, oldest.id);
    assert_eq!(saved.title, "Back On Top");
    assert!(saved.updated_at > oldest.updated_at);
    assert_eq!(saved.created_at, oldest.created_at);

    // The freshly saved song is now the most recently updated.
    assert_eq!(editor.songs()[0].id, oldest.id);
    assert_eq!(editor.selected_song().unwrap().title, "Back On Top");
}

#[test]
fn saving_without_edits_only_advances_updated_at() {
    let mut editor = fresh_editor("Morgan");

    editor.create_song().unwrap();
    editor.set_title("Harbor Lights");
    editor.set_lyrics("salt on the railing\n");
    editor.set_genre(Genre::Folk);
    let settled = editor.save().unwrap();

    // Reselect and save again with nothing touched in between.
    advance_clock();
    editor.select(settled.id);
    let resaved = editor.save().unwrap();

    assert_eq!(resaved.title, settled.title);
    assert_eq!(resaved.lyrics, settled.lyrics);
    assert_eq!(resaved.genre, settled.genre);
    assert_eq!(resaved.mood, settled.mood);
    assert!(resaved.updated_at > settled.updated_at);
}

#[test]
fn reselecting_a_song_discards_unsaved_edits() {
    let mut editor = fresh_editor("Morgan");

    let first = editor.create_song().unwrap();
    editor.set_title("Settled");
    editor.save().unwrap();
    advance_clock();
    let second = editor.create_song().unwrap();

    // Unsaved edits to the second song...
    editor.set_title("Never saved");
    editor.set_lyrics("scratch verse");
    editor.set_genre(Genre::Blues);

    // ...vanish once the selection moves away and back.
    editor.select(first.id);
    assert_eq!(editor.draft().title, "Settled");

    editor.select(second.id);
    assert_eq!(editor.draft().title, UNTITLED_SONG);
    assert!(editor.draft().lyrics.is_empty());
    assert_eq!(editor.draft().genre, Genre::Pop);
}

#[test]
fn deleting_the_selected_song_empties_the_session() {
    let mut editor = fresh_editor("Morgan");

    let keeper = editor.create_song().unwrap();
    advance_clock();
    let doomed = editor.create_song().unwrap();
    assert_eq!(editor.session().selected(), Some(doomed.id));

    editor.delete_song(doomed.id).unwrap();

    assert!(!editor.session().has_selection());
    assert!(editor.selected_song().is_none());
    assert_eq!(editor.draft().title, UNTITLED_SONG);

    let ids: Vec<i64> = editor.songs().iter().map(|song| song.id).collect();
    assert_eq!(ids, vec![keeper.id]);
}

#[test]
fn deleting_another_song_keeps_the_selection_and_draft() {
    let mut editor = fresh_editor("Morgan");

    let other = editor.create_song().unwrap();
    advance_clock();
    let kept = editor.create_song().unwrap();
    editor.set_lyrics("half a chorus");

    editor.delete_song(other.id).unwrap();

    assert_eq!(editor.session().selected(), Some(kept.id));
    // The in-flight draft survives the unrelated delete.
    assert_eq!(editor.draft().lyrics, "half a chorus");
    assert_eq!(editor.songs().len(), 1);
}

#[test]
fn all_four_fields_round_trip_through_a_fresh_editor() {
    let store = SqliteStore::open_in_memory().unwrap();
    let account = store.create_account("Morgan").unwrap();
    let mut editor = SongEditor::new(store, account.clone());
    editor.reload().unwrap();

    let created = editor.create_song().unwrap();
    editor.set_title("Cold Water");
    editor.set_lyrics("first verse\n\nsecond verse\n");
    editor.set_genre(Genre::Jazz);
    editor.set_mood(Mood::Melancholic);
    editor.save().unwrap();

    // A brand-new editor over the same store sees exactly what was saved.
    let mut editor = SongEditor::new(editor.into_store(), account);
    editor.reload().unwrap();

    assert_eq!(editor.session().selected(), Some(created.id));
    let song = editor.selected_song().unwrap();
    assert_eq!(song.title, "Cold Water");
    assert_eq!(song.lyrics, "first verse\n\nsecond verse\n");
    assert_eq!(song.genre, Genre::Jazz);
    assert_eq!(song.mood, Mood::Melancholic);
}

#[test]
fn libraries_stay_scoped_to_their_owner() {
    let store = SqliteStore::open_in_memory().unwrap();
    let writer = store.create_account("Writer").unwrap();
    let visitor = store.create_account("Visitor").unwrap();

    let mut editor = SongEditor::new(store, writer.clone());
    editor.reload().unwrap();
    editor.create_song().unwrap();
    editor.set_title("Mine Alone");
    editor.save().unwrap();

    // The second profile starts empty even though the first has songs.
    let mut editor = SongEditor::new(editor.into_store(), visitor);
    editor.reload().unwrap();
    assert!(editor.songs().is_empty());
    assert!(!editor.session().has_selection());
    let foreign = editor.create_song().unwrap();

    // Back as the first profile: the library is intact and unpolluted.
    let mut editor = SongEditor::new(editor.into_store(), writer);
    editor.reload().unwrap();
    let titles: Vec<&str> = editor
        .songs()
        .iter()
        .map(|song| song.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Mine Alone"]);
    assert!(editor.songs().iter().all(|song| song.id != foreign.id));
}

#[test]
fn signing_out_and_back_in_preserves_the_library() {
    let store = SqliteStore::open_in_memory().unwrap();
    let account = store.create_account("Morgan").unwrap();
    store.sign_in(account.id).unwrap();

    let mut editor = SongEditor::new(store, account.clone());
    editor.reload().unwrap();
    editor.create_song().unwrap();
    advance_clock();
    let latest = editor.create_song().unwrap();

    // Signing out hands the store back and clears the session record.
    let store = editor.into_store();
    store.sign_out().unwrap();
    assert!(store.current_user().unwrap().is_none());

    // Signing back in builds a fresh editor over the same library.
    store.sign_in(account.id).unwrap();
    let resumed = store.current_user().unwrap().expect("signed in again");
    assert_eq!(resumed.id, account.id);

    let mut editor = SongEditor::new(store, resumed);
    editor.reload().unwrap();
    assert_eq!(editor.songs().len(), 2);
    assert_eq!(editor.session().selected(), Some(latest.id));
}

#[test]
fn default_tip_provider_draws_from_the_canned_set() {
    let mut editor = fresh_editor("Morgan");
    editor.create_song().unwrap();
    editor.set_lyrics("humming something half-formed");

    for _ in 0..10 {
        let tip = editor.suggest();
        assert!(SUGGESTIONS.contains(&tip.as_str()));
    }
}
