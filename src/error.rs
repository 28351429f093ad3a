//! Typed failures for the store and editor layers. The TUI converts these
//! into footer status messages; nothing in this crate panics on a failed
//! store call.

use thiserror::Error;

#[derive(Debug, Error)]
/// Failures raised by a [`SongStore`](crate::store::SongStore)
/// implementation.
pub enum StoreError {
    /// The backing store could not complete the request. The message carries
    /// the failing step plus the underlying driver error; callers surface it
    /// and keep whatever in-memory state they already had so the user can
    /// retry.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    /// No record matched the requested id for this owner. Updates and
    /// deletes report this when zero rows change; callers treat it as
    /// non-fatal.
    #[error("song not found")]
    NotFound,
}

#[derive(Debug, Error)]
/// Failures raised by the editor facade. `NoSelection` and `Busy` are
/// refusals: the request made no store call and left every piece of editor
/// state exactly as it was.
pub enum EditorError {
    /// A save was requested while no song is selected. No store call is made.
    #[error("no song is selected")]
    NoSelection,
    /// A mutation was requested while another one is still in flight. No
    /// store call is made.
    #[error("another operation is still in progress")]
    Busy,
    /// The record store failed underneath the editor.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EditorError {
    /// Whether this failure means the targeted record no longer exists.
    /// The facade uses this to decide when a stale selection must be
    /// cleared.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditorError::Store(StoreError::NotFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_convert_into_editor_errors() {
        let err: EditorError = StoreError::NotFound.into();
        assert!(err.is_not_found());

        let err: EditorError = StoreError::Unavailable("no such table: songs".into()).into();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("no such table"));
    }

    #[test]
    fn contract_violations_render_readable_messages() {
        assert_eq!(EditorError::NoSelection.to_string(), "no song is selected");
        assert_eq!(
            EditorError::Busy.to_string(),
            "another operation is still in progress"
        );
    }
}
