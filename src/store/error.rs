//! Store error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoreErrorKind {
    /// No game is stored under the identifier.
    #[display("not found")]
    NotFound,
    /// A game is already stored under the identifier.
    #[display("already exists")]
    AlreadyExists,
    /// Reading or writing the backing file failed.
    #[display("io")]
    Io,
    /// The stored data could not be encoded or decoded.
    #[display("serialization")]
    Serialization,
    /// A thread panicked while holding the store lock.
    #[display("poisoned")]
    Poisoned,
}

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error ({}): {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Failure category.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`StoreErrorKind::NotFound`] error.
    #[track_caller]
    pub fn not_found(id: &str) -> Self {
        Self::new(StoreErrorKind::NotFound, format!("game '{}' not found", id))
    }

    /// Shorthand for a [`StoreErrorKind::Poisoned`] error.
    #[track_caller]
    pub fn poisoned() -> Self {
        Self::new(StoreErrorKind::Poisoned, "store lock poisoned")
    }

    /// Returns true if the error reports a missing game.
    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::NotFound
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(StoreErrorKind::Io, format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(StoreErrorKind::Serialization, format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("abc");
        assert!(err.is_not_found());
        assert!(
            err.to_string()
                .starts_with("Store error (not found): game 'abc' not found at ")
        );
    }
}
