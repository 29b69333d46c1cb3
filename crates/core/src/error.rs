//! Error types for the Consequences domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error enum.

use std::path::PathBuf;

use thiserror::Error;

/// The top-level error type for a game run.
///
/// Delivery failures are not here: they are per recipient and end up in the
/// session report rather than aborting the run.
#[derive(Debug, Error)]
pub enum Error {
    // --- Game computation errors ---
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the game pipeline itself. Both abort the run before any
/// message is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(
        "Insufficient responses: {usable} in the current session for {participants} participants \
         (at most {max_missing} may be missing)"
    )]
    InsufficientResponses {
        usable: usize,
        participants: usize,
        max_missing: usize,
    },

    #[error("Category layout mismatch: renderer expects {expected} categories, assignment has {found}")]
    CategoryLayoutMismatch { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Malformed row at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Roster has no session column")]
    MissingSessionColumn,

    #[error("Unknown session key: {0}")]
    UnknownSession(String),
}

#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Notifier not configured: {0}")]
    NotConfigured(String),

    #[error("Delivery to {recipient} failed: {reason}")]
    Failed { recipient: String, reason: String },

    #[error("Relay rejected message (status: {status_code}): {message}")]
    Rejected { status_code: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_responses_displays_counts() {
        let err = Error::Game(GameError::InsufficientResponses {
            usable: 3,
            participants: 8,
            max_missing: 2,
        });
        let text = err.to_string();
        assert!(text.contains('3'));
        assert!(text.contains('8'));
        assert!(text.contains("at most 2"));
    }

    #[test]
    fn delivery_error_displays_recipient() {
        let err = DeliveryError::Failed {
            recipient: "ann@example.com".into(),
            reason: "mailbox full".into(),
        };
        assert!(err.to_string().contains("ann@example.com"));
        assert!(err.to_string().contains("mailbox full"));
    }

    #[test]
    fn store_errors_convert_into_run_errors() {
        fn read() -> Result<()> {
            Err(StoreError::MissingSessionColumn)?
        }
        let err = read().unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::MissingSessionColumn)));
        assert!(err.to_string().contains("no session column"));
    }
}
