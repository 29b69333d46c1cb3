//! Store traits — read access to the response log and the roster.
//!
//! Both tables live outside the game (a spreadsheet, a form service, a file).
//! The engine only ever reads them, once per run.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::participant::Participant;
use crate::response::ResponseRow;

/// The append-only response log. The first row is the header.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Human-readable store name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// One column, top to bottom (header first). Rows too short to have the
    /// column yield an empty string so the column stays aligned with rows.
    async fn column(&self, index: usize) -> Result<Vec<String>, StoreError>;

    /// Every row, oldest first, header included.
    async fn rows(&self) -> Result<Vec<ResponseRow>, StoreError>;
}

/// The participant roster.
///
/// The roster's header names the session columns; the last one is the
/// current session. A participant belongs to a session when their cell in
/// that column reads `true` (case-insensitive).
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Human-readable store name.
    fn name(&self) -> &str;

    /// The key of the current session: the last header cell of the roster.
    async fn session_key(&self) -> Result<String, StoreError>;

    /// Participants opted in to the given session, in roster order.
    async fn participants(&self, session_key: &str) -> Result<Vec<Participant>, StoreError>;
}

/// Parse a roster membership cell. Only `true`/`false` (any case) are valid.
pub fn parse_membership(cell: &str) -> Option<bool> {
    let cell = cell.trim();
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
