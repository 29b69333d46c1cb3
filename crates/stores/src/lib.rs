//! Store implementations for the Consequences game.
//!
//! Both tables are kept as JSON-lines files: one JSON array per line, the
//! first line being the header. This mirrors the spreadsheet exports the
//! game was played from and stays easy to edit by hand.
//!
//! Available stores:
//! - **File** — [`FileResponseStore`] and [`FileRosterStore`], re-read on
//!   every call so each run sees the table as it is now
//! - **In-memory** — [`InMemoryResponseStore`] and [`InMemoryRosterStore`]
//!   for tests and previews

pub mod file;
pub mod in_memory;
pub mod roster;
pub mod table;

pub use file::{FileResponseStore, FileRosterStore};
pub use in_memory::{InMemoryResponseStore, InMemoryRosterStore};
