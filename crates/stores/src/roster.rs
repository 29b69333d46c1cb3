//! Roster table semantics shared by the file and in-memory roster stores.
//!
//! Layout: column 0 is the participant name, column 1 the address, and every
//! later column is a session. The header cell of a session column is its key;
//! the last one is the current session.

use std::collections::HashSet;

use consequences_core::store::parse_membership;
use consequences_core::{Participant, StoreError};
use tracing::warn;

const FIRST_SESSION_COLUMN: usize = 2;

/// The last header cell, when the roster has at least one session column.
pub fn session_key(table: &[Vec<String>]) -> Result<String, StoreError> {
    table
        .first()
        .filter(|header| header.len() > FIRST_SESSION_COLUMN)
        .and_then(|header| header.last())
        .cloned()
        .ok_or(StoreError::MissingSessionColumn)
}

/// Participants whose cell under `session_key` reads `true`.
pub fn participants(table: &[Vec<String>], session_key: &str) -> Result<Vec<Participant>, StoreError> {
    let Some((header, members)) = table.split_first() else {
        return Err(StoreError::MissingSessionColumn);
    };

    let column = header
        .iter()
        .enumerate()
        .skip(FIRST_SESSION_COLUMN)
        .rev()
        .find(|(_, key)| key.as_str() == session_key)
        .map(|(index, _)| index)
        .ok_or_else(|| StoreError::UnknownSession(session_key.to_string()))?;

    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for (offset, row) in members.iter().enumerate() {
        let name = row.first().map(|s| s.trim()).unwrap_or("");
        if name.is_empty() {
            continue;
        }

        let cell = row.get(column).map(String::as_str).unwrap_or("");
        match parse_membership(cell) {
            Some(true) => {}
            Some(false) => continue,
            None => {
                if !cell.trim().is_empty() {
                    warn!(participant = name, cell, row = offset + 1, "Unreadable membership flag; treating as not playing");
                }
                continue;
            }
        }

        if !seen.insert(name.to_string()) {
            warn!(participant = name, "Duplicate roster entry ignored");
            continue;
        }

        let address = row.get(1).map(|s| s.trim()).unwrap_or("");
        result.push(Participant::new(name, address));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn roster() -> Vec<Vec<String>> {
        table(&[
            &["Name", "Email", "2026-10-10", "2026-10-17"],
            &["Ann", "ann@example.com", "TRUE", "true"],
            &["Bob", "bob@example.com", "TRUE", "FALSE"],
            &["Cat", "cat@example.com", "false", "True"],
            &["Dan", "dan@example.com", "true", "maybe"],
            &["Ann", "ann2@example.com", "true", "true"],
            &["", "ghost@example.com", "true", "true"],
            &["Eve", "eve@example.com", "true"],
        ])
    }

    #[test]
    fn session_key_is_last_header_cell() {
        assert_eq!(session_key(&roster()).unwrap(), "2026-10-17");
    }

    #[test]
    fn roster_without_session_columns_is_rejected() {
        let t = table(&[&["Name", "Email"], &["Ann", "ann@example.com"]]);
        assert!(matches!(session_key(&t), Err(StoreError::MissingSessionColumn)));
        assert!(matches!(session_key(&[]), Err(StoreError::MissingSessionColumn)));
    }

    #[test]
    fn only_opted_in_unique_names_are_returned() {
        let players = participants(&roster(), "2026-10-17").unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Cat"]);
        assert_eq!(players[0].address, "ann@example.com");
    }

    #[test]
    fn earlier_session_can_be_selected() {
        let players = participants(&roster(), "2026-10-10").unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob", "Dan", "Eve"]);
    }

    #[test]
    fn unknown_session_is_an_error() {
        let err = participants(&roster(), "1999-01-01").unwrap_err();
        assert!(matches!(err, StoreError::UnknownSession(_)));
    }
}
