//! Response log rows.
//!
//! The response log is an append-only table. Its first row is a header whose
//! first cell does not parse as a timestamp; every later row starts with the
//! submission timestamp followed by one free-text answer per category.

use serde::{Deserialize, Serialize};

/// One row of the response log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseRow {
    cells: Vec<String>,
}

impl ResponseRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// The timestamp cell (the header label for the header row).
    pub fn timestamp(&self) -> &str {
        self.cells.first().map(String::as_str).unwrap_or("")
    }

    /// The answers, without the timestamp cell.
    pub fn answers(&self) -> &[String] {
        self.cells.get(1..).unwrap_or(&[])
    }

    /// Answer for a 0-based category index. Ragged rows read as empty.
    pub fn answer(&self, category: usize) -> &str {
        self.cells
            .get(category + 1)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Number of answer cells present.
    pub fn category_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ResponseRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_timestamp_from_answers() {
        let row: ResponseRow = ["17/10/2026 19:04:11", "Ann", "Bob"].into_iter().collect();
        assert_eq!(row.timestamp(), "17/10/2026 19:04:11");
        assert_eq!(row.answers(), &["Ann".to_string(), "Bob".to_string()]);
        assert_eq!(row.category_count(), 2);
    }

    #[test]
    fn ragged_row_reads_missing_answers_as_empty() {
        let row: ResponseRow = ["t1", "Ann"].into_iter().collect();
        assert_eq!(row.answer(0), "Ann");
        assert_eq!(row.answer(4), "");
    }

    #[test]
    fn empty_row_has_no_answers() {
        let row = ResponseRow::default();
        assert_eq!(row.timestamp(), "");
        assert!(row.answers().is_empty());
        assert_eq!(row.category_count(), 0);
    }

    #[test]
    fn serializes_as_plain_array() {
        let row: ResponseRow = ["t1", "A1"].into_iter().collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["t1","A1"]"#);
    }
}
