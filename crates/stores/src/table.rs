//! JSON-lines tables.
//!
//! Every non-empty line is a JSON array. Scalar cells are read as text so a
//! hand-edited `true` or `42` behaves like the spreadsheet cell it stands
//! for; `null` reads as an empty cell.

use std::path::Path;

use consequences_core::StoreError;
use serde_json::Value;
use tracing::debug;

pub type Table = Vec<Vec<String>>;

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a whole table. Line numbers in errors are 1-based.
pub fn parse_table(content: &str) -> Result<Table, StoreError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line_no = index + 1;
            match serde_json::from_str::<Value>(line) {
                Ok(Value::Array(cells)) => Ok(cells.iter().map(cell_text).collect()),
                Ok(_) => Err(StoreError::Malformed {
                    line: line_no,
                    reason: "expected a JSON array".into(),
                }),
                Err(e) => Err(StoreError::Malformed {
                    line: line_no,
                    reason: e.to_string(),
                }),
            }
        })
        .collect()
}

/// Read and parse the table at `path`.
pub async fn read_table(path: &Path) -> Result<Table, StoreError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let table = parse_table(&content)?;
    debug!(path = %path.display(), rows = table.len(), "Read table");
    Ok(table)
}

/// Encode one row as a JSON-lines record (without the trailing newline).
pub fn encode_row(cells: &[String]) -> String {
    Value::Array(cells.iter().cloned().map(Value::String).collect()).to_string()
}

/// One column top to bottom; short rows give empty cells.
pub fn column(table: &[Vec<String>], index: usize) -> Vec<String> {
    table
        .iter()
        .map(|row| row.get(index).cloned().unwrap_or_default())
        .collect()
}
