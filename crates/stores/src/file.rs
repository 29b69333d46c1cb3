//! File-backed stores over JSON-lines tables.
//!
//! The files are read afresh on every call: the response log keeps growing
//! while a session is being played, and each run must see its current state.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use consequences_core::{Participant, ResponseRow, ResponseStore, RosterStore, StoreError};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::roster;
use crate::table::{self, encode_row};

/// Timestamp format written by [`FileResponseStore::append`].
pub const SUBMISSION_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The response log as a JSON-lines file.
pub struct FileResponseStore {
    path: PathBuf,
}

impl FileResponseStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with `header` as its first row unless it exists.
    /// Returns whether the file was created.
    pub async fn init(&self, header: &[String]) -> Result<bool, StoreError> {
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(false);
        }
        self.write_line(&encode_row(header), true).await?;
        info!(path = %self.path.display(), "Created response log");
        Ok(true)
    }

    /// Append a row stamped with the current local time.
    pub async fn append(&self, answers: &[String]) -> Result<ResponseRow, StoreError> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(StoreError::NotFound(self.path.clone()));
        }

        let cells: Vec<String> = std::iter::once(Local::now().format(SUBMISSION_FORMAT).to_string())
            .chain(answers.iter().cloned())
            .collect();
        self.write_line(&encode_row(&cells), false).await?;
        debug!(path = %self.path.display(), answers = answers.len(), "Appended response");
        Ok(ResponseRow::new(cells))
    }

    async fn write_line(&self, line: &str, create: bool) -> Result<(), StoreError> {
        let write_err = |e: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(create)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_err)?;
        file.write_all(format!("{line}\n").as_bytes())
            .await
            .map_err(write_err)?;
        file.flush().await.map_err(write_err)?;
        Ok(())
    }
}

#[async_trait]
impl ResponseStore for FileResponseStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn column(&self, index: usize) -> Result<Vec<String>, StoreError> {
        let rows = table::read_table(&self.path).await?;
        Ok(table::column(&rows, index))
    }

    async fn rows(&self) -> Result<Vec<ResponseRow>, StoreError> {
        let rows = table::read_table(&self.path).await?;
        Ok(rows.into_iter().map(ResponseRow::new).collect())
    }
}

/// The roster as a JSON-lines file.
pub struct FileRosterStore {
    path: PathBuf,
}

impl FileRosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RosterStore for FileRosterStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn session_key(&self) -> Result<String, StoreError> {
        let rows = table::read_table(&self.path).await?;
        roster::session_key(&rows)
    }

    async fn participants(&self, session_key: &str) -> Result<Vec<Participant>, StoreError> {
        let rows = table::read_table(&self.path).await?;
        roster::participants(&rows, session_key)
    }
}
