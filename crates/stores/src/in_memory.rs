//! In-memory stores — useful for testing and previews.

use std::sync::Arc;

use async_trait::async_trait;
use consequences_core::{Participant, ResponseRow, ResponseStore, RosterStore, StoreError};
use tokio::sync::RwLock;

use crate::roster;
use crate::table::Table;

/// A response log held in a Vec. The first row should be the header.
pub struct InMemoryResponseStore {
    rows: Arc<RwLock<Vec<ResponseRow>>>,
}

impl InMemoryResponseStore {
    pub fn new(rows: Vec<ResponseRow>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub async fn push(&self, row: ResponseRow) {
        self.rows.write().await.push(row);
    }
}

impl Default for InMemoryResponseStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ResponseStore for InMemoryResponseStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn column(&self, index: usize) -> Result<Vec<String>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .map(|row| row.cell(index).unwrap_or("").to_string())
            .collect())
    }

    async fn rows(&self) -> Result<Vec<ResponseRow>, StoreError> {
        Ok(self.rows.read().await.clone())
    }
}

/// A roster table held in memory, same layout as the roster file.
pub struct InMemoryRosterStore {
    table: Table,
}

impl InMemoryRosterStore {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// A one-session roster where everyone listed is playing.
    pub fn single_session(session_key: &str, players: &[Participant]) -> Self {
        let header = vec!["Name".to_string(), "Address".to_string(), session_key.to_string()];
        let rows = players
            .iter()
            .map(|p| vec![p.name.clone(), p.address.clone(), "TRUE".to_string()]);
        Self::new(std::iter::once(header).chain(rows).collect())
    }
}

#[async_trait]
impl RosterStore for InMemoryRosterStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn session_key(&self) -> Result<String, StoreError> {
        roster::session_key(&self.table)
    }

    async fn participants(&self, session_key: &str) -> Result<Vec<Participant>, StoreError> {
        roster::participants(&self.table, session_key)
    }
}
