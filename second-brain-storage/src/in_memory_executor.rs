//! The in-memory `SqlExecutor` used by tests, offline mode, and as the
//! default backing store before a production SQL driver is wired in.

use crate::executor::{Row, SqlExecutor};
use async_trait::async_trait;
use parking_lot::Mutex;
use second_brain_core::error::Result;
use second_brain_core::storage_service::SearchableTable;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemorySqlExecutor {
    tables: Mutex<HashMap<&'static str, HashMap<Uuid, Row>>>,
}

impl InMemorySqlExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SqlExecutor for InMemorySqlExecutor {
    async fn all_rows(&self, table: SearchableTable, owner_user_id: &str) -> Result<Vec<Row>> {
        let tables = self.tables.lock();
        Ok(tables
            .get(table.as_str())
            .map(|rows| {
                rows.values()
                    .filter(|r| r.owner_user_id == owner_user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_row(&self, table: SearchableTable, id: Uuid) -> Result<Option<Row>> {
        let tables = self.tables.lock();
        Ok(tables.get(table.as_str()).and_then(|rows| rows.get(&id)).cloned())
    }

    async fn insert_row(&self, table: SearchableTable, row: Row) -> Result<Uuid> {
        let id = row.id;
        let mut tables = self.tables.lock();
        tables.entry(table.as_str()).or_default().insert(id, row);
        Ok(id)
    }

    async fn delete_row(&self, table: SearchableTable, id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock();
        tables.entry(table.as_str()).or_default().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(owner: &str, content: &str) -> Row {
        Row {
            id: Uuid::new_v4(),
            owner_user_id: owner.to_string(),
            content: content.to_string(),
            category: None,
            tags: vec![],
            embedding: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let exec = InMemorySqlExecutor::new();
        let r = row("u1", "hello");
        let id = exec.insert_row(SearchableTable::Patterns, r).await.unwrap();
        let fetched = exec.get_row(SearchableTable::Patterns, id).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn all_rows_is_scoped_to_owner() {
        let exec = InMemorySqlExecutor::new();
        exec.insert_row(SearchableTable::Examples, row("u1", "a")).await.unwrap();
        exec.insert_row(SearchableTable::Examples, row("u2", "b")).await.unwrap();
        let rows = exec.all_rows(SearchableTable::Examples, "u1").await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let exec = InMemorySqlExecutor::new();
        let id = exec.insert_row(SearchableTable::Knowledge, row("u1", "x")).await.unwrap();
        exec.delete_row(SearchableTable::Knowledge, id).await.unwrap();
        assert!(exec.get_row(SearchableTable::Knowledge, id).await.unwrap().is_none());
    }
}
