use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::store::{DatabaseError, Fields, Store};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Fields>,
    /// Last id handed out; never rewinds, so deleted ids are not reused
    last_id: i64,
}

/// Process-local store used for development and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<&'static str, Table>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_all(
        &self,
        table: &'static str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Fields>, DatabaseError> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(table) else {
            return Ok(vec![]);
        };

        Ok(table
            .rows
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        table: &'static str,
        id: i64,
    ) -> Result<Option<Fields>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.rows.get(&id)).cloned())
    }

    async fn insert(&self, table: &'static str, mut fields: Fields) -> Result<Fields, DatabaseError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(table).or_default();

        table.last_id += 1;
        let id = table.last_id;
        fields.insert("id".to_string(), Value::from(id));
        table.rows.insert(id, fields.clone());

        Ok(fields)
    }

    async fn update_fields(
        &self,
        table: &'static str,
        id: i64,
        fields: Fields,
    ) -> Result<Option<Fields>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.get_mut(table).and_then(|t| t.rows.get_mut(&id)) else {
            return Ok(None);
        };

        for (column, value) in fields {
            if column != "id" {
                row.insert(column, value);
            }
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &'static str, id: i64) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(table)
            .map(|t| t.rows.remove(&id).is_some())
            .unwrap_or(false))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
