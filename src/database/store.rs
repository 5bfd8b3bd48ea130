use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// A row as it crosses the store boundary: column name to JSON value.
pub type Fields = Map<String, Value>;

/// Errors from a Store implementation
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Query error: {0}")]
    Query(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence collaborator for the entity gateway.
///
/// Every call is atomic and immediately visible to later calls. Ids are
/// generated by the store on insert and never handed out twice for a table.
#[async_trait]
pub trait Store: Send + Sync {
    /// Rows in id order, skipping `offset`, at most `limit`.
    async fn find_all(
        &self,
        table: &'static str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Fields>, DatabaseError>;

    async fn find_by_id(&self, table: &'static str, id: i64)
        -> Result<Option<Fields>, DatabaseError>;

    /// Insert a row without an id; returns the stored row including its new id.
    async fn insert(&self, table: &'static str, fields: Fields) -> Result<Fields, DatabaseError>;

    /// Overwrite the given columns. `None` when no row has that id.
    async fn update_fields(
        &self,
        table: &'static str,
        id: i64,
        fields: Fields,
    ) -> Result<Option<Fields>, DatabaseError>;

    /// `false` when no row had that id.
    async fn delete(&self, table: &'static str, id: i64) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
