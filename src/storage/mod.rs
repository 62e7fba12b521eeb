//! Document storage: a collection-oriented store of JSON documents plus the upload directory.
//!
//! Every record lives in one of a fixed set of [`Collection`]s as a JSON object keyed by a
//! store-assigned [`Uuid`]. The API layer never sees which backend is in use.

pub mod files;
pub mod memory;
pub mod postgres;

pub use files::{FileStore, FileStoreError};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

pub type JsonMap = Map<String, JsonValue>;
pub type StoreResult<T> = Result<T, StoreError>;

/// Collections known to the store. Each maps to one table in Postgres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Pieces,
    Info,
    Photos,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Pieces, Collection::Info, Collection::Photos];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Pieces => "pieces",
            Collection::Info => "info",
            Collection::Photos => "photos",
        }
    }
}

/// Selection criteria. Field names are `'static` so they can only come from typed models.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Id(Uuid),
    FieldEq(&'static str, JsonValue),
}

impl Filter {
    /// Whether `doc` satisfies the filter. Used by in-process backends.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => doc.id == *id,
            Filter::FieldEq(field, value) => doc.body.get(*field) == Some(value),
        }
    }
}

/// A stored record: the store-assigned id plus the JSON attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: JsonMap,
}

impl Document {
    pub fn new(id: Uuid, body: JsonMap) -> Self {
        Self { id, body }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (pool timeout, closed pool, I/O).
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document store query failed: {0}")]
    Query(String),

    #[error("stored document is malformed: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Corrupt(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Contract every document store backend implements.
///
/// Single-document operations (`find_one`, `merge_one`) act on the first match in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: Collection, filter: &Filter)
        -> StoreResult<Option<Document>>;

    /// All matching documents in insertion order.
    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Inserts a new document and returns it with its freshly assigned id.
    async fn insert_one(&self, collection: Collection, fields: JsonMap) -> StoreResult<Document>;

    /// Sets `fields` on the first matching document, leaving other attributes untouched.
    async fn merge_one(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: JsonMap,
    ) -> StoreResult<Option<Document>>;

    /// Replaces every attribute of the document with `id`.
    async fn replace_one(
        &self,
        collection: Collection,
        id: Uuid,
        fields: JsonMap,
    ) -> StoreResult<Option<Document>>;

    /// Removes every matching document and returns how many were removed.
    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64>;

    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_filter_requires_exact_json_equality() {
        let mut body = JsonMap::new();
        body.insert("featured".into(), json!(true));
        let doc = Document::new(Uuid::new_v4(), body);

        assert!(Filter::FieldEq("featured", json!(true)).matches(&doc));
        assert!(!Filter::FieldEq("featured", json!("true")).matches(&doc));
        assert!(!Filter::FieldEq("name", json!(null)).matches(&doc));
        assert!(Filter::All.matches(&doc));
        assert!(Filter::Id(doc.id).matches(&doc));
    }

    #[test]
    fn pool_timeouts_are_unavailable() {
        assert!(StoreError::from(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(!StoreError::from(sqlx::Error::RowNotFound).is_unavailable());
    }
}
