//! Document store backed by PostgreSQL.
//!
//! Each collection is a table of `(id UUID, doc JSONB, created_at TIMESTAMPTZ)`. Field filters use
//! JSONB containment (`doc @> {"field": value}`) so the field name is always a bound value, never
//! spliced into SQL.

use super::{Collection, Document, DocumentStore, Filter, JsonMap, StoreError, StoreResult};
use crate::infra::config::AppConfig;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, info};
use uuid::Uuid;

/// A document store that uses a process-wide PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Builds the pool from config and makes sure every collection table exists.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(config.database_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        info!(
            max_connections = config.database_max_connections,
            "Connected to Postgres document store"
        );

        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for collection in Collection::ALL {
            let table = collection.table_name();
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id UUID PRIMARY KEY,
                    doc JSONB NOT NULL DEFAULT '{{}}'::jsonb,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )"
            ))
            .execute(&self.pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS {table}_doc_gin ON {table} USING GIN (doc jsonb_path_ops)"
            ))
            .execute(&self.pool)
            .await?;
            debug!(table, "Collection table ready");
        }
        Ok(())
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            qb.push("TRUE");
        }
        Filter::Id(id) => {
            qb.push("id = ");
            qb.push_bind(*id);
        }
        Filter::FieldEq(field, value) => {
            let mut pattern = JsonMap::new();
            pattern.insert((*field).to_string(), value.clone());
            qb.push("doc @> ");
            qb.push_bind(JsonValue::Object(pattern));
        }
    }
}

fn row_to_document(row: &PgRow) -> StoreResult<Document> {
    let id: Uuid = row.try_get("id")?;
    let doc: JsonValue = row.try_get("doc")?;
    match doc {
        JsonValue::Object(body) => Ok(Document::new(id, body)),
        other => Err(StoreError::Corrupt(format!(
            "document {} is not a JSON object: {}",
            id, other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT id, doc FROM {} WHERE ",
            collection.table_name()
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at, id LIMIT 1");

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT id, doc FROM {} WHERE ",
            collection.table_name()
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at, id");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_document).collect()
    }

    async fn insert_one(&self, collection: Collection, fields: JsonMap) -> StoreResult<Document> {
        let row = sqlx::query(&format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING id, doc",
            collection.table_name()
        ))
        .bind(Uuid::new_v4())
        .bind(JsonValue::Object(fields))
        .fetch_one(&self.pool)
        .await?;
        row_to_document(&row)
    }

    async fn merge_one(
        &self,
        collection: Collection,
        filter: &Filter,
        fields: JsonMap,
    ) -> StoreResult<Option<Document>> {
        let table = collection.table_name();
        let mut qb = QueryBuilder::new(format!("UPDATE {table} SET doc = doc || "));
        qb.push_bind(JsonValue::Object(fields));
        qb.push(format!(" WHERE id = (SELECT id FROM {table} WHERE "));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at, id LIMIT 1) RETURNING id, doc");

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn replace_one(
        &self,
        collection: Collection,
        id: Uuid,
        fields: JsonMap,
    ) -> StoreResult<Option<Document>> {
        let row = sqlx::query(&format!(
            "UPDATE {} SET doc = $1 WHERE id = $2 RETURNING id, doc",
            collection.table_name()
        ))
        .bind(JsonValue::Object(fields))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn delete_many(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE ", collection.table_name()));
        push_filter(&mut qb, filter);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
