use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::filter::{Filter, SqlParam};
use super::store::{Collection, DocumentStore, StoreError};
use crate::config::DatabaseConfig;

/// JSONB document store: one `(id UUID PRIMARY KEY, doc JSONB)` table per collection
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Connected document store to PostgreSQL");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (id UUID PRIMARY KEY, doc JSONB NOT NULL)",
                collection.table_name()
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn select(&self, collection: Collection, filter: &Filter, limit: Option<i64>) -> Result<Vec<Value>, StoreError> {
        let mut params = Vec::new();
        let where_clause = filter.to_sql(&mut params)?;
        let mut sql = format!("SELECT doc FROM {} WHERE {}", collection.table_name(), where_clause);
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut query = sqlx::query(&sql);
        for param in params {
            query = match param {
                SqlParam::Json(value) => query.bind(value),
                SqlParam::Ids(ids) => query.bind(ids),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<Value, _>("doc").map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", collection.table_name());
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(Some(row.try_get::<Value, _>("doc")?)),
            None => Ok(None),
        }
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Value>, StoreError> {
        Ok(self.select(collection, filter, Some(1)).await?.into_iter().next())
    }

    async fn find_many(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        self.select(collection, filter, None).await
    }

    async fn save(&self, collection: Collection, id: Uuid, document: Value) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc",
            collection.table_name()
        );
        sqlx::query(&sql).bind(id).bind(document).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
