//! JSONB document store
//!
//! Listings and bookings are kept as schemaless JSON documents, one table
//! per collection. Every collection has the same shape:
//!
//! ```sql
//! id UUID PRIMARY KEY, data JSONB NOT NULL, created_at TIMESTAMPTZ NOT NULL
//! ```
//!
//! Collection names come from the closed [`Collection`] enum, never from
//! caller input, so the table name can be formatted into the statement.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::DatabaseError;

/// The document collections the core uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Properties,
    Bookings,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Properties => "properties",
            Collection::Bookings => "bookings",
        }
    }

    /// Entity name used in not-found errors
    pub fn entity(&self) -> &'static str {
        match self {
            Collection::Properties => "Property",
            Collection::Bookings => "Booking",
        }
    }
}

/// A stored document with its key and insertion time
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// Row selection for [`DocumentStore::query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Top-level document field compared as text
    FieldEquals { field: &'static str, value: String },
}

impl Filter {
    pub fn field_equals(field: &'static str, value: impl Into<String>) -> Self {
        Filter::FieldEquals {
            field,
            value: value.into(),
        }
    }
}

/// Thin access layer over the document tables
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: PgPool,
}

impl DocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, data), fields(collection = collection.table(), id = %id))]
    pub async fn insert(
        &self,
        collection: Collection,
        id: Uuid,
        data: Value,
        created_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (id, data, created_at) VALUES ($1, $2, $3)",
            collection.table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(data)
            .bind(created_at)
            .execute(&self.pool)
            .await?;
        debug!("Document inserted");
        Ok(())
    }

    #[instrument(skip(self), fields(collection = collection.table(), id = %id))]
    pub async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<DocumentRow>, DatabaseError> {
        let sql = format!(
            "SELECT id, data, created_at FROM {} WHERE id = $1",
            collection.table()
        );
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Returns matching documents, newest first
    ///
    /// Ties on `created_at` fall back to the id so the order is total.
    #[instrument(skip(self), fields(collection = collection.table()))]
    pub async fn query(&self, collection: Collection, filter: &Filter) -> Result<Vec<DocumentRow>, DatabaseError> {
        let rows = match filter {
            Filter::All => {
                let sql = format!(
                    "SELECT id, data, created_at FROM {} ORDER BY created_at DESC, id DESC",
                    collection.table()
                );
                sqlx::query_as::<_, DocumentRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            Filter::FieldEquals { field, value } => {
                let sql = format!(
                    "SELECT id, data, created_at FROM {} WHERE data->>$1 = $2 \
                     ORDER BY created_at DESC, id DESC",
                    collection.table()
                );
                sqlx::query_as::<_, DocumentRow>(&sql)
                    .bind(*field)
                    .bind(value)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        debug!(count = rows.len(), "Documents fetched");
        Ok(rows)
    }

    /// Shallow-merges `fields` into an existing document
    ///
    /// Returns `false` when no document has this id.
    #[instrument(skip(self, fields), fields(collection = collection.table(), id = %id))]
    pub async fn merge(&self, collection: Collection, id: Uuid, fields: Value) -> Result<bool, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET data = data || $2 WHERE id = $1",
            collection.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(fields)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes a document; a missing id is not an error
    #[instrument(skip(self), fields(collection = collection.table(), id = %id))]
    pub async fn delete(&self, collection: Collection, id: Uuid) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        debug!(removed = result.rows_affected(), "Document delete executed");
        Ok(())
    }

    /// Round-trips a trivial statement to confirm the store is reachable
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
