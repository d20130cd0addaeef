//! PostgreSQL Property Adapter
//!
//! Stores listings as documents in the `properties` collection.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PropertyId, StoreError, UserId};
use domain_listing::{NewProperty, Property, PropertyPatch, PropertyRepository};

use crate::document::{Collection, DocumentStore, Filter};
use crate::mapping::{decode_property, PropertyDocument, PropertyPatchDocument};

use super::{ping_health, store_now};

const COLLECTION: Collection = Collection::Properties;

/// Document-store implementation of [`PropertyRepository`]
#[derive(Debug, Clone)]
pub struct PostgresPropertyRepository {
    store: DocumentStore,
}

impl PostgresPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: DocumentStore::new(pool),
        }
    }
}

impl DomainPort for PostgresPropertyRepository {}

#[async_trait]
impl HealthCheckable for PostgresPropertyRepository {
    async fn health_check(&self) -> HealthCheckResult {
        ping_health(&self.store, "postgres-properties").await
    }
}

#[async_trait]
impl PropertyRepository for PostgresPropertyRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Property>, StoreError> {
        let rows = self.store.query(COLLECTION, &Filter::All).await?;
        let properties = rows
            .into_iter()
            .map(decode_property)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = properties.len(), "Listed properties");
        Ok(properties)
    }

    #[instrument(skip(self), fields(property_id = %id))]
    async fn get_by_id(&self, id: PropertyId) -> Result<Option<Property>, StoreError> {
        let row = self.store.get(COLLECTION, *id.as_uuid()).await?;
        Ok(row.map(decode_property).transpose()?)
    }

    #[instrument(skip(self, new), fields(created_by = %created_by))]
    async fn create(&self, new: NewProperty, created_by: UserId) -> Result<PropertyId, StoreError> {
        let id = PropertyId::new();
        let created_at = store_now();
        let document = PropertyDocument::from_new(new, created_by, created_at);

        self.store
            .insert(COLLECTION, *id.as_uuid(), document.to_value()?, created_at)
            .await?;

        info!(property_id = %id, "Property stored");
        Ok(id)
    }

    #[instrument(skip(self, patch), fields(property_id = %id))]
    async fn update(&self, id: PropertyId, patch: PropertyPatch) -> Result<(), StoreError> {
        let fields = PropertyPatchDocument::from_patch(patch, store_now()).to_value()?;
        if !self.store.merge(COLLECTION, *id.as_uuid(), fields).await? {
            return Err(StoreError::not_found(COLLECTION.entity(), id));
        }
        debug!("Property document merged");
        Ok(())
    }

    #[instrument(skip(self), fields(property_id = %id))]
    async fn delete(&self, id: PropertyId) -> Result<(), StoreError> {
        self.store.delete(COLLECTION, *id.as_uuid()).await?;
        Ok(())
    }
}
