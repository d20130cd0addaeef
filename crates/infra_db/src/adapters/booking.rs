//! PostgreSQL Booking Adapter
//!
//! Stores viewing requests as documents in the `bookings` collection. User
//! and property lookups filter on the `userId` and `propertyId` document
//! fields, both of which are indexed.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use core_kernel::{BookingId, DomainPort, HealthCheckResult, HealthCheckable, PropertyId, StoreError, UserId};
use domain_booking::{Booking, BookingPatch, BookingRepository, BookingStatus, NewBooking};

use crate::document::{Collection, DocumentStore, Filter};
use crate::error::DatabaseError;
use crate::mapping::{decode_booking, BookingDocument, BookingPatchDocument};

use super::{ping_health, store_now};

const COLLECTION: Collection = Collection::Bookings;

/// Document-store implementation of [`BookingRepository`]
#[derive(Debug, Clone)]
pub struct PostgresBookingRepository {
    store: DocumentStore,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: DocumentStore::new(pool),
        }
    }

    async fn query(&self, filter: Filter) -> Result<Vec<Booking>, DatabaseError> {
        self.store
            .query(COLLECTION, &filter)
            .await?
            .into_iter()
            .map(decode_booking)
            .collect()
    }
}

impl DomainPort for PostgresBookingRepository {}

#[async_trait]
impl HealthCheckable for PostgresBookingRepository {
    async fn health_check(&self) -> HealthCheckResult {
        ping_health(&self.store, "postgres-bookings").await
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Booking>, StoreError> {
        let bookings = self.query(Filter::All).await?;
        debug!(count = bookings.len(), "Listed bookings");
        Ok(bookings)
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn get_by_id(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        let row = self.store.get(COLLECTION, *id.as_uuid()).await?;
        Ok(row.map(decode_booking).transpose()?)
    }

    #[instrument(skip(self, new), fields(property_id = %new.property_id, user_id = %user_id, status = %status))]
    async fn create(
        &self,
        new: NewBooking,
        user_id: UserId,
        status: BookingStatus,
    ) -> Result<BookingId, StoreError> {
        let id = BookingId::new();
        let created_at = store_now();
        let document = BookingDocument::from_new(new, user_id, status, created_at);

        self.store
            .insert(COLLECTION, *id.as_uuid(), document.to_value()?, created_at)
            .await?;

        info!(booking_id = %id, "Booking stored");
        Ok(id)
    }

    #[instrument(skip(self, patch), fields(booking_id = %id))]
    async fn update(&self, id: BookingId, patch: BookingPatch) -> Result<(), StoreError> {
        let fields = BookingPatchDocument::from_patch(patch, store_now()).to_value()?;
        if !self.store.merge(COLLECTION, *id.as_uuid(), fields).await? {
            return Err(StoreError::not_found(COLLECTION.entity(), id));
        }
        debug!("Booking document merged");
        Ok(())
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn delete(&self, id: BookingId) -> Result<(), StoreError> {
        self.store.delete(COLLECTION, *id.as_uuid()).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .query(Filter::field_equals("userId", user_id.as_str()))
            .await?)
    }

    #[instrument(skip(self))]
    async fn list_by_property(&self, property_id: PropertyId) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .query(Filter::field_equals("propertyId", property_id.as_uuid().to_string()))
            .await?)
    }
}
