//! Listing Domain Ports
//!
//! This module defines the repository port for property listings. The
//! document-store adapter lives in `infra_db`; an in-memory implementation is
//! available behind the `mock` feature for tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_listing::ports::PropertyRepository;
//! use std::sync::Arc;
//!
//! pub struct PropertyService {
//!     repository: Arc<dyn PropertyRepository>,
//! }
//! ```
//!
//! Every operation fails with a [`StoreError`]; callers can always tell a
//! missing record, a rejected caller and an unreachable store apart.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PropertyId, StoreError, UserId};

use crate::property::{NewProperty, Property, PropertyPatch};

/// Repository port for property listings
#[async_trait]
pub trait PropertyRepository: DomainPort + HealthCheckable {
    /// Returns every listing, newest first
    ///
    /// An empty store yields an empty vector, never an error.
    async fn list(&self) -> Result<Vec<Property>, StoreError>;

    /// Fetches one listing; `None` is the not-found signal
    async fn get_by_id(&self, id: PropertyId) -> Result<Option<Property>, StoreError>;

    /// Persists a new listing owned by `created_by`
    ///
    /// Assigns the id and stamps `created_at` and `updated_at`.
    async fn create(&self, new: NewProperty, created_by: UserId) -> Result<PropertyId, StoreError>;

    /// Merges the supplied fields and stamps `updated_at`
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` if no listing has this id.
    async fn update(&self, id: PropertyId, patch: PropertyPatch) -> Result<(), StoreError>;

    /// Removes a listing; deleting a missing id succeeds
    async fn delete(&self, id: PropertyId) -> Result<(), StoreError>;
}

/// In-memory implementation of PropertyRepository for testing
///
/// The lock is released between calls, so check-then-act sequences built on
/// top of it race exactly as they do against the real store.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;

    use chrono::Utc;
    use core_kernel::HealthCheckResult;
    use tokio::sync::RwLock;

    #[derive(Debug, Clone)]
    struct Stored {
        seq: u64,
        property: Property,
    }

    /// In-memory property store
    #[derive(Debug, Default)]
    pub struct InMemoryPropertyRepository {
        records: Arc<RwLock<HashMap<PropertyId, Stored>>>,
        sequence: AtomicU64,
        unavailable: AtomicBool,
        deny_writes: AtomicBool,
    }

    impl InMemoryPropertyRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store with existing listings
        pub async fn with_properties(properties: Vec<Property>) -> Self {
            let repo = Self::new();
            {
                let mut records = repo.records.write().await;
                for property in properties {
                    let seq = repo.sequence.fetch_add(1, Ordering::SeqCst);
                    records.insert(property.id, Stored { seq, property });
                }
            }
            repo
        }

        /// Makes every subsequent call fail as if the store were unreachable
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Makes writes fail as if an access rule rejected them
        pub fn deny_writes(&self, deny: bool) {
            self.deny_writes.store(deny, Ordering::SeqCst);
        }

        pub async fn len(&self) -> usize {
            self.records.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.records.read().await.is_empty()
        }

        fn check_available(&self) -> Result<(), StoreError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(StoreError::transient("in-memory property store is offline"));
            }
            Ok(())
        }

        fn check_writable(&self) -> Result<(), StoreError> {
            self.check_available()?;
            if self.deny_writes.load(Ordering::SeqCst) {
                return Err(StoreError::permission_denied("writes to properties are not allowed"));
            }
            Ok(())
        }
    }

    impl DomainPort for InMemoryPropertyRepository {}

    #[async_trait]
    impl HealthCheckable for InMemoryPropertyRepository {
        async fn health_check(&self) -> HealthCheckResult {
            match self.check_available() {
                Ok(()) => HealthCheckResult::healthy("in-memory-properties", 0),
                Err(e) => HealthCheckResult::unhealthy("in-memory-properties", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl PropertyRepository for InMemoryPropertyRepository {
        async fn list(&self) -> Result<Vec<Property>, StoreError> {
            self.check_available()?;
            let records = self.records.read().await;
            let mut stored: Vec<_> = records.values().cloned().collect();
            stored.sort_by(|a, b| {
                b.property
                    .created_at
                    .cmp(&a.property.created_at)
                    .then(b.seq.cmp(&a.seq))
            });
            Ok(stored.into_iter().map(|s| s.property).collect())
        }

        async fn get_by_id(&self, id: PropertyId) -> Result<Option<Property>, StoreError> {
            self.check_available()?;
            Ok(self.records.read().await.get(&id).map(|s| s.property.clone()))
        }

        async fn create(&self, new: NewProperty, created_by: UserId) -> Result<PropertyId, StoreError> {
            self.check_writable()?;
            let id = PropertyId::new();
            let property = Property::from_new(id, new, created_by, Utc::now());
            let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
            self.records.write().await.insert(id, Stored { seq, property });
            Ok(id)
        }

        async fn update(&self, id: PropertyId, patch: PropertyPatch) -> Result<(), StoreError> {
            self.check_writable()?;
            let mut records = self.records.write().await;
            let stored = records
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found("Property", id))?;
            patch.apply_to(&mut stored.property, Utc::now());
            Ok(())
        }

        async fn delete(&self, id: PropertyId) -> Result<(), StoreError> {
            self.check_writable()?;
            self.records.write().await.remove(&id);
            Ok(())
        }
    }
}
