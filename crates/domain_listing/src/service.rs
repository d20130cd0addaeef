//! Property domain service
//!
//! Enforces ownership on top of the repository port: only an authenticated
//! caller may create a listing, and only its creator may change or remove it.
//! The ownership check reads the record and then writes; it is not atomic
//! with the write.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use core_kernel::{Identity, PropertyId, UserId};

use crate::error::ListingError;
use crate::ports::PropertyRepository;
use crate::property::{NewProperty, Property, PropertyPatch, PropertyType};
use crate::search::{location_matches, SearchCriteria};

/// Service for listing CRUD and search
#[derive(Clone)]
pub struct PropertyService {
    repository: Arc<dyn PropertyRepository>,
}

impl PropertyService {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self { repository }
    }

    /// Creates a listing owned by the calling user
    ///
    /// # Errors
    ///
    /// * `Unauthenticated` if the caller is anonymous
    /// * `Validation` if the payload is rejected
    /// * `Store` for repository failures
    #[instrument(skip(self, identity, new))]
    pub async fn create(&self, identity: &Identity, new: NewProperty) -> Result<PropertyId, ListingError> {
        let owner = require_user(identity, "create")?;
        new.ensure_valid()?;

        let id = self.repository.create(new, owner.clone()).await?;
        info!(property_id = %id, owner = %owner, "Property created");
        Ok(id)
    }

    /// Applies a partial update if the caller owns the listing
    ///
    /// A listing removed between the ownership read and the write surfaces as
    /// not found.
    #[instrument(skip(self, identity, patch), fields(property_id = %id))]
    pub async fn update(
        &self,
        identity: &Identity,
        id: PropertyId,
        patch: PropertyPatch,
    ) -> Result<(), ListingError> {
        let caller = require_user(identity, "update")?;
        patch.ensure_valid()?;

        let existing = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(ListingError::PropertyNotFound(id))?;
        ensure_owner(&existing, caller)?;

        self.repository.update(id, patch).await?;
        info!("Property updated");
        Ok(())
    }

    /// Removes a listing if the caller owns it
    ///
    /// Deleting a listing that no longer exists succeeds.
    #[instrument(skip(self, identity), fields(property_id = %id))]
    pub async fn delete(&self, identity: &Identity, id: PropertyId) -> Result<(), ListingError> {
        let caller = require_user(identity, "delete")?;

        let Some(existing) = self.repository.get_by_id(id).await? else {
            debug!("Property already absent");
            return Ok(());
        };
        ensure_owner(&existing, caller)?;

        self.repository.delete(id).await?;
        info!("Property deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(property_id = %id))]
    pub async fn get(&self, id: PropertyId) -> Result<Option<Property>, ListingError> {
        debug!("Fetching property");
        Ok(self.repository.get_by_id(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Property>, ListingError> {
        Ok(self.repository.list().await?)
    }

    /// Listings created by `owner`, newest first
    #[instrument(skip(self, owner), fields(owner = %owner))]
    pub async fn list_owned_by(&self, owner: &UserId) -> Result<Vec<Property>, ListingError> {
        self.filtered(|p| p.is_owned_by(owner)).await
    }

    /// Listings matching every supplied criterion, in `list()` order
    #[instrument(skip(self, criteria))]
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Property>, ListingError> {
        let all = self.repository.list().await?;
        let found = criteria.apply(all);
        debug!(count = found.len(), "Search complete");
        Ok(found)
    }

    #[instrument(skip(self))]
    pub async fn get_featured(&self) -> Result<Vec<Property>, ListingError> {
        self.filtered(|p| p.is_featured).await
    }

    #[instrument(skip(self, property_type), fields(property_type = %property_type))]
    pub async fn get_by_type(&self, property_type: PropertyType) -> Result<Vec<Property>, ListingError> {
        self.filtered(|p| p.property_type == property_type).await
    }

    /// Case-insensitive substring match on location or address
    #[instrument(skip(self))]
    pub async fn search_by_location(&self, fragment: &str) -> Result<Vec<Property>, ListingError> {
        self.filtered(|p| location_matches(p, fragment)).await
    }

    /// Listings that carry both coordinates
    #[instrument(skip(self))]
    pub async fn get_mappable(&self) -> Result<Vec<Property>, ListingError> {
        self.filtered(Property::has_coordinates).await
    }

    async fn filtered<F>(&self, keep: F) -> Result<Vec<Property>, ListingError>
    where
        F: Fn(&Property) -> bool,
    {
        let all = self.repository.list().await?;
        Ok(all.into_iter().filter(|p| keep(p)).collect())
    }
}

fn require_user<'a>(identity: &'a Identity, action: &'static str) -> Result<&'a UserId, ListingError> {
    identity.user_id().ok_or_else(|| {
        warn!(action, "Anonymous caller rejected");
        ListingError::Unauthenticated { action }
    })
}

fn ensure_owner(property: &Property, caller: &UserId) -> Result<(), ListingError> {
    if property.is_owned_by(caller) {
        return Ok(());
    }
    warn!(property_id = %property.id, caller = %caller, "Ownership mismatch");
    Err(ListingError::NotOwner {
        user: caller.clone(),
        property: property.id,
    })
}
