//! Document-store adapter tests against a real PostgreSQL instance
//!
//! Run with `cargo test -p infra_db -- --ignored` on a machine with Docker.

use std::sync::Arc;

use chrono::NaiveTime;
use rust_decimal_macros::dec;

use core_kernel::{AdapterHealth, BookingId, ErrorKind, HealthCheckable, PropertyId};
use domain_booking::{Booking, BookingPatch, BookingRepository, BookingService, BookingStatus};
use domain_listing::{Property, PropertyPatch, PropertyRepository, PropertyService, SearchCriteria};
use infra_db::{PostgresBookingRepository, PostgresPropertyRepository};
use test_utils::{
    assert_err_kind, assert_error_kind, assert_newest_first, NewBookingBuilder, PropertyFixtures,
    TemporalFixtures, TestDatabase, UserFixtures,
};

// ============================================================================
// Property Adapter Tests
// ============================================================================

mod property_adapter_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_create_and_fetch_property() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresPropertyRepository::new(db.pool.clone());

        let id = repo
            .create(PropertyFixtures::dublin_apartment(), UserFixtures::owner())
            .await
            .unwrap();
        let property = repo.get_by_id(id).await.unwrap().unwrap();

        assert_eq!(property.id, id);
        assert_eq!(property.price, dec!(2450));
        assert_eq!(property.created_by, UserFixtures::owner());
        assert_eq!(property.updated_at, Some(property.created_at));
        assert_eq!(property.agent, PropertyFixtures::agent());
        assert!(repo.get_by_id(PropertyId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_stored_property_equals_request() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresPropertyRepository::new(db.pool.clone());

        for new in PropertyFixtures::all() {
            let id = repo.create(new.clone(), UserFixtures::owner()).await.unwrap();
            let stored = repo.get_by_id(id).await.unwrap().unwrap();
            let expected = Property::from_new(id, new, UserFixtures::owner(), stored.created_at);
            assert_eq!(stored, expected);
        }
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_list_is_newest_first() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresPropertyRepository::new(db.pool.clone());
        let mut ids = Vec::new();
        for property in PropertyFixtures::all() {
            ids.push(repo.create(property, UserFixtures::owner()).await.unwrap());
        }

        let listed = repo.list().await.unwrap();

        assert_eq!(listed.len(), 3);
        assert_newest_first(&listed, |p| p.created_at);
        assert_eq!(listed[0].id, ids[2]);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_merge_updates_and_clears_fields() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresPropertyRepository::new(db.pool.clone());
        let id = repo
            .create(PropertyFixtures::dublin_apartment(), UserFixtures::owner())
            .await
            .unwrap();
        let before = repo.get_by_id(id).await.unwrap().unwrap();

        let patch = PropertyPatch {
            price: Some(dec!(2600)),
            eircode: Some(None),
            latitude: Some(None),
            longitude: Some(None),
            ..Default::default()
        };
        repo.update(id, patch).await.unwrap();

        let after = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(after.price, dec!(2600));
        assert!(after.eircode.is_none());
        assert!(!after.has_coordinates());
        assert_eq!(after.title, before.title);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_update_missing_property_is_not_found() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresPropertyRepository::new(db.pool.clone());

        let err = repo
            .update(PropertyId::new(), PropertyPatch { title: Some("x".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert_error_kind(&err, ErrorKind::NotFound);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_service_search_over_store() {
        let db = TestDatabase::new().await.unwrap();
        let service = PropertyService::new(Arc::new(PostgresPropertyRepository::new(db.pool.clone())));
        for property in PropertyFixtures::all() {
            service.create(&UserFixtures::owner_identity(), property).await.unwrap();
        }

        let dublin = service
            .search(&SearchCriteria::new().location("dublin"))
            .await
            .unwrap();
        assert_eq!(dublin.len(), 1);
        assert_eq!(service.get_mappable().await.unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_delete_is_idempotent() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresPropertyRepository::new(db.pool.clone());
        let id = repo
            .create(PropertyFixtures::galway_studio(), UserFixtures::owner())
            .await
            .unwrap();

        repo.delete(id).await.unwrap();
        repo.delete(id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}

// ============================================================================
// Booking Adapter Tests
// ============================================================================

mod booking_adapter_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_booking_round_trip_and_filters() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresBookingRepository::new(db.pool.clone());
        let property_id = PropertyId::new();

        let request = NewBookingBuilder::new(property_id).notes("Gate code 1234").build();
        let id = repo
            .create(request.clone(), UserFixtures::owner(), BookingStatus::Pending)
            .await
            .unwrap();
        repo.create(
            NewBookingBuilder::new(PropertyId::new()).build(),
            UserFixtures::other_user(),
            BookingStatus::Pending,
        )
        .await
        .unwrap();

        let booking = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(booking.slot(), request.slot());
        assert_eq!(booking.contact, request.contact);
        assert!(booking.updated_at.is_none());

        let mine = repo.list_by_user(&UserFixtures::owner()).await.unwrap();
        assert_eq!(mine.len(), 1);
        let for_property = repo.list_by_property(property_id).await.unwrap();
        assert_eq!(for_property[0].id, id);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_stored_booking_equals_request() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresBookingRepository::new(db.pool.clone());
        let request = NewBookingBuilder::new(PropertyId::new())
            .on(TemporalFixtures::tomorrow(), NaiveTime::from_hms_opt(17, 15, 0).unwrap())
            .notes("Gate code 1234")
            .build();

        let id = repo
            .create(request.clone(), UserFixtures::owner(), BookingStatus::Pending)
            .await
            .unwrap();

        let stored = repo.get_by_id(id).await.unwrap().unwrap();
        let expected = Booking::from_new(id, request, UserFixtures::owner(), BookingStatus::Pending, stored.created_at);
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_time_with_seconds_is_never_stored() {
        let db = TestDatabase::new().await.unwrap();
        let repo = Arc::new(PostgresBookingRepository::new(db.pool.clone()));
        let service = BookingService::new(repo.clone(), Arc::new(TemporalFixtures::clock()));
        let property_id = PropertyId::new();
        let half_past = NaiveTime::from_hms_opt(10, 0, 30).unwrap();
        let request = || {
            NewBookingBuilder::new(property_id)
                .on(TemporalFixtures::tomorrow(), half_past)
                .build()
        };

        for user in [UserFixtures::owner(), UserFixtures::other_user()] {
            assert_err_kind(&service.create(&user, request()).await, ErrorKind::InvalidRequest);
        }
        assert!(repo
            .create(request(), UserFixtures::owner(), BookingStatus::Pending)
            .await
            .is_err());
        assert!(repo.list_by_property(property_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_status_patch_stamps_updated_at() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresBookingRepository::new(db.pool.clone());
        let id = repo
            .create(
                NewBookingBuilder::new(PropertyId::new()).build(),
                UserFixtures::owner(),
                BookingStatus::Pending,
            )
            .await
            .unwrap();

        repo.update(id, BookingPatch::status(BookingStatus::Cancelled)).await.unwrap();

        let booking = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert!(booking.updated_at.is_some());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_service_rules_over_store() {
        let db = TestDatabase::new().await.unwrap();
        let service = BookingService::new(
            Arc::new(PostgresBookingRepository::new(db.pool.clone())),
            Arc::new(TemporalFixtures::clock()),
        );
        let property_id = PropertyId::new();

        service
            .create(&UserFixtures::owner(), NewBookingBuilder::new(property_id).build())
            .await
            .unwrap();
        let second = service
            .create(&UserFixtures::other_user(), NewBookingBuilder::new(property_id).build())
            .await;

        assert_err_kind(&second, ErrorKind::InvalidRequest);
        assert_err_kind(
            &service.update_status(BookingId::new(), BookingStatus::Confirmed).await,
            ErrorKind::NotFound,
        );
    }
}

// ============================================================================
// Health and Failure Tests
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_health_check_reports_healthy() {
        let db = TestDatabase::new().await.unwrap();
        let result = PostgresBookingRepository::new(db.pool.clone()).health_check().await;
        assert_eq!(result.status, AdapterHealth::Healthy);
        assert_eq!(result.adapter_id, "postgres-bookings");
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_closed_pool_is_transient() {
        let db = TestDatabase::new().await.unwrap();
        let repo = PostgresPropertyRepository::new(db.pool.clone());
        db.pool.close().await;

        assert_err_kind(&repo.list().await, ErrorKind::TransientStoreError);
        assert_eq!(repo.health_check().await.status, AdapterHealth::Unhealthy);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_revoked_privileges_are_permission_denied() {
        let db = TestDatabase::new().await.unwrap();
        for statement in [
            "CREATE ROLE listing_reader LOGIN PASSWORD 'reader'",
            "GRANT SELECT ON properties TO listing_reader",
        ] {
            sqlx::query(statement).execute(&db.pool).await.unwrap();
        }
        let url = format!(
            "postgres://listing_reader:reader@{}:{}/{}",
            db.config.host, db.config.port, db.config.database
        );
        let pool = infra_db::create_pool_from_url(&url).await.unwrap();
        let repo = PostgresPropertyRepository::new(pool);

        assert!(repo.list().await.unwrap().is_empty());
        let result = repo
            .create(PropertyFixtures::cork_house(), UserFixtures::owner())
            .await;
        assert_err_kind(&result, ErrorKind::PermissionDenied);
    }
}
