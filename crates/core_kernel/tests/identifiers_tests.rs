//! Unit tests for the identifier types
//!
//! Tests cover creation, parsing, conversion and display formatting of the
//! store-assigned ids and the opaque user id.

use core_kernel::{BookingId, PropertyId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

mod property_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = PropertyId::new();
        let id2 = PropertyId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_generates_time_ordered_ids() {
        let id1 = PropertyId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = PropertyId::new();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = PropertyId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(PropertyId::prefix(), "PRP");
        assert_eq!(BookingId::prefix(), "BKG");
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("PRP-not-a-uuid".parse::<PropertyId>().is_err());
        assert!("".parse::<PropertyId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let id = PropertyId::from(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}

mod booking_id_tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let original = BookingId::new();
        let display = original.to_string();
        assert!(display.starts_with("BKG-"));
        assert_eq!(display.parse::<BookingId>().unwrap(), original);
    }

    #[test]
    fn test_prefix_of_other_type_is_not_stripped() {
        let original = BookingId::new();
        let foreign = format!("PRP-{}", original.as_uuid());
        assert!(foreign.parse::<BookingId>().is_err());
    }
}

mod user_id_tests {
    use super::*;

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(UserId::from("abc"), UserId::new("abc".to_string()));
        assert_ne!(UserId::from("abc"), UserId::from("ABC"));
    }

    #[test]
    fn test_display_is_raw() {
        assert_eq!(UserId::from("Xk29fQ").to_string(), "Xk29fQ");
    }
}

proptest! {
    #[test]
    fn prop_uuid_round_trips_through_display(bytes in any::<[u8; 16]>()) {
        let id = BookingId::from_uuid(Uuid::from_bytes(bytes));
        let parsed: BookingId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }
}
