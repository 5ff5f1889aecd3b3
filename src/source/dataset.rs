//! The snapshot type every data source produces.

use serde::{Deserialize, Serialize};

use crate::model::{Activity, Booking, Member, Payment};

/// One fully-materialized fetch of all four collections, in backend shape.
///
/// Used both as the on-disk fixture format and as the unit exchanged between
/// a source and the application. Missing arrays deserialize as empty.
///
/// ```json
/// {
///   "members": [{ "id": 1, "firstName": "Jean", "lastName": "Dupont",
///                 "email": "jean@example.com", "active": true }],
///   "activities": [],
///   "bookings": [],
///   "payments": []
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub members: Vec<Member>,
    pub activities: Vec<Activity>,
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
            && self.activities.is_empty()
            && self.bookings.is_empty()
            && self.payments.is_empty()
    }

    /// Total number of records across all collections.
    pub fn len(&self) -> usize {
        self.members.len() + self.activities.len() + self.bookings.len() + self.payments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let dataset: Dataset = serde_json::from_str(
            r#"{ "members": [{ "id": 1, "firstName": "Jean", "lastName": "Dupont",
                               "email": "jean@example.com", "active": true }] }"#,
        )
        .unwrap();
        assert_eq!(dataset.members.len(), 1);
        assert!(dataset.activities.is_empty());
        assert!(dataset.payments.is_empty());
        assert_eq!(dataset.len(), 1);
        assert!(!dataset.is_empty());
    }

    #[test]
    fn test_empty_object() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset, Dataset::default());
    }
}
