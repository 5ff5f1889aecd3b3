//! Records as served by the backend services (English, camelCase JSON).

use serde::{Deserialize, Serialize};

/// A member as returned by `GET /api/members`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Member {
    /// "First Last", as shown wherever a member is referenced.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Body of `POST /api/members`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub active: bool,
}

/// Body of `PUT /api/members/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// An activity (course, session) offered by the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_participants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Body of `POST /api/activities` and `PUT /api/activities/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

/// A member's booking of an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub member_id: i64,
    pub activity_id: i64,
    pub status: BookingStatus,
    /// `yyyy-MM-dd HH:mm:ss`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<String>,
}

/// Body of `POST /api/bookings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub member_id: i64,
    pub activity_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Cash,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// A payment as returned by the payment service. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub member_id: i64,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    #[serde(default)]
    pub description: String,
    /// `yyyy-MM-dd HH:mm:ss`, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of `POST /api/payments`. Amount in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentDto {
    pub member_id: i64,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub description: String,
}

/// Body of the card-processing `create-intent` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    pub member_id: i64,
    pub amount: i64,
    pub duration_in_months: u32,
    pub description: String,
}

/// Intent handed back by the card processor; the client secret is what a
/// card form needs to confirm the payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_from_camel_case() {
        let member: Member = serde_json::from_str(
            r#"{"id":3,"firstName":"Jean","lastName":"Dupont","email":"jd@example.com","phone":"0601","active":true}"#,
        )
        .unwrap();
        assert_eq!(member.first_name, "Jean");
        assert_eq!(member.full_name(), "Jean Dupont");
        assert!(member.active);
    }

    #[test]
    fn test_member_tolerates_missing_fields() {
        let member: Member = serde_json::from_str(r#"{"id":3}"#).unwrap();
        assert_eq!(member.phone, None);
        assert!(!member.active);
        assert_eq!(member.full_name(), "");
    }

    #[test]
    fn test_booking_status_wire_names() {
        let booking: Booking = serde_json::from_str(
            r#"{"id":1,"memberId":2,"activityId":3,"status":"CANCELLED","bookingDate":"2024-05-01 10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.booking_date.as_deref(), Some("2024-05-01 10:00:00"));
    }

    #[test]
    fn test_create_payment_serializes_camel_case() {
        let dto = CreatePaymentDto {
            member_id: 4,
            amount: 4990,
            payment_method: PaymentMethod::Transfer,
            description: "Abonnement".to_string(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["memberId"], 4);
        assert_eq!(json["paymentMethod"], "TRANSFER");
    }

    #[test]
    fn test_member_update_skips_unset_fields() {
        let update = MemberUpdate {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"email":"new@example.com"}"#);
    }
}
