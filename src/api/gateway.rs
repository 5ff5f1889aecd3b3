//! Client for the primary REST gateway (members, activities, bookings).
//!
//! Every call is authenticated with HTTP Basic credentials.
//!
//! ```rust,no_run
//! use centre_admin::api::GatewayClient;
//!
//! # async fn run() -> Result<(), centre_admin::api::ApiError> {
//! let gateway = GatewayClient::builder()
//!     .endpoint("http://localhost:8080")
//!     .credentials("admin", "admin")
//!     .build()?;
//!
//! for member in gateway.list_members().await? {
//!     println!("{} {}", member.first_name, member.last_name);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Method;

use super::error::ApiError;
use super::http::{Auth, HttpService, DEFAULT_TIMEOUT};
use crate::model::{
    Activity, Booking, Member, MemberUpdate, NewActivity, NewBooking, NewMember,
};

/// Default gateway origin.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: HttpService,
}

impl GatewayClient {
    pub fn builder() -> GatewayClientBuilder {
        GatewayClientBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }

    /// Replace the Basic credentials used for subsequent calls.
    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.http.set_auth(Auth::basic(username, password));
    }

    pub fn clear_credentials(&mut self) {
        self.http.set_auth(Auth::None);
    }

    pub fn has_credentials(&self) -> bool {
        !self.http.auth().is_none()
    }

    // ----- members -----

    pub async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        self.http.get_json("/api/members").await
    }

    pub async fn get_member(&self, id: i64) -> Result<Member, ApiError> {
        self.http.get_json(&format!("/api/members/{}", id)).await
    }

    pub async fn create_member(&self, member: &NewMember) -> Result<Member, ApiError> {
        self.http.send_json(Method::POST, "/api/members", member).await
    }

    pub async fn update_member(&self, id: i64, update: &MemberUpdate) -> Result<Member, ApiError> {
        self.http.send_json(Method::PUT, &format!("/api/members/{}", id), update).await
    }

    pub async fn delete_member(&self, id: i64) -> Result<(), ApiError> {
        self.http.send_empty(Method::DELETE, &format!("/api/members/{}", id)).await
    }

    // ----- activities -----

    pub async fn list_activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.http.get_json("/api/activities").await
    }

    pub async fn get_activity(&self, id: i64) -> Result<Activity, ApiError> {
        self.http.get_json(&format!("/api/activities/{}", id)).await
    }

    pub async fn create_activity(&self, activity: &NewActivity) -> Result<Activity, ApiError> {
        self.http.send_json(Method::POST, "/api/activities", activity).await
    }

    pub async fn update_activity(
        &self,
        id: i64,
        activity: &NewActivity,
    ) -> Result<Activity, ApiError> {
        self.http.send_json(Method::PUT, &format!("/api/activities/{}", id), activity).await
    }

    pub async fn delete_activity(&self, id: i64) -> Result<(), ApiError> {
        self.http.send_empty(Method::DELETE, &format!("/api/activities/{}", id)).await
    }

    // ----- bookings -----

    pub async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.http.get_json("/api/bookings").await
    }

    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.http.send_json(Method::POST, "/api/bookings", booking).await
    }

    /// Mark a booking as cancelled (it stays listed).
    pub async fn cancel_booking(&self, id: i64) -> Result<Booking, ApiError> {
        self.http.call_json(Method::PUT, &format!("/api/bookings/{}/cancel", id)).await
    }

    pub async fn delete_booking(&self, id: i64) -> Result<(), ApiError> {
        self.http.send_empty(Method::DELETE, &format!("/api/bookings/{}", id)).await
    }
}

/// Builder for [`GatewayClient`].
#[derive(Debug, Default)]
pub struct GatewayClientBuilder {
    endpoint: Option<String>,
    credentials: Option<(String, String)>,
    timeout: Option<Duration>,
}

impl GatewayClientBuilder {
    /// Set the gateway origin (default: `http://localhost:8080`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<GatewayClient, ApiError> {
        let mut http = HttpService::new(
            self.endpoint.unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?;
        if let Some((username, password)) = self.credentials {
            http.set_auth(Auth::basic(username, password));
        }
        Ok(GatewayClient { http })
    }
}
