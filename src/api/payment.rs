//! Client for the JWT-secured payment service.
//!
//! The service does not accept the gateway's Basic credentials. A token is
//! first obtained from `/api/public/auth/token`, then sent as a Bearer header.

use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::http::{Auth, HttpService, DEFAULT_TIMEOUT};
use crate::model::{CreatePaymentDto, Payment};

/// Default payment service origin.
pub const DEFAULT_PAYMENT_URL: &str = "http://localhost:8084";

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: HttpService,
}

impl PaymentClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpService::new(endpoint, timeout)?,
        })
    }

    /// Client for the default origin with the default timeout.
    pub fn local() -> Result<Self, ApiError> {
        Self::new(DEFAULT_PAYMENT_URL, DEFAULT_TIMEOUT)
    }

    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }

    pub fn has_token(&self) -> bool {
        matches!(self.http.auth(), Auth::Bearer(_))
    }

    /// Use an already known token (e.g. one persisted from a previous run).
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.http.set_auth(Auth::Bearer(token.into()));
    }

    pub fn clear_token(&mut self) {
        self.http.set_auth(Auth::None);
    }

    /// Exchange credentials for a JWT and keep it for later calls.
    pub async fn fetch_token(&mut self, username: &str, password: &str) -> Result<String, ApiError> {
        // The token endpoint is public; never send a stale bearer to it
        self.clear_token();
        let response: TokenResponse = self
            .http
            .send_json(
                Method::POST,
                "/api/public/auth/token",
                &TokenRequest { username, password },
            )
            .await?;
        self.set_token(response.token.clone());
        tracing::info!(endpoint = %self.endpoint(), "payment token acquired");
        Ok(response.token)
    }

    pub async fn list(&self) -> Result<Vec<Payment>, ApiError> {
        self.require_token()?;
        self.http.get_json("/api/payments").await
    }

    pub async fn create(&self, payment: &CreatePaymentDto) -> Result<Payment, ApiError> {
        self.require_token()?;
        self.http.send_json(Method::POST, "/api/payments", payment).await
    }

    fn require_token(&self) -> Result<(), ApiError> {
        if self.has_token() {
            Ok(())
        } else {
            Err(ApiError::MissingToken)
        }
    }
}
