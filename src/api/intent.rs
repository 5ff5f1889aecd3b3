//! Client for the card-processing intent API.

use std::time::Duration;

use reqwest::Method;

use super::error::ApiError;
use super::http::HttpService;
use crate::model::{PaymentIntent, PaymentIntentRequest};

/// Default intent API origin.
pub const DEFAULT_INTENT_URL: &str = "http://localhost:3001";

/// Creates payment intents for card subscriptions. Unauthenticated.
#[derive(Debug, Clone)]
pub struct IntentClient {
    http: HttpService,
}

impl IntentClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpService::new(endpoint, timeout)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }

    /// Ask the processor for an intent; the returned client secret is used to
    /// confirm the card payment.
    pub async fn create_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ApiError> {
        self.http.send_json(Method::POST, "/api/payments/create-intent", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::DEFAULT_TIMEOUT;

    #[test]
    fn test_endpoint() {
        let client = IntentClient::new(DEFAULT_INTENT_URL, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3001");
    }

    #[test]
    fn test_intent_request_body() {
        let request = PaymentIntentRequest {
            member_id: 3,
            amount: 2990,
            duration_in_months: 3,
            description: "Abonnement trimestriel".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["durationInMonths"], 3);
        assert_eq!(json["memberId"], 3);
    }
}
