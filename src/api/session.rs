//! Login across both credential schemes.
//!
//! The gateway takes Basic credentials on every request; the payment service
//! takes a JWT obtained with the same username and password. A session holds
//! both and knows which are available.

use super::error::ApiError;
use super::gateway::GatewayClient;
use super::intent::IntentClient;
use super::payment::PaymentClient;
use crate::config::Settings;

#[derive(Debug, Clone)]
pub struct Session {
    gateway: GatewayClient,
    payments: PaymentClient,
    intents: IntentClient,
    username: Option<String>,
}

impl Session {
    pub fn new(gateway: GatewayClient, payments: PaymentClient, intents: IntentClient) -> Self {
        Self {
            gateway,
            payments,
            intents,
            username: None,
        }
    }

    /// Build unauthenticated clients for the configured origins.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        let timeout = settings.timeout();
        let gateway = GatewayClient::builder()
            .endpoint(&settings.gateway_url)
            .timeout(timeout)
            .build()?;
        let payments = PaymentClient::new(&settings.payment_url, timeout)?;
        let intents = IntentClient::new(&settings.intent_url, timeout)?;
        Ok(Self::new(gateway, payments, intents))
    }

    /// Log in with one username/password pair.
    ///
    /// The Basic credentials are checked against the gateway by listing
    /// members; a rejection aborts the login and clears them. A payment token
    /// is then requested; if that fails the session stays logged in but
    /// payments are unavailable.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        self.gateway.set_credentials(username, password);

        if let Err(err) = self.gateway.list_members().await {
            tracing::warn!(username, error = %err, "gateway login failed");
            self.gateway.clear_credentials();
            return Err(err);
        }

        match self.payments.fetch_token(username, password).await {
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(username, error = %err, "payment token unavailable");
            }
        }

        self.username = Some(username.to_string());
        tracing::info!(username, payments = self.payments.has_token(), "logged in");
        Ok(())
    }

    /// Forget all credentials.
    pub fn logout(&mut self) {
        self.gateway.clear_credentials();
        self.payments.clear_token();
        self.username = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.gateway.has_credentials()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Whether payment calls can be made (a JWT is held).
    pub fn payments_available(&self) -> bool {
        self.payments.has_token()
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn payments(&self) -> &PaymentClient {
        &self.payments
    }

    pub fn intents(&self) -> &IntentClient {
        &self.intents
    }

    pub fn description(&self) -> String {
        format!("gateway: {}", self.gateway.endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            gateway_url: "http://gw:1".into(),
            payment_url: "http://pay:2".into(),
            intent_url: "http://intent:3".into(),
            ..Settings::default()
        };
        let session = Session::from_settings(&settings).unwrap();
        assert_eq!(session.gateway().endpoint(), "http://gw:1");
        assert_eq!(session.payments().endpoint(), "http://pay:2");
        assert_eq!(session.intents().endpoint(), "http://intent:3");
        assert!(!session.is_authenticated());
        assert!(!session.payments_available());
        assert_eq!(session.description(), "gateway: http://gw:1");
    }

    #[tokio::test]
    async fn test_failed_login_clears_credentials() {
        // Port 9 (discard) on localhost: nothing answers there
        let settings = Settings {
            gateway_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            ..Settings::default()
        };
        let mut session = Session::from_settings(&settings).unwrap();
        assert!(session.login("admin", "admin").await.is_err());
        assert!(!session.is_authenticated());
        assert_eq!(session.username(), None);
    }
}
