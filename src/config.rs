//! Layered application settings.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! then `CENTRE_*` environment variables. Command-line flags are applied on
//! top by the binary.
//!
//! ```toml
//! gateway_url = "http://localhost:8080"
//! payment_url = "http://localhost:8084"
//! intent_url = "http://localhost:3001"
//! username = "admin"
//! password = "admin"
//! page_size = 10
//! refresh_secs = 30
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::api::{DEFAULT_GATEWAY_URL, DEFAULT_INTENT_URL, DEFAULT_PAYMENT_URL};
use crate::table::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub gateway_url: String,
    pub payment_url: String,
    pub intent_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub page_size: usize,
    pub refresh_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            payment_url: DEFAULT_PAYMENT_URL.to_string(),
            intent_url: DEFAULT_INTENT_URL.to_string(),
            username: None,
            password: None,
            page_size: DEFAULT_PAGE_SIZE,
            refresh_secs: 30,
            timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("gateway_url", defaults.gateway_url)?
            .set_default("payment_url", defaults.payment_url)?
            .set_default("intent_url", defaults.intent_url)?
            .set_default("page_size", defaults.page_size as u64)?
            .set_default("refresh_secs", defaults.refresh_secs)?
            .set_default("timeout_secs", defaults.timeout_secs)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("CENTRE"))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    /// Both username and password, when configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}
