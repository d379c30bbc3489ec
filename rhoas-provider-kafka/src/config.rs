//! Provider configuration
//!
//! Values come from the `provider` block of the configuration file, with
//! environment variables taking precedence for endpoints and credentials.

use std::time::Duration;

use serde::Deserialize;

use crate::auth::{DEFAULT_AUTH_URL, DEFAULT_CLIENT_ID};

pub const DEFAULT_API_URL: &str = "https://api.openshift.com";

/// Offline token used to obtain access tokens
pub const OFFLINE_TOKEN_ENV: &str = "OFFLINE_TOKEN";
pub const API_URL_ENV: &str = "RHOAS_API_URL";
pub const AUTH_URL_ENV: &str = "RHOAS_AUTH_URL";

/// Interval between status checks, and before the first one
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of the Kafka management API
    pub api_url: String,
    /// SSO realm URL used for the token exchange
    pub auth_url: String,
    pub client_id: String,
    pub offline_token: Option<String>,
    /// Pre-issued bearer token; skips the token exchange when set
    pub access_token: Option<String>,
    pub create_timeout_secs: u64,
    pub delete_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            offline_token: None,
            access_token: None,
            create_timeout_secs: 20 * 60,
            delete_timeout_secs: 20 * 60,
            request_timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    /// Override endpoints and credentials from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Override endpoints and credentials from `lookup`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV) {
            self.api_url = url;
        }
        if let Some(url) = lookup(AUTH_URL_ENV) {
            self.auth_url = url;
        }
        if let Some(token) = lookup(OFFLINE_TOKEN_ENV) {
            self.offline_token = Some(token);
        }
        self
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            create: Duration::from_secs(self.create_timeout_secs),
            delete: Duration::from_secs(self.delete_timeout_secs),
            delay: POLL_INTERVAL,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Wait budgets for the asynchronous create and delete operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub create: Duration,
    pub delete: Duration,
    /// Wait before the first status check
    pub delay: Duration,
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        ProviderConfig::default().timeouts()
    }
}
