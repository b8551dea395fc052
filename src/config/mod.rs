//! Configuration module for the Ragcy client.
//!
//! Holds the API key, base URL and transport settings. A configuration is
//! built once and shared read-only by every service.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

use crate::errors::{RagcyError, RagcyResult};

/// Default base URL for the Ragcy API.
pub const DEFAULT_BASE_URL: &str = "https://api.ragcy.com";

/// Configuration for the Ragcy client.
#[derive(Clone)]
pub struct RagcyConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Transport timeout. `None` leaves timing to the HTTP stack.
    pub timeout: Option<Duration>,
    /// Custom headers to include in requests.
    pub custom_headers: Vec<(String, String)>,
}

impl RagcyConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RagcyConfigBuilder {
        RagcyConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RAGCY_API_KEY` (required): API key for authentication
    /// - `RAGCY_BASE_URL` (optional): Custom base URL
    /// - `RAGCY_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> RagcyResult<Self> {
        let api_key = std::env::var("RAGCY_API_KEY").map_err(|_| RagcyError::Configuration {
            message: "RAGCY_API_KEY environment variable not set".to_string(),
        })?;

        let mut builder = RagcyConfigBuilder::new().api_key(api_key);

        if let Ok(base_url) = std::env::var("RAGCY_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("RAGCY_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout_secs(timeout_secs);
            }
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        crate::auth::key_hint(&self.api_key)
    }
}

impl std::fmt::Debug for RagcyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagcyConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for `RagcyConfig`.
#[derive(Default)]
pub struct RagcyConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl RagcyConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API key from an environment variable.
    pub fn api_key_from_env(mut self, var_name: &str) -> RagcyResult<Self> {
        let api_key = std::env::var(var_name).map_err(|_| RagcyError::Configuration {
            message: format!("Environment variable {} not set", var_name),
        })?;
        self.api_key = Some(api_key);
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> RagcyResult<RagcyConfig> {
        let api_key = self.api_key.ok_or_else(|| RagcyError::Configuration {
            message: "API key is required".to_string(),
        })?;

        if api_key.is_empty() {
            return Err(RagcyError::Configuration {
                message: "API key cannot be empty".to_string(),
            });
        }

        if let Some((name, _)) = self
            .custom_headers
            .iter()
            .find(|(name, _)| crate::client::is_reserved_header(name))
        {
            return Err(RagcyError::Configuration {
                message: format!("Header {} is set by the client and cannot be overridden", name),
            });
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&base_url)?;
        match parsed.scheme() {
            "https" => {}
            "http" => tracing::warn!(%base_url, "Base URL does not use HTTPS"),
            other => {
                return Err(RagcyError::Configuration {
                    message: format!("Unsupported base URL scheme: {}", other),
                })
            }
        }

        Ok(RagcyConfig {
            api_key: SecretString::new(api_key),
            base_url,
            timeout: self.timeout,
            custom_headers: self.custom_headers,
        })
    }
}
