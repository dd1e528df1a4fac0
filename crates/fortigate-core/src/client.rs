//! HTTP client settings.
//!
//! This module configures the `reqwest` client used to talk to the device:
//! timeouts, connection pooling, TLS verification and the session cookie
//! store. Requests are never retried; every tool call maps to at most one
//! HTTP request.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default timeout for FortiGate API requests (seconds)
pub const FORTIGATE_DEFAULT_TIMEOUT: u64 = 20;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 4;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Verify the device's TLS certificate
    pub verify_tls: bool,

    /// Keep cookies between requests (required for session login)
    pub cookie_store: bool,

    /// User agent sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(FORTIGATE_DEFAULT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            verify_tls: false,
            cookie_store: true,
            user_agent: concat!("fortigate-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a `reqwest::Client` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the TLS backend cannot be initialised.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .danger_accept_invalid_certs(!self.verify_tls)
            .cookie_store(self.cookie_store)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_new() {
        let config = ClientConfig::new();
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(
            config.pool_idle_timeout,
            Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT)
        );
        assert!(!config.verify_tls);
        assert!(config.cookie_store);
        assert!(config.user_agent.starts_with("fortigate-core/"));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_tls_verify(true)
            .with_user_agent("fortigate-mcp/test");

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.verify_tls);
        assert_eq!(config.user_agent, "fortigate-mcp/test");
    }

    #[test]
    fn test_build_http_client() {
        assert!(ClientConfig::default().build_http_client().is_ok());
    }
}
