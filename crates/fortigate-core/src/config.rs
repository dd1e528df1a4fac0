//! Device connection configuration.
//!
//! This module provides the configuration used to open a session against a
//! FortiGate device: address, credentials, VDOM, TLS and timeout settings.

use crate::client::{ClientConfig, FORTIGATE_DEFAULT_TIMEOUT};
use crate::types::{Scheme, DEFAULT_VDOM};
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Credentials used to authenticate against the device.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Interactive session login (`/logincheck`)
    Password {
        /// Administrator user name
        username: String,
        /// Administrator password
        password: SecretString,
    },
    /// REST API administrator token (`Authorization: Bearer`)
    ApiToken(SecretString),
}

impl Credentials {
    /// Create password credentials.
    #[must_use]
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Create API token credentials.
    #[must_use]
    pub fn api_token(token: impl Into<String>) -> Self {
        Self::ApiToken(SecretString::from(token.into()))
    }

    /// Returns the user name for password credentials.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Password { username, .. } => Some(username),
            Self::ApiToken(_) => None,
        }
    }

    fn check(&self) -> Result<(), Error> {
        match self {
            Self::Password { username, password } => {
                if username.trim().is_empty() {
                    return Err(Error::Config("username must not be empty".into()));
                }
                if password.expose_secret().is_empty() {
                    return Err(Error::Config("password must not be empty".into()));
                }
            }
            Self::ApiToken(token) => {
                if token.expose_secret().trim().is_empty() {
                    return Err(Error::Config("API token must not be empty".into()));
                }
            }
        }
        Ok(())
    }
}

/// Configuration for a FortiGate connection.
#[derive(Debug, Clone, Validate)]
pub struct FortiGateConfig {
    /// Device host name or IP address (no scheme, no port)
    #[validate(length(min = 1))]
    pub host: String,

    /// Transport scheme
    pub scheme: Scheme,

    /// Explicit port; the scheme's default port is used when absent
    #[validate(range(min = 1))]
    pub port: Option<u16>,

    /// Virtual domain every request is scoped to
    #[validate(length(min = 1, max = 31))]
    pub vdom: String,

    /// Whether to verify the device's TLS certificate
    pub verify_ssl: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    /// Authentication material
    pub credentials: Credentials,
}

impl FortiGateConfig {
    /// Create a new configuration with the required parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host or the credentials are empty.
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Result<Self, Error> {
        let config = Self {
            host: host.into().trim().to_string(),
            scheme: Scheme::default(),
            port: None,
            vdom: DEFAULT_VDOM.to_string(),
            verify_ssl: false,
            timeout_secs: FORTIGATE_DEFAULT_TIMEOUT,
            credentials,
        };

        config.validate_config()?;
        Ok(config)
    }

    /// Set the scheme.
    #[must_use]
    pub const fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set an explicit port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the VDOM.
    #[must_use]
    pub fn with_vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = vdom.into();
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Check every field, including the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate_config(&self) -> Result<(), Error> {
        if self.host.contains("://") || self.host.contains('/') {
            return Err(Error::Config(format!(
                "host '{}' must be a bare host name or address",
                self.host
            )));
        }
        self.validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))?;
        self.credentials.check()
    }

    /// Effective port: the configured one, or the scheme default.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the device base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot form a valid URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        // IPv6 literals need brackets in the authority.
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        Url::parse(&format!("{}://{host}:{}/", self.scheme, self.port()))
            .map_err(|e| Error::Config(format!("Invalid FortiGate address: {e}")))
    }

    /// HTTP client settings derived from this configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.timeout())
            .with_tls_verify(self.verify_ssl)
    }
}
