//! Client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectError, ConnectResult};

/// Default Kafka Connect REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8083";

/// Configuration for a [`ConnectClient`](crate::ConnectClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Base URL of the REST API (default: http://localhost:8083)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Colon-delimited `username:password` for basic auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,

    /// Verify the server certificate
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,

    /// Request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Number of connectors a bulk operation works on at once
    #[serde(default = "default_bulk_concurrency")]
    pub bulk_concurrency: usize,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

const fn default_ssl_verify() -> bool {
    true
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_bulk_concurrency() -> usize {
    1
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            auth: None,
            ssl_verify: default_ssl_verify(),
            timeout: default_timeout(),
            bulk_concurrency: default_bulk_concurrency(),
        }
    }
}

impl ConnectConfig {
    /// Parse the configured auth string, if any.
    pub fn basic_auth(&self) -> ConnectResult<Option<BasicAuth>> {
        self.auth.as_deref().map(BasicAuth::parse).transpose()
    }
}

/// Basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Create credentials from parts.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse a `username:password` string.
    ///
    /// Splits on the first colon so passwords may contain colons. Both halves
    /// are trimmed.
    pub fn parse(raw: &str) -> ConnectResult<Self> {
        let (username, password) = raw.split_once(':').ok_or(ConnectError::InvalidAuth)?;
        Ok(Self::new(username.trim(), password.trim()))
    }

    /// Username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
