//! Configuration structures for Stream clients.
//!
//! This module provides the configuration used to locate the Stream API
//! (region, host or an explicit base URL) and to tune the HTTP connection.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default API host; regions are prepended as a subdomain.
pub const DEFAULT_HOST: &str = "stream-io-api.com";

/// Default URL scheme.
pub const DEFAULT_SCHEME: &str = "https";

/// Stream API region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Region {
    /// US East (default)
    #[default]
    UsEast,
    /// Dublin, Ireland
    Dublin,
    /// Singapore
    Singapore,
    /// Tokyo, Japan
    Tokyo,
    /// Canada central
    Canada,
    /// Any other subdomain, used verbatim
    Custom(String),
}

impl Region {
    /// Returns the subdomain for the region.
    #[must_use]
    pub fn subdomain(&self) -> &str {
        match self {
            Self::UsEast => "us-east-api",
            Self::Dublin => "dublin-api",
            Self::Singapore => "singapore-api",
            Self::Tokyo => "tokyo-api",
            Self::Canada => "ca-central-1-api",
            Self::Custom(subdomain) => subdomain,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subdomain())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let region = match s.trim().to_lowercase().as_str() {
            "" => return Err(Error::ConfigError("Empty region".to_string())),
            "us-east" | "us-east-api" => Self::UsEast,
            "dublin" | "dublin-api" => Self::Dublin,
            "singapore" | "singapore-api" => Self::Singapore,
            "tokyo" | "tokyo-api" => Self::Tokyo,
            "ca-central-1" | "ca-central-1-api" | "canada" => Self::Canada,
            other => Self::Custom(other.to_string()),
        };
        Ok(region)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.subdomain().to_string()
    }
}

impl TryFrom<String> for Region {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Configuration for a Stream client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StreamClientConfig {
    /// Public API key, sent as the `api_key` query parameter
    #[validate(length(min = 1))]
    pub api_key: String,

    /// Explicit base URL; takes precedence over region and host
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API region
    #[serde(default)]
    pub region: Region,

    /// API host
    #[validate(length(min = 1))]
    #[serde(default = "default_host")]
    pub host: String,

    /// URL scheme
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Optional port override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    crate::client::IMAGES_DEFAULT_TIMEOUT
}

const fn default_connect_timeout_secs() -> u64 {
    crate::client::DEFAULT_CONNECT_TIMEOUT
}

const fn default_tls_verify() -> bool {
    true
}

impl StreamClientConfig {
    /// Create a new client configuration for the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_key: api_key.into(),
            base_url: None,
            region: Region::default(),
            host: default_host(),
            scheme: default_scheme(),
            port: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            tls_verify: default_tls_verify(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Use an explicit base URL instead of region and host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the API region.
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Set the API host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the URL scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = seconds;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the connect timeout as a Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Resolve the API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured pieces do not form a valid URL.
    pub fn base_url(&self) -> Result<Url, Error> {
        let raw = match &self.base_url {
            Some(url) => url.clone(),
            None => match self.port {
                Some(port) => format!("{}://{}.{}:{port}/", self.scheme, self.region, self.host),
                None => format!("{}://{}.{}/", self.scheme, self.region, self.host),
            },
        };

        Url::parse(&raw).map_err(|e| Error::ConfigError(format!("Invalid base URL `{raw}`: {e}")))
    }
}
