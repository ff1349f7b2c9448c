//! HTTP transport abstraction and connection settings.
//!
//! Clients hand fully built [`reqwest::Request`] values to an [`HttpTransport`]
//! and decode whatever comes back. Requests are sent exactly once; there is no
//! retry layer.

use crate::config::StreamClientConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Request, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for image and file requests (larger for uploads)
pub const IMAGES_DEFAULT_TIMEOUT: u64 = 60;

/// Default connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent by every client.
pub const USER_AGENT: &str = concat!("stream-rust-client-", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration.
///
/// Configures timeouts, connection pooling and TLS behaviour of the default
/// [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,

    /// Verify TLS certificates
    pub tls_verify: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(IMAGES_DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
            tls_verify: true,
        }
    }

    /// Derive the HTTP settings from a [`StreamClientConfig`].
    #[must_use]
    pub fn from_stream_config(config: &StreamClientConfig) -> Self {
        Self::new()
            .with_timeout(config.timeout())
            .with_connect_timeout(config.connect_timeout())
            .with_tls_verify(config.tls_verify)
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Build a [`reqwest::Client`] honouring this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the TLS backend cannot be initialised.
    pub fn build_http_client(&self) -> Result<Client> {
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .gzip(self.enable_compression);

        if !self.tls_verify {
            warn!("TLS verification disabled for Stream client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes fully built requests.
///
/// Implementations must be shareable across tasks; a single transport serves
/// any number of concurrent calls.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request once and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if no response could be obtained. Non-2xx
    /// responses are not errors at this level.
    async fn execute(&self, request: Request) -> Result<Response>;
}

/// Default [`HttpTransport`] backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    log_requests: bool,
}

impl ReqwestTransport {
    /// Build a transport from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: config.build_http_client()?,
            log_requests: config.enable_logging,
        })
    }

    /// Access the wrapped client, e.g. to build requests against it.
    #[must_use]
    pub const fn http(&self) -> &Client {
        &self.http
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await.map_err(Error::from)?;

        if self.log_requests {
            debug!(%method, %path, status = response.status().as_u16(), "Stream response received");
        }

        Ok(response)
    }
}
