//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::RequestGateway;
use crate::cache::DEFAULT_CACHE_TTL;
use crate::credentials::{CredentialStore, NoCredentials, StaticToken};
use crate::transport::{HttpTransport, Transport};
use crate::{MuninError, Result};

/// Default service address every request path is appended to.
pub const DEFAULT_BASE_URL: &str = "https://m1.apifoxmock.com/m1/4728220-0-default/api";

/// Default per-request transport timeout: ten seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the credential token.
pub const DEFAULT_TOKEN_HEADER: &str = "token";

/// Main entry point for creating gateway instances.
pub struct Munin;

impl Munin {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> MuninBuilder {
        MuninBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// ```rust
/// # use munin::Munin;
/// # use std::time::Duration;
/// let gateway = Munin::builder()
///     .base_url("https://api.example.com/v1")
///     .token("secret")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(gateway.base_url(), "https://api.example.com/v1");
/// ```
pub struct MuninBuilder {
    base_url: String,
    timeout: Duration,
    cache_ttl: Duration,
    token_header: String,
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<Arc<dyn CredentialStore>>,
}

impl MuninBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            transport: None,
            credentials: None,
        }
    }

    /// Service address; a trailing `/` is dropped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Timeout applied to every network call (default: 10s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How long a cached response stays servable (default: 5 minutes).
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Name of the header carrying the credential token (default: `token`).
    pub fn token_header(mut self, name: impl Into<String>) -> Self {
        self.token_header = name.into();
        self
    }

    /// Use a custom transport instead of the default [`HttpTransport`].
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Source of the credential token, read on every dispatch.
    ///
    /// Pass an `Arc<MemoryCredentialStore>` to keep a handle for login and
    /// logout.
    pub fn credentials(mut self, credentials: impl CredentialStore + 'static) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    /// Shorthand for a fixed token.
    pub fn token(self, token: impl Into<String>) -> Self {
        self.credentials(StaticToken(token.into()))
    }

    /// Build the gateway.
    pub fn build(self) -> Result<RequestGateway> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(MuninError::Configuration("base URL must not be empty".into()));
        }
        reqwest::Url::parse(&base_url).map_err(|e| {
            MuninError::Configuration(format!("invalid base URL {base_url:?}: {e}"))
        })?;
        if self.timeout.is_zero() {
            return Err(MuninError::Configuration("timeout must be non-zero".into()));
        }
        if self.token_header.is_empty() {
            return Err(MuninError::Configuration(
                "token header name must not be empty".into(),
            ));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(NoCredentials));

        Ok(RequestGateway::new(
            base_url,
            self.timeout,
            self.cache_ttl,
            self.token_header,
            transport,
            credentials,
        ))
    }
}

impl Default for MuninBuilder {
    fn default() -> Self {
        Self::new()
    }
}
