//! reqwest-backed policy source client.

use async_trait::async_trait;
use discovery_core::{DiscoveryError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::document::{FetchPolicy, PolicyDocument};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for pulling policy documents from remote sources
#[derive(Clone)]
pub struct PolicyClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
}

impl PolicyClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        PolicyClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> PolicyClientBuilder {
        PolicyClientBuilder::new()
    }

    /// Perform a GET request and return the body with its content type
    pub async fn get(&self, url: &Url) -> Result<PolicyDocument> {
        debug!(url = %url, "GET policy document");

        let response = self
            .inner
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DiscoveryError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = response
            .text()
            .await
            .map_err(|e| DiscoveryError::Http(e.to_string()))?;

        Ok(PolicyDocument { body, content_type })
    }
}

#[async_trait]
impl FetchPolicy for PolicyClient {
    async fn fetch(&self, url: &Url) -> Result<PolicyDocument> {
        self.get(url).await
    }
}

/// Builder for configuring a [`PolicyClient`]
pub struct PolicyClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for PolicyClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("discovery/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PolicyClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| DiscoveryError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(PolicyClient {
            inner: Arc::new(ClientInner { http }),
        })
    }
}
