//! Fetched policy documents and the fetch seam.

use async_trait::async_trait;
use discovery_core::Result;
use url::Url;

/// Media type of legacy `key: value` policy payloads
pub const MEDIA_TYPE_TEXT: &str = "text/plain";

/// Media type of JSON policy payloads
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// Body and content type of one successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    /// Response body as text
    pub body: String,

    /// `Content-Type` header, if the source sent one
    pub content_type: Option<String>,
}

impl PolicyDocument {
    /// Create a document with the given content type
    #[must_use]
    pub fn new(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            content_type: Some(content_type.into()),
        }
    }

    /// The lowercase media type without parameters (`text/plain; charset=utf-8`
    /// becomes `text/plain`)
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// Anything able to retrieve a policy document from a URL
#[async_trait]
pub trait FetchPolicy: Send + Sync {
    /// Fetch the document at `url`
    async fn fetch(&self, url: &Url) -> Result<PolicyDocument>;
}
