use std::time::Duration;

use async_trait::async_trait;

use crate::{messaging::types::Update, Result};

/// Inbound side of the platform client: one long-poll request per call.
///
/// Implementations must not retry; an `ok=false` platform response maps to
/// [`crate::Error::Api`] carrying the platform's description.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    async fn fetch_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>>;
}

/// A single GET against a secondary API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Transport for secondary APIs: issue the request, buffer the body, parse JSON.
///
/// Socket/TLS failures surface as [`crate::Error::Transport`], unparseable bodies
/// as [`crate::Error::Protocol`]. No retry at this layer.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn get_json(&self, req: &HttpRequest) -> Result<serde_json::Value>;
}
