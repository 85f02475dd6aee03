//! HTTP transport for the secondary APIs (quote source, weather source).
//!
//! One GET per call, full body buffered, parsed as JSON. Retrying is the
//! caller's business.

use std::time::Duration;

use async_trait::async_trait;

use rwb_core::{
    errors::Error,
    ports::{HttpRequest, JsonTransport},
    Result,
};

#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn get_json(&self, req: &HttpRequest) -> Result<serde_json::Value> {
        let host = host_of(&req.url);

        let resp = self
            .http
            .get(&req.url)
            .query(&req.query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("request to {host} failed: {e}")))?;

        // Non-2xx bodies are still JSON for both providers; let the handler read them.
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(format!("reading body from {host} failed: {e}")))?;
        tracing::debug!(%host, %status, bytes = body.len(), "secondary api responded");

        parse_body(&body)
    }
}

fn parse_body(body: &str) -> Result<serde_json::Value> {
    serde_json::from_str(body).map_err(|e| {
        Error::Protocol(format!(
            "parse server response error: {e} (body: {})",
            body.chars().take(200).collect::<String>()
        ))
    })
}

fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, r)| r);
    rest.split(['/', '?']).next().unwrap_or(rest)
}
