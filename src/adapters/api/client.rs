//! Backend HTTP Client - JSON REST Transport
//!
//! Wraps reqwest with a request timeout and typed decoding for the
//! spot backend. Every response body is decoded into the caller's
//! schema; a mismatch is a `Decode` error, a non-2xx status is an
//! `Application` error carrying the body. No retries.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ExchangeError, ExchangeResult};

/// Configuration for the backend HTTP client.
#[derive(Debug, Clone)]
pub struct BackendClientConfig {
  /// Base URL without trailing slash.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
}

impl Default for BackendClientConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:3000".to_string(),
      timeout: Duration::from_secs(30),
    }
  }
}

/// HTTP client for the spot backend.
pub struct BackendClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: BackendClientConfig,
}

impl BackendClient {
  /// Create a new backend client.
  pub fn new(config: BackendClientConfig) -> Result<Self> {
    let http = Client::builder()
      .timeout(config.timeout)
      .pool_max_idle_per_host(2)
      .build()
      .context("Failed to build HTTP client")?;

    Ok(Self { http, config })
  }

  pub fn base_url(&self) -> &str {
    &self.config.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url, path)
  }

  /// GET `path` with query parameters, decoding the body as `T`.
  pub async fn get<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, &str)],
  ) -> ExchangeResult<T> {
    let request = self.http.get(self.url(path)).query(query);
    self.execute(request, "GET", path).await
  }

  /// POST `body` as JSON to `path`, decoding the response as `T`.
  pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(
    &self,
    path: &str,
    body: Option<&B>,
  ) -> ExchangeResult<T> {
    let mut request = self.http.post(self.url(path));
    if let Some(body) = body {
      request = request.json(body);
    }
    self.execute(request, "POST", path).await
  }

  async fn execute<T: DeserializeOwned>(
    &self,
    request: RequestBuilder,
    method: &str,
    path: &str,
  ) -> ExchangeResult<T> {
    let response = request.send().await.map_err(|e| {
      warn!(method, path, error = %e, "Backend request failed");
      ExchangeError::from(e)
    })?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
      warn!(method, path, status = %status, "Backend returned error status");
      return Err(ExchangeError::Application(format!(
        "{method} {path} returned {status}: {text}"
      )));
    }

    debug!(method, path, status = %status, bytes = text.len(), "Backend response");
    decode_body(path, &text)
  }
}

/// Decode a response body, tagging failures with the endpoint.
pub fn decode_body<T: DeserializeOwned>(path: &str, text: &str) -> ExchangeResult<T> {
  serde_json::from_str(text).map_err(|e| ExchangeError::decode(path, e))
}
