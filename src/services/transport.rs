// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP transport used by the API client and the credential store.

use std::time::Duration;

/// Raw HTTP response: status code and body bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, lossily decoded (for error messages).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network-level failure (connect, timeout, body read).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Minimal async transport. Must be callable concurrently from many workers.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with a bearer token.
    async fn get(&self, url: &str, bearer: &str) -> Result<HttpResponse, TransportError>;

    /// POST a form-encoded body to `url`.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport with a per-request timeout.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sls/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("Couldn't read response body: {}", e)))?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, bearer: &str) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Self::read(response).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, "POST");
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        Self::read(response).await
    }
}
