//! HTTP client for the catalog API
//!
//! Every call goes through [`ApiClient`], which attaches the bearer token when
//! one is set and turns non-2xx responses into [`Error::Api`] carrying the
//! server's `detail` message.

use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::Error;

pub mod admin;
pub mod auth;
pub mod tools;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the credential used for subsequent requests
    pub fn set_token(&self, token: Option<String>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = token;
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let builder = self.http.request(method, url);

        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send the request and fail on transport errors and non-2xx statuses
    async fn send(&self, builder: RequestBuilder) -> Result<Response, Error> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::debug!("API error [{status}]: {body}");
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &body),
            });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let response = self.send(builder).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}

/// Pick the user-facing message out of an error body.
///
/// FastAPI-style bodies carry a `detail` field. Structured details (validation
/// errors) are passed through as JSON text. Anything else gets a generic
/// message with the status code.
pub fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(message)) if !message.is_empty() => message,
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
            format!("API Error: {status}")
        }
        Some(other) => other.to_string(),
    }
}

/// Percent-encode a single path segment
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
