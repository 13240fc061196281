//! Transport seam between the access layer and the network.
//!
//! The access layer builds [`HttpRequest`]s and interprets [`HttpResponse`]s;
//! a [`Transport`] only moves bytes. Keeping the seam this narrow lets the
//! retry and decoding logic be exercised against an in-memory backend.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::domain::error::{Result, ShoplistError};
use crate::storage::CredentialStore;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// One outbound HTTP call, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,

    /// Attach stored session cookies.
    pub with_credentials: bool,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            with_credentials: true,
        }
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as seen by the access layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub set_cookies: Vec<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            set_cookies: Vec::new(),
        }
    }

    /// Response with a serialized JSON body.
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Failure below HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network failure: {0}")]
    Network(String),
}

impl From<TransportError> for ShoplistError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => Self::Timeout,
            TransportError::Network(detail) => Self::Network(detail),
        }
    }
}

/// Sends requests to the backend.
///
/// Implementations attach credentials when `with_credentials` is set and
/// record any cookies the server returns.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request. Non-2xx statuses are responses, not errors.
    async fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;

    /// Drops locally held credentials. No-op for transports without any.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be written.
    fn clear_credentials(&self) -> Result<()> {
        Ok(())
    }
}

/// [`Transport`] backed by `reqwest`, with cookies kept in a [`CredentialStore`].
///
/// Cookies are only sent to, and accepted from, the trusted hosts. With no
/// trusted hosts configured, every host is trusted.
pub struct ReqwestTransport {
    client: reqwest::Client,
    credentials: Arc<Mutex<Box<dyn CredentialStore>>>,
    trusted_hosts: Vec<String>,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialization).
    pub fn new(credentials: Box<dyn CredentialStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shoplist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShoplistError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            credentials: Arc::new(Mutex::new(credentials)),
            trusted_hosts: Vec::new(),
        })
    }

    /// Limits credentials to the hosts of `base_urls`. Unparsable URLs are
    /// skipped.
    #[must_use]
    pub fn trusting<'a>(mut self, base_urls: impl IntoIterator<Item = &'a str>) -> Self {
        self.trusted_hosts = base_urls.into_iter().filter_map(host_of).collect();
        self.trusted_hosts.sort();
        self.trusted_hosts.dedup();
        self
    }

    /// Whether a request to `url` may carry and receive cookies.
    #[must_use]
    pub fn shares_credentials_with(&self, url: &str) -> bool {
        if self.trusted_hosts.is_empty() {
            return true;
        }
        host_of(url).is_some_and(|host| self.trusted_hosts.contains(&host))
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut dyn CredentialStore) -> Result<T>) -> Result<T> {
        let mut guard = self
            .credentials
            .lock()
            .map_err(|e| ShoplistError::Storage(format!("credential store poisoned: {e}")))?;
        f(guard.as_mut())
    }
}

fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("trusted_hosts", &self.trusted_hosts)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let credentialed = request.with_credentials && self.shares_credentials_with(&request.url);
        if request.with_credentials && !credentialed {
            tracing::debug!(url = %request.url, "untrusted host, sending without cookies");
        }

        if credentialed {
            match self.with_store(|store| store.cookie_header()) {
                Ok(Some(cookie)) => builder = builder.header(reqwest::header::COOKIE, cookie),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "could not read credentials, sending without"),
            }
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect();

        if credentialed && !set_cookies.is_empty() {
            if let Err(e) = self.with_store(|store| store.absorb_set_cookies(&set_cookies)) {
                tracing::warn!(error = %e, "failed to store cookies from response");
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?
            .to_vec();

        tracing::trace!(status, body_len = body.len(), "response received");

        Ok(HttpResponse {
            status,
            body,
            set_cookies,
        })
    }

    fn clear_credentials(&self) -> Result<()> {
        self.with_store(|store| store.clear())
    }
}
