//! Retrying REST client for the shopping-list API.
//!
//! Every call goes through [`ApiClient::execute`], which bounds each attempt
//! by the request timeout, attaches credentials and default headers, and on
//! a 401 refreshes the session once before replaying the request. Typed
//! endpoint methods decode the result with [`decode`] or [`decode_empty`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

use crate::access::auth::AuthService;
use crate::access::context::SessionContext;
use crate::access::retry::{RetryPhase, UnauthorizedStep};
use crate::access::transport::{
    HttpMethod, HttpRequest, HttpResponse, Transport, CONTENT_TYPE, JSON_CONTENT_TYPE,
};
use crate::domain::error::{status_fallback_message, Result, ShoplistError, GENERIC_MESSAGE};
use crate::domain::{
    ArticleSearchResponse, CreateItemRequest, CreateListRequest, Item, List, ListWithItems,
    UpdateItemRequest,
};
use crate::observability::propagation;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A request as issued by callers, before defaults and credentials are
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the API base (`/lists`) or an absolute URL.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, target)
    }

    pub fn patch(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, target)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serializes `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ShoplistError::Decode`] if `body` cannot be represented as
    /// JSON.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| ShoplistError::Decode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Overlays caller headers on defaults. A caller header replaces a default
/// with the same name, compared case-insensitively.
///
/// # Examples
///
/// ```
/// use shoplist::access::merge_headers;
///
/// let merged = merge_headers(
///     vec![("Content-Type".into(), "application/json".into())],
///     &[("content-type".into(), "text/plain".into()), ("X-Id".into(), "7".into())],
/// );
/// assert_eq!(merged, vec![
///     ("content-type".to_string(), "text/plain".to_string()),
///     ("X-Id".to_string(), "7".to_string()),
/// ]);
/// ```
#[must_use]
pub fn merge_headers(
    defaults: Vec<(String, String)>,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged = defaults;
    for (name, value) in overrides {
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Maps a failure response to an error carrying a displayable message.
fn failure(response: &HttpResponse) -> ShoplistError {
    let message = match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(ErrorBody {
            error: Some(message),
        }) if !message.is_empty() => message,
        Ok(_) => GENERIC_MESSAGE.to_string(),
        Err(_) => status_fallback_message(response.status).to_string(),
    };
    ShoplistError::Http {
        status: response.status,
        message,
    }
}

/// Decodes a response carrying a JSON body.
///
/// # Errors
///
/// - [`ShoplistError::Http`] for a non-2xx status, with the server's
///   `error` message or a status-based fallback
/// - [`ShoplistError::Decode`] if a 2xx body does not match `T`
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    if !response.is_success() {
        return Err(failure(response));
    }
    serde_json::from_slice(&response.body).map_err(|e| ShoplistError::Decode(e.to_string()))
}

/// Checks a response whose body is ignored (deletions).
///
/// # Errors
///
/// Returns [`ShoplistError::Http`] for a non-2xx status.
pub fn decode_empty(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(failure(response))
    }
}

/// Client for the shopping-list REST API.
///
/// Cheap to clone; clones share the transport, auth service and session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    auth: Arc<AuthService>,
    session: SessionContext,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        auth: Arc<AuthService>,
        session: SessionContext,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            auth,
            session,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    fn resolve(&self, request: &ApiRequest) -> HttpRequest {
        let url = if request.target.starts_with("http://") || request.target.starts_with("https://")
        {
            request.target.clone()
        } else {
            format!("{}{}", self.base_url, request.target)
        };

        let mut defaults = vec![(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())];
        if let Some(traceparent) = propagation::current_traceparent() {
            defaults.push((propagation::TRACEPARENT_HEADER.to_string(), traceparent));
        }

        HttpRequest {
            method: request.method,
            url,
            headers: merge_headers(defaults, &request.headers),
            body: request.body.clone(),
            with_credentials: true,
        }
    }

    async fn attempt(&self, request: &HttpRequest) -> Result<HttpResponse> {
        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(result) => result.map_err(ShoplistError::from),
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis(), "request timed out");
                Err(ShoplistError::Timeout)
            }
        }
    }

    /// Issues `request`, refreshing the session and replaying once on 401.
    ///
    /// Returns the raw response for any status other than 401; decoding is
    /// left to the caller.
    ///
    /// # Errors
    ///
    /// - [`ShoplistError::Timeout`] if an attempt exceeds the request timeout
    /// - [`ShoplistError::Network`] if the transport fails
    /// - [`ShoplistError::Unauthenticated`] if the session cannot be
    ///   recovered; the session is cleared and the user redirected to login
    pub async fn execute(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let span = tracing::debug_span!(
            "api_request",
            method = %request.method,
            target = %request.target
        );
        self.execute_phases(request).instrument(span).await
    }

    async fn execute_phases(&self, request: &ApiRequest) -> Result<HttpResponse> {
        let mut phase = RetryPhase::Initial;
        loop {
            let resolved = self.resolve(request);
            let response = self.attempt(&resolved).await?;
            tracing::debug!(status = response.status, retry = phase.is_retry(), "attempt finished");

            if !response.is_unauthorized() {
                return Ok(response);
            }

            match phase.on_unauthorized() {
                UnauthorizedStep::RefreshThenRetry => {
                    let refreshed = self.auth.refresh().await;
                    if let Some(next) = phase.after_refresh(refreshed) {
                        tracing::debug!("session refreshed, replaying request");
                        phase = next;
                        continue;
                    }
                    tracing::info!("session refresh failed");
                }
                UnauthorizedStep::Terminal => {
                    tracing::info!("request still unauthorized after refresh");
                }
            }

            self.session.clear();
            self.auth.redirect_to_login();
            return Err(ShoplistError::Unauthenticated);
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(&request).await?;
        decode(&response)
    }

    async fn fetch_empty(&self, request: ApiRequest) -> Result<()> {
        let response = self.execute(&request).await?;
        decode_empty(&response)
    }

    fn url_with_query(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let base = format!("{}{path}", self.base_url);
        reqwest::Url::parse_with_params(&base, params)
            .map(String::from)
            .map_err(|e| ShoplistError::Config(format!("invalid API URL {base}: {e}")))
    }

    pub async fn get_lists(&self) -> Result<Vec<List>> {
        self.fetch(ApiRequest::get("/lists")).await
    }

    pub async fn create_list(&self, body: &CreateListRequest) -> Result<List> {
        self.fetch(ApiRequest::post("/lists").with_json(body)?).await
    }

    pub async fn get_list(&self, list_id: &str) -> Result<ListWithItems> {
        self.fetch(ApiRequest::get(format!("/lists/{list_id}"))).await
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<()> {
        self.fetch_empty(ApiRequest::delete(format!("/lists/{list_id}")))
            .await
    }

    /// One page of a list's items.
    pub async fn get_items(&self, list_id: &str, limit: u32, skip: u32) -> Result<Vec<Item>> {
        let url = self.url_with_query(
            &format!("/lists/{list_id}/items"),
            &[("limit", limit.to_string()), ("skip", skip.to_string())],
        )?;
        self.fetch(ApiRequest::get(url)).await
    }

    pub async fn create_item(&self, list_id: &str, body: &CreateItemRequest) -> Result<Item> {
        self.fetch(ApiRequest::post(format!("/lists/{list_id}/items")).with_json(body)?)
            .await
    }

    pub async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        body: &UpdateItemRequest,
    ) -> Result<Item> {
        self.fetch(
            ApiRequest::patch(format!("/lists/{list_id}/items/{item_id}")).with_json(body)?,
        )
        .await
    }

    pub async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()> {
        self.fetch_empty(ApiRequest::delete(format!(
            "/lists/{list_id}/items/{item_id}"
        )))
        .await
    }

    /// Marks every unpurchased item purchased or, when none is left, marks
    /// every item unpurchased. Items are updated one at a time, in order.
    ///
    /// Returns the updated items.
    ///
    /// # Errors
    ///
    /// Stops at the first failed update; earlier updates are not rolled back.
    pub async fn toggle_all_purchased(&self, list_id: &str, items: &[Item]) -> Result<Vec<Item>> {
        let target = items.iter().any(|item| !item.purchased);
        let body = UpdateItemRequest::purchased(target);
        tracing::debug!(list_id, purchased = target, "toggling all items");

        let mut updated = Vec::new();
        for item in items.iter().filter(|item| item.purchased != target) {
            updated.push(self.update_item(list_id, &item.id, &body).await?);
        }
        Ok(updated)
    }

    /// Deletes every item of a list, one at a time. Returns how many were
    /// deleted.
    ///
    /// # Errors
    ///
    /// Stops at the first failed deletion.
    pub async fn clear_items(&self, list_id: &str, items: &[Item]) -> Result<usize> {
        for item in items {
            self.delete_item(list_id, &item.id).await?;
        }
        Ok(items.len())
    }

    /// Searches the article index; `query` is URL-encoded.
    pub async fn search_articles(&self, query: &str, limit: u32) -> Result<ArticleSearchResponse> {
        let url = self.url_with_query(
            "/articles/search",
            &[("q", query.to_string()), ("limit", limit.to_string())],
        )?;
        self.fetch(ApiRequest::get(url)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
