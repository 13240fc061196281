//! Session checks against the auth service.
//!
//! [`AuthService`] talks to the auth endpoints directly through the
//! [`Transport`], never through the retrying [`ApiClient`](super::ApiClient),
//! so a refresh can never trigger another refresh.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::access::context::SessionContext;
use crate::access::navigator::Navigator;
use crate::access::transport::{
    HttpMethod, HttpRequest, HttpResponse, Transport, CONTENT_TYPE, JSON_CONTENT_TYPE,
};
use crate::domain::error::{Result, ShoplistError};
use crate::domain::{AuthMeResponse, RefreshResponse, Session, UserProfile};

const ME_PATH: &str = "/auth/me";
const REFRESH_PATH: &str = "/auth/refresh";
const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";

/// Client for the auth service's session endpoints.
pub struct AuthService {
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    base_url: String,
    timeout: Duration,
}

impl AuthService {
    pub fn new(
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            navigator,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        match tokio::time::timeout(self.timeout, self.transport.send(&request)).await {
            Ok(result) => result.map_err(ShoplistError::from),
            Err(_) => Err(ShoplistError::Timeout),
        }
    }

    /// Asks the auth service whether the stored credentials are valid.
    ///
    /// Fails closed: any transport failure, non-2xx status or unreadable
    /// body yields `authenticated: false`.
    pub async fn check_session(&self) -> AuthMeResponse {
        let span = tracing::debug_span!("check_session");
        async {
            let request = HttpRequest::new(HttpMethod::Get, self.url(ME_PATH));
            let response = match self.send(request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error = %e, "session check failed");
                    return AuthMeResponse::default();
                }
            };

            if !response.is_success() {
                tracing::debug!(status = response.status, "session check rejected");
                return AuthMeResponse::default();
            }

            serde_json::from_slice(&response.body).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "unreadable session check body");
                AuthMeResponse::default()
            })
        }
        .instrument(span)
        .await
    }

    /// Checks the session and records the outcome in `ctx`.
    pub async fn bootstrap(&self, ctx: &SessionContext) -> Session {
        let session = Session::from(self.check_session().await);
        ctx.apply(session.clone());
        tracing::info!(authenticated = session.is_authenticated(), "session bootstrapped");
        session
    }

    /// Returns the signed-in profile, or redirects to login.
    ///
    /// Gating only checks; it never attempts a refresh.
    ///
    /// # Errors
    ///
    /// Returns [`ShoplistError::Unauthenticated`] after redirecting when no
    /// valid session exists.
    pub async fn require_session(&self, ctx: &SessionContext) -> Result<UserProfile> {
        match self.bootstrap(ctx).await {
            Session::Authenticated(profile) => Ok(profile),
            Session::Anonymous => {
                self.redirect_to_login();
                Err(ShoplistError::Unauthenticated)
            }
        }
    }

    /// Asks the auth service to renew the session. Never fails: every
    /// problem is reported as `false`.
    pub async fn refresh(&self) -> bool {
        let span = tracing::debug_span!("refresh_session");
        async {
            let mut request = HttpRequest::new(HttpMethod::Post, self.url(REFRESH_PATH));
            request
                .headers
                .push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));

            let response = match self.send(request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error = %e, "session refresh failed");
                    return false;
                }
            };

            if !response.is_success() {
                tracing::debug!(status = response.status, "session refresh rejected");
                return false;
            }

            let refreshed = serde_json::from_slice::<RefreshResponse>(&response.body)
                .map(|body| body.success)
                .unwrap_or(false);
            tracing::debug!(refreshed, "session refresh completed");
            refreshed
        }
        .instrument(span)
        .await
    }

    /// Login address carrying the current location as `returnTo`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use shoplist::access::{AuthService, RecordingNavigator};
    /// # use shoplist::access::{HttpRequest, HttpResponse, Transport, TransportError};
    /// # struct Offline;
    /// # #[async_trait::async_trait]
    /// # impl Transport for Offline {
    /// #     async fn send(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
    /// #         Err(TransportError::Network("offline".into()))
    /// #     }
    /// # }
    ///
    /// let auth = AuthService::new(
    ///     Arc::new(Offline),
    ///     Arc::new(RecordingNavigator::new("https://app.example/lists/1")),
    ///     "https://auth.example",
    ///     Duration::from_secs(10),
    /// );
    /// assert_eq!(
    ///     auth.login_url(),
    ///     "https://auth.example/auth/login?returnTo=https%3A%2F%2Fapp.example%2Flists%2F1"
    /// );
    /// ```
    #[must_use]
    pub fn login_url(&self) -> String {
        let location = self.navigator.current_location();
        match reqwest::Url::parse_with_params(&self.url(LOGIN_PATH), [("returnTo", &location)]) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "invalid auth base URL, returnTo left unencoded");
                format!("{}?returnTo={location}", self.url(LOGIN_PATH))
            }
        }
    }

    /// Navigates to the login page.
    pub fn redirect_to_login(&self) {
        let url = self.login_url();
        tracing::info!(url = %url, "redirecting to login");
        self.navigator.navigate(&url);
    }

    /// Clears the session and navigates to the logout endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if locally stored credentials cannot be removed. The
    /// in-memory session is cleared and navigation happens regardless.
    pub fn logout(&self, ctx: &SessionContext) -> Result<()> {
        ctx.clear();
        let cleared = self.transport.clear_credentials();
        self.navigator.navigate(&self.url(LOGOUT_PATH));
        cleared
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
