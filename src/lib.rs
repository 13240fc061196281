//! Shoplist: a client for a shopping-list service.
//!
//! The crate provides:
//! - A session access layer that bounds every request by a timeout, sends
//!   cookie credentials, refreshes the session once on a 401 and sends the
//!   user to the login page when the session cannot be recovered
//! - A debounced article suggestion engine with zero-result suppression and
//!   keyboard and pointer selection
//! - Typed access to lists, items and the article index
//! - A command-line front end (`shoplist`)

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Command-line front end (main.rs)                   │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!            │                              │
//! ┌───────────────────────┐   ┌───────────────────────────┐
//! │ Suggestion engine     │   │ UI layer (ui/)            │
//! │ (app/)                │   │ - View models             │
//! │ - Events → actions    │   │ - Text rendering          │
//! │ - Debounce driver     │   │ - Match highlighting      │
//! └───────────────────────┘   └───────────────────────────┘
//!            │
//! ┌─────────────────────────────────────────────────────┐
//! │  Session access layer (access/)                     │
//! │  - Timeout, credentials, retry on 401               │
//! │  - Auth service, login redirect                     │
//! │  - Typed REST endpoints                             │
//! └─────────────────────────────────────────────────────┘
//!            │                              │
//! ┌───────────────────────┐   ┌───────────────────────────┐
//! │ Storage (storage/)    │   │ Domain (domain/)          │
//! │ - Session cookies     │   │ - Lists, items, articles  │
//! │                       │   │ - Errors, validation      │
//! └───────────────────────┘   └───────────────────────────┘
//!            │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing to stderr, optional OTLP file export     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`access`]: Session access layer and REST client
//! - [`app`]: Debounced suggestion engine
//! - [`domain`]: Core types, errors and validation
//! - [`infrastructure`]: Platform paths
//! - [`storage`]: Credential persistence
//! - [`ui`]: View models and rendering
//! - [`observability`]: Logging and tracing
//!
//! # Configuration
//!
//! Settings are read, lowest precedence first, from built-in defaults, a TOML
//! file (`~/.config/shoplist/config.toml` or `--config`) and `SHOPLIST_*`
//! environment variables:
//!
//! ```toml
//! environment = "prod"
//! auth_base_url = "https://auth.example.com"
//! request_timeout_ms = 10000
//! debounce_ms = 300
//! trace_level = "debug"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use shoplist::{initialize, Config};
//!
//! # async fn run() -> shoplist::Result<()> {
//! let client = initialize(&Config::load(None)?)?;
//! client.require_session().await?;
//! for list in client.api.get_lists().await? {
//!     println!("{}", list.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod ui;

pub use access::{ApiClient, AuthService, Navigator, SessionContext, Transport};
pub use app::{handle_event, Action, Event, SuggestionField, SuggestionSettings, SuggestionState};
pub use domain::{Result, ShoplistError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use access::{ReqwestTransport, TerminalNavigator};
use app::state::{DEFAULT_DEBOUNCE, DEFAULT_MIN_QUERY_LEN, DEFAULT_SEARCH_LIMIT};
use domain::UserProfile;
use storage::{CredentialStore, JsonCredentialStore};

pub const PROD_API_URL: &str = "https://shoplist-api.cyrilmarchive.com";
pub const PREPROD_API_URL: &str = "https://shoplist-api-preprod.cyrilmarchive.com";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TRACE_LEVEL: &str = "warn";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SHOPLIST_";

/// Configuration keys, as used in the TOML file. The environment variable
/// for a key is its upper-cased form with [`ENV_PREFIX`].
pub const CONFIG_KEYS: &[&str] = &[
    "environment",
    "api_base_url",
    "auth_base_url",
    "return_to",
    "request_timeout_ms",
    "debounce_ms",
    "min_query_len",
    "search_limit",
    "session_cookie",
    "credentials_file",
    "trace_level",
    "trace_file",
];

/// Deployment the client talks to; selects the default API address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Prod,
    #[default]
    Preprod,
}

impl Environment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Preprod => "preprod",
        }
    }

    #[must_use]
    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Prod => PROD_API_URL,
            Self::Preprod => PREPROD_API_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = ShoplistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(Self::Prod),
            "preprod" => Ok(Self::Preprod),
            other => Err(ShoplistError::Config(format!("unknown environment '{other}'"))),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Default: `preprod`.
    pub environment: Environment,

    /// REST API base. Default: the environment's API address.
    pub api_base_url: String,

    /// Auth service base. Default: `api_base_url`.
    pub auth_base_url: String,

    /// Location passed as `returnTo` when sending the user to log in.
    /// Default: `api_base_url`.
    pub return_to: String,

    /// Bound on each request attempt. Default: 10 s.
    pub request_timeout: Duration,

    /// Delay between the last keystroke and the search. Default: 300 ms.
    pub debounce: Duration,

    /// Minimum trimmed length before searching. Default: 3.
    pub min_query_len: usize,

    /// Maximum suggestions per search. Default: 20.
    pub search_limit: u32,

    /// Cookies to seed the credential store with, as a `Cookie` header value
    /// (`access_token=...; refresh_token=...`).
    pub session_cookie: Option<String>,

    /// Where session cookies are kept. Default: `credentials.json` in the
    /// data directory.
    pub credentials_file: PathBuf,

    /// Filter for log output: `trace`, `debug`, `info`, `warn`, `error` or
    /// any `EnvFilter` directive. Default: `"warn"`.
    pub trace_level: String,

    /// Also export spans to the OTLP trace file. Default: off.
    pub trace_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_map(&BTreeMap::new())
    }
}

fn parse_or<T: FromStr>(map: &BTreeMap<String, String>, key: &str, default: T) -> T {
    match map.get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::debug!(key, value = %raw, "unparsable config value, using default");
            default
        }),
        None => default,
    }
}

fn parse_millis(map: &BTreeMap<String, String>, key: &str, default: Duration) -> Duration {
    map.get(key)
        .and_then(|raw| {
            raw.trim().parse().map_or_else(
                |_| {
                    tracing::debug!(key, value = %raw, "unparsable config value, using default");
                    None
                },
                |ms| Some(Duration::from_millis(ms)),
            )
        })
        .unwrap_or(default)
}

fn non_blank(map: &BTreeMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Builds a configuration from string key/value pairs, falling back to
    /// defaults for missing or unparsable values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use shoplist::{Config, Environment, PROD_API_URL};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("environment".to_string(), "prod".to_string());
    /// map.insert("debounce_ms".to_string(), "150".to_string());
    /// map.insert("search_limit".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.environment, Environment::Prod);
    /// assert_eq!(config.api_base_url, PROD_API_URL);
    /// assert_eq!(config.debounce, Duration::from_millis(150));
    /// assert_eq!(config.search_limit, 20);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let environment = parse_or(map, "environment", Environment::default());
        let api_base_url = non_blank(map, "api_base_url")
            .unwrap_or_else(|| environment.default_api_url().to_string());
        let auth_base_url = non_blank(map, "auth_base_url").unwrap_or_else(|| api_base_url.clone());
        let return_to = map
            .get("return_to")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| api_base_url.clone());

        let trace_file = map
            .get("trace_file")
            .and_then(|raw| parse_flag(raw))
            .unwrap_or(false);

        Self {
            environment,
            api_base_url,
            auth_base_url,
            return_to,
            request_timeout: parse_millis(map, "request_timeout_ms", DEFAULT_REQUEST_TIMEOUT),
            debounce: parse_millis(map, "debounce_ms", DEFAULT_DEBOUNCE),
            min_query_len: parse_or(map, "min_query_len", DEFAULT_MIN_QUERY_LEN),
            search_limit: parse_or(map, "search_limit", DEFAULT_SEARCH_LIMIT),
            session_cookie: map
                .get("session_cookie")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            credentials_file: map
                .get("credentials_file")
                .map(|v| infrastructure::expand_tilde(v.trim()))
                .unwrap_or_else(infrastructure::credentials_file),
            trace_level: map
                .get("trace_level")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_TRACE_LEVEL.to_string()),
            trace_file,
        }
    }

    /// Reads the keys of a TOML document. Scalars are kept as their string
    /// form; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ShoplistError::Config`] if `text` is not valid TOML.
    pub fn map_from_toml(text: &str) -> Result<BTreeMap<String, String>> {
        let table: toml::Table = text
            .parse()
            .map_err(|e| ShoplistError::Config(format!("invalid config file: {e}")))?;

        Ok(table
            .into_iter()
            .filter(|(key, _)| CONFIG_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| {
                let text = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    other => {
                        tracing::debug!(key = %key, value = %other, "ignoring non-scalar config value");
                        return None;
                    }
                };
                Some((key, text))
            })
            .collect())
    }

    /// Reads `SHOPLIST_*` variables from `vars`.
    pub fn map_from_env(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> BTreeMap<String, String> {
        vars.into_iter()
            .filter_map(|(name, value)| {
                let key = name.strip_prefix(ENV_PREFIX)?.to_ascii_lowercase();
                CONFIG_KEYS.contains(&key.as_str()).then_some((key, value))
            })
            .collect()
    }

    /// Loads defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ShoplistError::Config`] if the file cannot be read or
    /// parsed, or if a base URL is not a valid URL.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut map = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ShoplistError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                Self::map_from_toml(&text)?
            }
            None => {
                let default_path = infrastructure::config_file();
                match std::fs::read_to_string(&default_path) {
                    Ok(text) => Self::map_from_toml(&text)?,
                    Err(_) => BTreeMap::new(),
                }
            }
        };
        map.extend(Self::map_from_env(std::env::vars()));

        let config = Self::from_map(&map);
        config.validate()?;
        Ok(config)
    }

    /// Checks that both base URLs parse.
    ///
    /// # Errors
    ///
    /// Returns [`ShoplistError::Config`] naming the invalid setting.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("api_base_url", &self.api_base_url),
            ("auth_base_url", &self.auth_base_url),
        ] {
            reqwest::Url::parse(value)
                .map_err(|e| ShoplistError::Config(format!("{key} '{value}' is not a URL: {e}")))?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn suggestion_settings(&self) -> SuggestionSettings {
        SuggestionSettings {
            debounce: self.debounce,
            min_query_len: self.min_query_len,
            limit: self.search_limit,
        }
    }
}

/// A wired-up client: session context, auth service and API client sharing
/// one transport and navigator.
#[derive(Debug, Clone)]
pub struct Shoplist {
    pub config: Config,
    pub session: SessionContext,
    pub auth: Arc<AuthService>,
    pub api: ApiClient,
}

impl Shoplist {
    /// Wires a client over the given transport and navigator.
    #[must_use]
    pub fn with_parts(
        config: Config,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = SessionContext::new();
        let auth = Arc::new(AuthService::new(
            Arc::clone(&transport),
            navigator,
            config.auth_base_url.clone(),
            config.request_timeout,
        ));
        let api = ApiClient::new(
            transport,
            Arc::clone(&auth),
            session.clone(),
            config.api_base_url.clone(),
            config.request_timeout,
        );
        Self {
            config,
            session,
            auth,
            api,
        }
    }

    /// Checks the session, redirecting to login when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`ShoplistError::Unauthenticated`] when not signed in.
    pub async fn require_session(&self) -> Result<UserProfile> {
        self.auth.require_session(&self.session).await
    }

    /// A suggestion field searching through this client.
    #[must_use]
    pub fn suggestion_field(&self) -> SuggestionField {
        SuggestionField::new(Arc::new(self.api.clone()), self.config.suggestion_settings())
    }
}

/// Builds the production client: `reqwest` transport with cookies in the
/// configured credential file, and a terminal navigator.
///
/// # Errors
///
/// Returns an error if the credential file cannot be opened or seeded, or
/// the HTTP client cannot be built.
pub fn initialize(config: &Config) -> Result<Shoplist> {
    tracing::debug!(
        api = %config.api_base_url,
        auth = %config.auth_base_url,
        environment = config.environment.as_str(),
        "initializing shoplist client"
    );

    let mut store = JsonCredentialStore::new(config.credentials_file.clone())?;
    if let Some(seed) = &config.session_cookie {
        for cookie in storage::models::parse_cookie_seed(seed) {
            store.put(cookie)?;
        }
    }

    let transport = Arc::new(
        ReqwestTransport::new(Box::new(store))?
            .trusting([config.api_base_url.as_str(), config.auth_base_url.as_str()]),
    );
    let navigator = Arc::new(TerminalNavigator::new(config.return_to.clone()));
    Ok(Shoplist::with_parts(config.clone(), transport, navigator))
}
