//! Storage record models for the credential store.
//!
//! Cookies are kept as flat name/value records. Expiry (`Max-Age`,
//! `Expires`, empty value) is honored when the cookie arrives. `Domain` and
//! `Path` are not interpreted; the transport scopes the whole store to the
//! API and auth hosts instead.

use serde::{Deserialize, Serialize};

/// A stored session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,

    /// Unix timestamp of the last time the server set this cookie.
    pub updated_at: i64,
}

impl CookieRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// What a single `Set-Cookie` header asks the client to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieChange {
    Set(CookieRecord),
    Remove(String),
}

/// Parses one `Set-Cookie` header value.
///
/// Returns `None` for headers without a `name=value` pair.
///
/// # Examples
///
/// ```
/// use shoplist::storage::models::{parse_set_cookie, CookieChange};
///
/// let change = parse_set_cookie("access_token=abc; Path=/; HttpOnly").unwrap();
/// assert!(matches!(change, CookieChange::Set(ref c) if c.value == "abc"));
///
/// let change = parse_set_cookie("access_token=; Max-Age=0").unwrap();
/// assert_eq!(change, CookieChange::Remove("access_token".to_string()));
/// ```
#[must_use]
pub fn parse_set_cookie(header: &str) -> Option<CookieChange> {
    let mut parts = header.split(';').map(str::trim);
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let now = chrono::Utc::now();
    let expired = parts.any(|attr| {
        let Some((key, value)) = attr.split_once('=') else {
            return false;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.eq_ignore_ascii_case("max-age") {
            value.parse::<i64>().is_ok_and(|secs| secs <= 0)
        } else if key.eq_ignore_ascii_case("expires") {
            chrono::DateTime::parse_from_rfc2822(value).is_ok_and(|at| at <= now)
        } else {
            false
        }
    });

    if expired || value.is_empty() {
        Some(CookieChange::Remove(name.to_string()))
    } else {
        Some(CookieChange::Set(CookieRecord::new(name, value.trim())))
    }
}

/// Parses a `Cookie`-style seed string (`"a=1; b=2"`) into records.
#[must_use]
pub fn parse_cookie_seed(seed: &str) -> Vec<CookieRecord> {
    seed.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, value)| CookieRecord::new(name.trim(), value.trim()))
        .collect()
}
