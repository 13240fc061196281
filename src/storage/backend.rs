//! Credential storage abstraction.
//!
//! This module defines the [`CredentialStore`] trait the transport uses to
//! attach session cookies to outbound requests and to record cookies the
//! auth service hands back (login, refresh, logout).

use crate::domain::error::Result;
use crate::storage::models::{parse_set_cookie, CookieChange, CookieRecord};

/// Abstraction over where session cookies live.
///
/// # Implementations
///
/// - [`JsonCredentialStore`](crate::storage::JsonCredentialStore): JSON file with atomic writes
/// - [`MemoryCredentialStore`](crate::storage::MemoryCredentialStore): process memory only
pub trait CredentialStore: Send {
    /// Returns every stored cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn cookies(&self) -> Result<Vec<CookieRecord>>;

    /// Inserts or replaces a cookie by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn put(&mut self, cookie: CookieRecord) -> Result<()>;

    /// Removes a cookie by name. Missing cookies are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn remove(&mut self, name: &str) -> Result<()>;

    /// Removes every cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if the write operation fails.
    fn clear(&mut self) -> Result<()>;

    /// Value for a `Cookie` request header, `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn cookie_header(&self) -> Result<Option<String>> {
        let cookies = self.cookies()?;
        if cookies.is_empty() {
            return Ok(None);
        }
        let header = cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        Ok(Some(header))
    }

    /// Applies the `Set-Cookie` headers of a response.
    ///
    /// # Errors
    ///
    /// Returns an error if any resulting write fails.
    fn absorb_set_cookies(&mut self, headers: &[String]) -> Result<()> {
        for header in headers {
            match parse_set_cookie(header) {
                Some(CookieChange::Set(cookie)) => {
                    tracing::debug!(cookie = %cookie.name, "storing cookie from response");
                    self.put(cookie)?;
                }
                Some(CookieChange::Remove(name)) => {
                    tracing::debug!(cookie = %name, "server expired cookie");
                    self.remove(&name)?;
                }
                None => tracing::trace!("ignoring malformed set-cookie header"),
            }
        }
        Ok(())
    }
}
