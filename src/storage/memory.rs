//! In-memory credential store.

use crate::domain::error::Result;
use crate::storage::backend::CredentialStore;
use crate::storage::models::CookieRecord;
use std::collections::BTreeMap;

/// Credential store that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    cookies: BTreeMap<String, CookieRecord>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given cookies.
    #[must_use]
    pub fn with_cookies(cookies: impl IntoIterator<Item = CookieRecord>) -> Self {
        Self {
            cookies: cookies.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn cookies(&self) -> Result<Vec<CookieRecord>> {
        Ok(self.cookies.values().cloned().collect())
    }

    fn put(&mut self, cookie: CookieRecord) -> Result<()> {
        self.cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        self.cookies.remove(name);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.cookies.clear();
        Ok(())
    }
}
