//! JSON file-based credential store.
//!
//! Cookies are kept in memory and written to a small JSON document with
//! atomic writes (write-to-temp + rename) after every change.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "cookies": {
//!     "access_token": { "name": "access_token", "value": "…", "updated_at": 1735800000 }
//!   }
//! }
//! ```

use crate::domain::error::{Result, ShoplistError};
use crate::storage::backend::CredentialStore;
use crate::storage::models::CookieRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialData {
    version: u32,

    #[serde(default)]
    cookies: BTreeMap<String, CookieRecord>,
}

impl Default for CredentialData {
    fn default() -> Self {
        Self {
            version: 1,
            cookies: BTreeMap::new(),
        }
    }
}

/// JSON file credential store.
///
/// # Thread Safety
///
/// `Send` but not `Sync`; the transport wraps it in a mutex.
pub struct JsonCredentialStore {
    file_path: PathBuf,
    data: CredentialData,
    dirty: bool,
}

impl JsonCredentialStore {
    /// Opens the store, creating parent directories as needed.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file exists but does not contain valid JSON.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shoplist::storage::{CredentialStore, JsonCredentialStore};
    /// use std::path::PathBuf;
    ///
    /// let store = JsonCredentialStore::new(PathBuf::from("/tmp/shoplist/credentials.json"))?;
    /// let header = store.cookie_header()?;
    /// # Ok::<(), shoplist::ShoplistError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening credential store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            CredentialData::default()
        };

        tracing::debug!(cookie_count = data.cookies.len(), "credential store opened");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<CredentialData> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| ShoplistError::Storage(format!("failed to parse credentials: {e}")))
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ShoplistError::Storage(format!("failed to serialize credentials: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::trace!(path = ?self.file_path, "credentials saved");
        Ok(())
    }
}

impl CredentialStore for JsonCredentialStore {
    fn cookies(&self) -> Result<Vec<CookieRecord>> {
        Ok(self.data.cookies.values().cloned().collect())
    }

    fn put(&mut self, cookie: CookieRecord) -> Result<()> {
        if self.data.cookies.get(&cookie.name).is_some_and(|c| c.value == cookie.value) {
            return Ok(());
        }
        self.data.cookies.insert(cookie.name.clone(), cookie);
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        if self.data.cookies.remove(name).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if !self.data.cookies.is_empty() {
            self.data.cookies.clear();
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }
}

impl Drop for JsonCredentialStore {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save credentials on drop");
            }
        }
    }
}
