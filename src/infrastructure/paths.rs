//! Filesystem locations.
//!
//! Data lives under the platform's local data directory
//! (`~/.local/share/shoplist` on Linux) and configuration under the config
//! directory (`~/.config/shoplist`). Both fall back to the working directory
//! when the platform reports no home.

use std::path::PathBuf;

pub const APP_DIR: &str = "shoplist";

#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default TOML configuration file.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default cookie store.
#[must_use]
pub fn credentials_file() -> PathBuf {
    data_dir().join("credentials.json")
}

#[must_use]
pub fn trace_file() -> PathBuf {
    data_dir().join("shoplist-otlp.json")
}

/// Expands a leading `~` to the home directory.
///
/// # Examples
///
/// ```
/// use shoplist::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/etc/shoplist.toml"), PathBuf::from("/etc/shoplist.toml"));
/// if let Some(home) = dirs::home_dir() {
///     assert_eq!(expand_tilde("~/lists.json"), home.join("lists.json"));
/// }
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_app_directories() {
        assert!(credentials_file().starts_with(data_dir()));
        assert!(trace_file().starts_with(data_dir()));
        assert!(config_file().ends_with("shoplist/config.toml"));
    }
}
