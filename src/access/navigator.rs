//! Full-page navigation seam.
//!
//! A browser client leaves the page to sign in or out. Here the host decides
//! what "leaving" means: the terminal navigator prints the URL for the user,
//! the recording navigator just remembers it.

use std::sync::Mutex;

pub trait Navigator: Send + Sync {
    /// Location the user should come back to after signing in.
    fn current_location(&self) -> String;

    /// Leaves the current view for `url`.
    fn navigate(&self, url: &str);
}

/// Prints navigation targets on stderr.
#[derive(Debug, Clone)]
pub struct TerminalNavigator {
    location: String,
}

impl TerminalNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl Navigator for TerminalNavigator {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn navigate(&self, url: &str) {
        tracing::info!(url = %url, "navigation requested");
        eprintln!("Open this address in your browser to continue:\n  {url}");
    }
}

/// Records navigation targets instead of following them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    location: String,
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            visited: Mutex::new(Vec::new()),
        }
    }

    /// Every URL passed to [`Navigator::navigate`], oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn navigate(&self, url: &str) {
        tracing::debug!(url = %url, "recording navigation");
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(url.to_string());
        }
    }
}
