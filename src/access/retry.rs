//! Retry-on-401 phases.
//!
//! A request starts in [`RetryPhase::Initial`]. A 401 there leads to a
//! session refresh and, if it succeeds, one replay in [`RetryPhase::Retry`].
//! A 401 in `Retry` has nowhere to go but [`UnauthorizedStep::Terminal`], so
//! a second refresh cannot be reached.

/// Which attempt of an originating call is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPhase {
    Initial,
    Retry,
}

/// What to do after an attempt was answered with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedStep {
    /// Refresh the session, then replay once.
    RefreshThenRetry,
    /// Redirect to login and fail.
    Terminal,
}

impl RetryPhase {
    #[must_use]
    pub const fn is_retry(self) -> bool {
        matches!(self, Self::Retry)
    }

    #[must_use]
    pub const fn on_unauthorized(self) -> UnauthorizedStep {
        match self {
            Self::Initial => UnauthorizedStep::RefreshThenRetry,
            Self::Retry => UnauthorizedStep::Terminal,
        }
    }

    /// Phase after a refresh, `None` if the refresh failed.
    #[must_use]
    pub const fn after_refresh(self, refreshed: bool) -> Option<Self> {
        match (self, refreshed) {
            (Self::Initial, true) => Some(Self::Retry),
            _ => None,
        }
    }
}
