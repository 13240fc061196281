//! Suggestion engine phases.
//!
//! The phase is never stored. It is read off the state fields by
//! [`SuggestionState::phase`](super::SuggestionState::phase), so it cannot
//! drift from the data it describes.

/// Where the engine currently is in its query cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPhase {
    /// Text too short, or nothing to show.
    Idle,

    /// A search is scheduled and the debounce delay is running.
    Debouncing,

    /// A query has been issued and its result has not arrived.
    Searching,

    /// Results are available and visible.
    Showing,

    /// The remembered prefix returned nothing and the text still extends it,
    /// so no query will be issued.
    Suppressed,
}

impl SuggestionPhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Debouncing => "debouncing",
            Self::Searching => "searching",
            Self::Showing => "showing",
            Self::Suppressed => "suppressed",
        }
    }
}
