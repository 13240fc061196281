//! Side effects requested by the suggestion handler.
//!
//! [`handle_event`](super::handle_event) never touches timers, the network or
//! the embedding form. It returns these commands and the
//! [`SuggestionField`](super::SuggestionField) carries them out.

use crate::domain::Article;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start the debounce timer for `query`, replacing any running timer.
    /// The timer reports back with `generation`.
    ScheduleSearch {
        query: String,
        delay: Duration,
        generation: u64,
    },

    /// Stop the running debounce timer, if any.
    CancelScheduledSearch,

    /// Send `query` to the article index.
    IssueSearch { query: String, limit: u32 },

    /// Abort the in-flight query, if any. Its result is never applied.
    CancelSearch,

    /// Set the field's text programmatically. Fed back to the handler as
    /// [`Event::TextReplaced`](super::Event::TextReplaced).
    ReplaceText(String),

    /// Report the chosen article to the embedding form.
    NotifySelected(Article),
}
