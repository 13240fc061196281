//! Event handling for the suggestion field.
//!
//! [`handle_event`] is a pure transition function: it mutates a
//! [`SuggestionState`] and returns whether the view changed plus the
//! [`Action`]s the driver must perform. Timers and network calls live in
//! [`SuggestionField`](super::SuggestionField); their outcomes come back in
//! as events.
//!
//! # Event Types
//!
//! - **Text**: `Input` (typed by the user), `TextReplaced` (set by code)
//! - **Query cycle**: `DebounceElapsed`, `SearchCompleted`, `SearchFailed`
//! - **Keyboard**: `KeyDown`, `KeyUp`, `Enter`, `Escape`
//! - **Pointer and focus**: `PointerHover`, `PointerSelect`, `OutsidePress`, `Focus`
//!
//! # Example
//!
//! ```rust
//! use shoplist::app::{handle_event, Action, Event, SuggestionState};
//!
//! let mut state = SuggestionState::default();
//! let (_, actions) = handle_event(&mut state, &Event::Input("tom".into()))?;
//! assert!(matches!(actions.as_slice(), [Action::ScheduleSearch { query, .. }] if query == "tom"));
//! # Ok::<(), shoplist::ShoplistError>(())
//! ```

use super::{Action, SuggestionState};
use crate::domain::error::Result;
use crate::domain::Article;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user edited the text; carries the full new text.
    Input(String),

    /// The text was set programmatically (after a selection, or by the
    /// embedding form).
    TextReplaced(String),

    /// The debounce timer scheduled as `generation` for `query` ran out.
    DebounceElapsed { query: String, generation: u64 },

    /// The index answered `query`.
    SearchCompleted { query: String, articles: Vec<Article> },

    /// The query for `query` failed.
    SearchFailed { query: String, message: String },

    KeyDown,
    KeyUp,
    Enter,
    Escape,

    /// The pointer moved over row `index`.
    PointerHover(usize),

    /// Row `index` was clicked.
    PointerSelect(usize),

    /// A press landed outside the field and its list.
    OutsidePress,

    /// The text input gained focus.
    Focus,
}

/// Processes an event, mutates state and returns `(render, actions)`.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature stable for
/// handlers that validate input.
pub fn handle_event(state: &mut SuggestionState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event = ?event).entered();

    match event {
        Event::Input(text) => {
            if state
                .suppressed_prefix
                .as_ref()
                .is_some_and(|prefix| text.chars().count() < prefix.chars().count())
            {
                tracing::debug!("text shorter than suppressed prefix, re-enabling search");
                state.suppressed_prefix = None;
            }
            state.text.clone_from(text);
            Ok((true, text_changed(state)))
        }

        Event::TextReplaced(text) => {
            state.text.clone_from(text);
            Ok((true, text_changed(state)))
        }

        Event::DebounceElapsed { query, generation } => {
            if *generation != state.timer_generation
                || state.pending.as_deref() != Some(query.as_str())
            {
                tracing::debug!(query = %query, "ignoring superseded timer");
                return Ok((false, vec![]));
            }
            state.pending = None;
            state.in_flight = Some(query.clone());
            tracing::debug!(query = %query, "debounce elapsed, searching");
            Ok((
                true,
                vec![Action::IssueSearch {
                    query: query.clone(),
                    limit: state.settings.limit,
                }],
            ))
        }

        Event::SearchCompleted { query, articles } => {
            if state.in_flight.as_deref() != Some(query.as_str()) {
                tracing::debug!(query = %query, "ignoring results for superseded query");
                return Ok((false, vec![]));
            }
            state.in_flight = None;
            state.selected = None;
            state.results.clone_from(articles);
            state.visible = !articles.is_empty();
            state.suppressed_prefix = articles.is_empty().then(|| query.clone());
            tracing::debug!(query = %query, count = articles.len(), "results applied");
            Ok((true, vec![]))
        }

        Event::SearchFailed { query, message } => {
            if state.in_flight.as_deref() != Some(query.as_str()) {
                return Ok((false, vec![]));
            }
            tracing::error!(query = %query, error = %message, "article search failed");
            state.in_flight = None;
            state.clear_results();
            state.suppressed_prefix = None;
            Ok((true, vec![]))
        }

        Event::KeyDown => {
            if !state.is_showing() {
                return Ok((false, vec![]));
            }
            state.move_selection_down();
            Ok((true, vec![]))
        }

        Event::KeyUp => {
            if !state.is_showing() {
                return Ok((false, vec![]));
            }
            state.move_selection_up();
            Ok((true, vec![]))
        }

        Event::Enter => {
            if !state.is_showing() {
                return Ok((false, vec![]));
            }
            match state.selected {
                Some(index) => Ok((true, select(state, index))),
                None => Ok((false, vec![])),
            }
        }

        Event::Escape => {
            if !state.is_showing() {
                return Ok((false, vec![]));
            }
            state.visible = false;
            state.selected = None;
            Ok((true, vec![]))
        }

        Event::PointerHover(index) => {
            if *index >= state.results.len() || state.selected == Some(*index) {
                return Ok((false, vec![]));
            }
            state.selected = Some(*index);
            Ok((true, vec![]))
        }

        Event::PointerSelect(index) => {
            if !state.is_showing() || *index >= state.results.len() {
                return Ok((false, vec![]));
            }
            Ok((true, select(state, *index)))
        }

        Event::OutsidePress => {
            let was_visible = state.visible;
            state.visible = false;
            Ok((was_visible, vec![]))
        }

        Event::Focus => {
            if state.results.is_empty() || state.visible {
                return Ok((false, vec![]));
            }
            state.visible = true;
            Ok((true, vec![]))
        }
    }
}

/// Runs after every text change, typed or programmatic.
fn text_changed(state: &mut SuggestionState) -> Vec<Action> {
    let mut actions = Vec::new();
    if state.pending.take().is_some() {
        actions.push(Action::CancelScheduledSearch);
    }

    if state.skip_next_change {
        state.skip_next_change = false;
        tracing::debug!("text set by selection, not searching");
        return actions;
    }

    if !state.is_searchable() {
        state.clear_results();
        state.suppressed_prefix = None;
        if state.in_flight.take().is_some() {
            actions.push(Action::CancelSearch);
        }
        return actions;
    }

    if state.is_suppressed() {
        tracing::debug!(query = %state.query(), "extends a zero-result query, not searching");
        return actions;
    }

    let query = state.query().to_string();
    state.pending = Some(query.clone());
    state.timer_generation = state.timer_generation.wrapping_add(1);
    actions.push(Action::ScheduleSearch {
        query,
        delay: state.settings.debounce,
        generation: state.timer_generation,
    });
    actions
}

fn select(state: &mut SuggestionState, index: usize) -> Vec<Action> {
    let Some(article) = state.results.get(index).cloned() else {
        return vec![];
    };
    tracing::debug!(article = %article.name, index, "suggestion selected");

    state.skip_next_change = true;
    state.clear_results();

    let mut actions = vec![
        Action::ReplaceText(article.name.clone()),
        Action::NotifySelected(article),
    ];
    if state.in_flight.take().is_some() {
        actions.push(Action::CancelSearch);
    }
    actions
}
