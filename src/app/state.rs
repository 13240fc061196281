//! Suggestion field state and view model computation.
//!
//! [`SuggestionState`] is the single source of truth for one suggestion
//! field: the text as typed, the last results, the highlighted row and the
//! bookkeeping that drives debouncing and zero-result suppression.
//!
//! # Zero-result suppression
//!
//! When a query returns nothing, its trimmed text is remembered as the
//! suppression prefix. While the trimmed text still starts with that prefix
//! no query is issued, on the assumption that a longer text cannot match
//! more. Substring search breaks that assumption ("lait" may find nothing
//! while "laitue" does), so this is an approximation kept for behavioural
//! parity. The prefix is forgotten when the raw text becomes shorter than it,
//! when the text drops below the minimum length, on any non-empty result and
//! on a failed query.
//!
//! # Example
//!
//! ```rust
//! use shoplist::app::{SuggestionSettings, SuggestionState};
//!
//! let state = SuggestionState::new(SuggestionSettings::default());
//! let viewmodel = state.compute_viewmodel();
//! assert!(!viewmodel.visible);
//! ```

use std::time::Duration;

use super::modes::SuggestionPhase;
use crate::domain::Article;
use crate::ui::helpers::highlight;
use crate::ui::viewmodel::{SuggestionRow, SuggestionViewModel};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Tunables for one suggestion field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionSettings {
    pub debounce: Duration,
    /// Minimum trimmed length, in characters, before anything is searched.
    pub min_query_len: usize,
    pub limit: u32,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuggestionState {
    /// Text exactly as typed, untrimmed.
    pub text: String,

    /// Results of the last completed query.
    pub results: Vec<Article>,

    /// Highlighted row; `None` when nothing is highlighted.
    pub selected: Option<usize>,

    /// Whether the result list is open.
    pub visible: bool,

    /// Trimmed text of the last query that returned nothing.
    pub suppressed_prefix: Option<String>,

    /// Set on selection so the programmatic text update that follows does
    /// not start a search.
    pub skip_next_change: bool,

    /// Query waiting for its debounce timer.
    pub pending: Option<String>,

    /// Bumped for every scheduled timer. Only an elapse carrying the
    /// current value counts.
    pub timer_generation: u64,

    /// Query sent and not yet answered.
    pub in_flight: Option<String>,

    pub settings: SuggestionSettings,
}

impl SuggestionState {
    #[must_use]
    pub const fn new(settings: SuggestionSettings) -> Self {
        Self {
            text: String::new(),
            results: Vec::new(),
            selected: None,
            visible: false,
            suppressed_prefix: None,
            skip_next_change: false,
            pending: None,
            timer_generation: 0,
            in_flight: None,
            settings,
        }
    }

    /// The text that would be searched.
    #[must_use]
    pub fn query(&self) -> &str {
        self.text.trim()
    }

    /// Whether the trimmed text is long enough to search.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.query().chars().count() >= self.settings.min_query_len
    }

    /// Whether the trimmed text extends the remembered zero-result prefix.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed_prefix
            .as_deref()
            .is_some_and(|prefix| !prefix.is_empty() && self.query().starts_with(prefix))
    }

    #[must_use]
    pub fn phase(&self) -> SuggestionPhase {
        if self.in_flight.is_some() {
            SuggestionPhase::Searching
        } else if self.pending.is_some() {
            SuggestionPhase::Debouncing
        } else if self.is_showing() {
            SuggestionPhase::Showing
        } else if self.is_searchable() && self.is_suppressed() {
            SuggestionPhase::Suppressed
        } else {
            SuggestionPhase::Idle
        }
    }

    /// Results are open and there is something in them. Keyboard navigation
    /// only applies in this case.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.visible && !self.results.is_empty()
    }

    /// Closes the list and drops results and highlight.
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.visible = false;
        self.selected = None;
    }

    /// Moves the highlight down one row, stopping at the last row.
    pub fn move_selection_down(&mut self) {
        let Some(last) = self.results.len().checked_sub(1) else {
            return;
        };
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
    }

    /// Moves the highlight up one row. Moving up from the first row clears
    /// the highlight.
    pub fn move_selection_up(&mut self) {
        self.selected = match self.selected {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Computes the renderable view of the field.
    #[must_use]
    pub fn compute_viewmodel(&self) -> SuggestionViewModel {
        let query = self.query();
        let rows = if self.is_showing() {
            self.results
                .iter()
                .enumerate()
                .map(|(index, article)| SuggestionRow {
                    segments: highlight(&article.name, query),
                    usage_count: article.usage_count,
                    selected: self.selected == Some(index),
                })
                .collect()
        } else {
            Vec::new()
        };

        SuggestionViewModel {
            text: self.text.clone(),
            visible: self.is_showing(),
            loading: self.in_flight.is_some() && self.is_searchable(),
            phase: self.phase(),
            rows,
        }
    }
}

impl Default for SuggestionState {
    fn default() -> Self {
        Self::new(SuggestionSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_results(names: &[&str]) -> SuggestionState {
        let mut state = SuggestionState::default();
        state.text = "pom".to_string();
        state.results = names
            .iter()
            .enumerate()
            .map(|(i, name)| Article::new(format!("a{i}"), *name))
            .collect();
        state.visible = true;
        state
    }

    #[test]
    fn selection_clamps_at_last_row() {
        let mut state = with_results(&["Pomme", "Pomelo"]);
        state.move_selection_down();
        state.move_selection_down();
        state.move_selection_down();
        assert_eq!(state.selected, Some(1));
    }

    #[test]
    fn moving_up_from_first_row_clears_highlight() {
        let mut state = with_results(&["Pomme", "Pomelo"]);
        state.move_selection_down();
        state.move_selection_up();
        assert_eq!(state.selected, None);
        state.move_selection_up();
        assert_eq!(state.selected, None);
    }

    #[test]
    fn moving_down_without_results_is_noop() {
        let mut state = SuggestionState::default();
        state.move_selection_down();
        assert_eq!(state.selected, None);
    }

    #[test]
    fn suppression_requires_prefix_extension() {
        let mut state = SuggestionState::default();
        state.suppressed_prefix = Some("milk".to_string());

        state.text = "milk2".to_string();
        assert!(state.is_suppressed());
        assert_eq!(state.phase(), SuggestionPhase::Suppressed);

        state.text = "mild".to_string();
        assert!(!state.is_suppressed());
    }

    #[test]
    fn viewmodel_hides_rows_when_closed() {
        let mut state = with_results(&["Pomme"]);
        assert_eq!(state.compute_viewmodel().rows.len(), 1);

        state.visible = false;
        let viewmodel = state.compute_viewmodel();
        assert!(viewmodel.rows.is_empty());
        assert_eq!(viewmodel.phase, SuggestionPhase::Idle);
    }

    #[test]
    fn whitespace_does_not_count_towards_minimum() {
        let mut state = SuggestionState::default();
        state.text = "  ab  ".to_string();
        assert!(!state.is_searchable());
        state.text = " abc".to_string();
        assert!(state.is_searchable());
    }
}
