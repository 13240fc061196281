//! Debounced suggestion engine.
//!
//! Turns keystrokes into rate-limited, de-duplicated article searches and a
//! navigable result list.
//!
//! ```text
//! keystrokes ─→ Event ─→ handle_event ─→ SuggestionState
//!                 ↑            │
//!                 │         Action
//!                 │            ↓
//!                 └──── SuggestionField (timer, search task, callback)
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects emitted by the handler
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Derived engine phases
//! - [`state`]: Field state and view model computation
//! - [`field`]: Async driver owning timers and search tasks

pub mod actions;
pub mod field;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use field::{ArticleSearch, SuggestionField};
pub use handler::{handle_event, Event};
pub use modes::SuggestionPhase;
pub use state::{SuggestionSettings, SuggestionState};
