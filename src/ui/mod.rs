//! Rendering layer.
//!
//! ```text
//! SuggestionState → compute_viewmodel → SuggestionViewModel → render_suggestions → text
//! ListWithItems   → ListViewModel::new ─────────────────────→ render_list        → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready view types and pagination
//! - [`renderer`]: Text rendering, optionally with ANSI styling
//! - [`helpers`]: Match highlighting and ANSI codes

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{render_list, render_lists, render_session, render_suggestions};
pub use viewmodel::{ListViewModel, Segment, SuggestionRow, SuggestionViewModel};
