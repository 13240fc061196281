//! Plain-text rendering of view models.
//!
//! Renderers return strings so callers decide where output goes. With
//! `ansi` off the output carries no escape sequences.

use std::fmt::Write as _;

use super::helpers::{styled_segments, BOLD, DIM, RESET, REVERSE};
use super::viewmodel::{ItemRow, ListViewModel, SuggestionViewModel};
use crate::domain::{List, Session};

/// Renders the open suggestion list, one row per line. Empty when closed.
#[must_use]
pub fn render_suggestions(vm: &SuggestionViewModel, ansi: bool) -> String {
    let mut out = String::new();
    if vm.loading {
        out.push_str("Searching...\n");
    }
    if !vm.visible {
        return out;
    }

    for row in &vm.rows {
        let marker = if row.selected { '>' } else { ' ' };
        let name = styled_segments(&row.segments, ansi);
        let line = format!("{marker} {name}  ({} uses)", row.usage_count);
        if row.selected && ansi {
            let _ = writeln!(out, "{REVERSE}{line}{RESET}");
        } else {
            let _ = writeln!(out, "{line}");
        }
    }
    out
}

fn render_item(row: &ItemRow, ansi: bool) -> String {
    let check = if row.purchased { "[x]" } else { "[ ]" };
    let mut line = format!("{check} {}", row.name);
    if !row.amount.is_empty() {
        let _ = write!(line, "  {}", row.amount);
    }
    if let Some(notes) = &row.notes {
        let _ = write!(line, "  ({notes})");
    }
    let _ = write!(line, "  #{}", row.id);

    if row.purchased && ansi {
        format!("{DIM}{line}{RESET}")
    } else {
        line
    }
}

/// Renders a list page: title, progress, items and page indicator.
#[must_use]
pub fn render_list(vm: &ListViewModel, ansi: bool) -> String {
    let mut out = String::new();
    if ansi {
        let _ = writeln!(out, "{BOLD}{}{RESET}  {}", vm.title, vm.progress);
    } else {
        let _ = writeln!(out, "{}  {}", vm.title, vm.progress);
    }

    if vm.rows.is_empty() {
        out.push_str("  (no items)\n");
    }
    for row in &vm.rows {
        let _ = writeln!(out, "  {}", render_item(row, ansi));
    }
    if let Some(info) = &vm.page_info {
        let _ = writeln!(out, "{info}");
    }
    out
}

/// One line per list: id, name, last update date.
#[must_use]
pub fn render_lists(lists: &[List]) -> String {
    if lists.is_empty() {
        return "No lists yet.\n".to_string();
    }
    lists.iter().fold(String::new(), |mut out, list| {
        let _ = writeln!(
            out,
            "{}  {}  (updated {})",
            list.id,
            list.name,
            list.updated_at.format("%Y-%m-%d")
        );
        out
    })
}

#[must_use]
pub fn render_session(session: &Session) -> String {
    match session {
        Session::Authenticated(_) => {
            format!("Signed in as {} <{}>\n", session.full_name(), session.email())
        }
        Session::Anonymous => "Not signed in.\n".to_string(),
    }
}
