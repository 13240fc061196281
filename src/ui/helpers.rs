//! Shared rendering utilities.
//!
//! Matching works on characters, not bytes, and compares them
//! case-insensitively one by one, so the segments always rebuild the
//! original name exactly.

use super::viewmodel::Segment;

pub const BOLD: &str = "\u{1b}[1m";
pub const DIM: &str = "\u{1b}[2m";
pub const REVERSE: &str = "\u{1b}[7m";
pub const UNDERLINE: &str = "\u{1b}[4m";
pub const RESET: &str = "\u{1b}[0m";

fn same_char(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Splits `name` into matched and unmatched segments for `query`.
///
/// The query is trimmed. Matches are case-insensitive, non-overlapping and
/// found left to right. An empty query yields the whole name unmatched.
///
/// # Examples
///
/// ```
/// use shoplist::ui::helpers::highlight;
///
/// let parts: Vec<(String, bool)> = highlight("Tomate cerise", "TOM")
///     .into_iter()
///     .map(|s| (s.text, s.matched))
///     .collect();
/// assert_eq!(parts, vec![("Tom".into(), true), ("ate cerise".into(), false)]);
/// ```
#[must_use]
pub fn highlight(name: &str, query: &str) -> Vec<Segment> {
    let needle: Vec<char> = query.trim().chars().collect();
    if needle.is_empty() {
        return vec![Segment {
            text: name.to_string(),
            matched: false,
        }];
    }

    let chars: Vec<char> = name.chars().collect();
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        let window = chars.get(i..i + needle.len());
        let hit = window.is_some_and(|w| w.iter().zip(&needle).all(|(a, b)| same_char(*a, *b)));

        if hit {
            if !plain.is_empty() {
                segments.push(Segment {
                    text: std::mem::take(&mut plain),
                    matched: false,
                });
            }
            segments.push(Segment {
                text: chars[i..i + needle.len()].iter().collect(),
                matched: true,
            });
            i += needle.len();
        } else {
            plain.push(chars[i]);
            i += 1;
        }
    }

    if !plain.is_empty() {
        segments.push(Segment {
            text: plain,
            matched: false,
        });
    }
    segments
}

/// Renders segments with matches underlined.
#[must_use]
pub fn styled_segments(segments: &[Segment], ansi: bool) -> String {
    segments
        .iter()
        .map(|s| {
            if s.matched && ansi {
                format!("{BOLD}{UNDERLINE}{}{RESET}", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}
