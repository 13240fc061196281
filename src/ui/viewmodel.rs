//! Display-ready views of suggestion fields and lists.
//!
//! View models carry no behaviour. They are produced by
//! [`SuggestionState::compute_viewmodel`](crate::app::SuggestionState::compute_viewmodel)
//! and [`ListViewModel::new`], and consumed by the [`renderer`](super::renderer).

use crate::app::SuggestionPhase;
use crate::domain::{Item, ListWithItems};

/// A run of text that either matches the query or does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

/// One suggestion in the open result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRow {
    /// The article name, split around query matches.
    pub segments: Vec<Segment>,
    pub usage_count: u64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionViewModel {
    pub text: String,
    pub visible: bool,
    /// A query is in flight for searchable text.
    pub loading: bool,
    pub phase: SuggestionPhase,
    pub rows: Vec<SuggestionRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    /// `"x2"`, `"500 g"` or empty.
    pub amount: String,
    pub notes: Option<String>,
    pub purchased: bool,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            amount: item.amount_label(),
            notes: item.notes.clone().filter(|n| !n.trim().is_empty()),
            purchased: item.purchased,
        }
    }
}

/// A page of a list with its progress and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewModel {
    pub title: String,
    /// `"3/5 purchased"`.
    pub progress: String,
    pub rows: Vec<ItemRow>,
    /// `"Page 2 of 4"`, absent when everything fits on one page.
    pub page_info: Option<String>,
}

impl ListViewModel {
    /// Builds the view of `page` (zero-based) of `list`, showing `items`.
    /// Progress counts the whole list.
    #[must_use]
    pub fn new(list: &ListWithItems, items: &[Item], page: u32, per_page: u32) -> Self {
        let total = u32::try_from(list.items.len()).unwrap_or(u32::MAX);
        Self {
            title: list.list.name.clone(),
            progress: format!("{}/{} purchased", list.purchased_count(), list.items.len()),
            rows: items.iter().map(ItemRow::from).collect(),
            page_info: page_info(page, total, per_page),
        }
    }
}

/// Number of pages needed for `total` entries.
///
/// # Examples
///
/// ```
/// use shoplist::ui::viewmodel::page_count;
///
/// assert_eq!(page_count(0, 20), 0);
/// assert_eq!(page_count(20, 20), 1);
/// assert_eq!(page_count(21, 20), 2);
/// ```
#[must_use]
pub const fn page_count(total: u32, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// `"Page n of m"` for zero-based `page`, or `None` for a single page.
#[must_use]
pub fn page_info(page: u32, total: u32, per_page: u32) -> Option<String> {
    let pages = page_count(total, per_page);
    (pages > 1).then(|| format!("Page {} of {pages}", page.saturating_add(1)))
}
