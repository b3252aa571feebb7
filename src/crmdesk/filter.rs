//! # Filtering and Pagination
//!
//! The visible list is a pure function of the canonical collection, a
//! free-text search and a status selector. Nothing here holds state: callers
//! recompute the view whenever any of the three inputs changes, so the view
//! can never drift from the data.
//!
//! Matching rules:
//! - the search text matches when it is a case-insensitive substring of any
//!   of the record's search fields (name, email, company for customers);
//! - the status selector is either [`StatusFilter::All`] or an exact match;
//! - both must hold.
//!
//! Results keep the collection's order.

use crate::error::Result;
use crate::model::Record;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn matches(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl<S: FromStr<Err = crate::error::CrmError>> FromStr for StatusFilter<S> {
    type Err = crate::error::CrmError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

impl<S: fmt::Display> fmt::Display for StatusFilter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<S> {
    pub search: String,
    pub status: StatusFilter<S>,
}

impl<S> Default for ListQuery<S> {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
        }
    }
}

impl<S> ListQuery<S> {
    pub fn new(search: impl Into<String>, status: StatusFilter<S>) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }
}

/// Records matching `query`, in collection order.
pub fn filter<'a, R: Record>(records: &'a [R], query: &ListQuery<R::Status>) -> Vec<&'a R> {
    let needle = query.search.to_lowercase();

    records
        .iter()
        .filter(|record| query.status.matches(&record.status()))
        .filter(|record| {
            needle.is_empty()
                || record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown.
    pub number: usize,
    pub page_size: usize,
    /// Number of items across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// 1-based inclusive range of the items on this page.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.number - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }

    /// `"11-20 of 25 customers"`, or `"0 of 0 customers"` when empty.
    pub fn summary(&self, noun_plural: &str) -> String {
        match self.range() {
            Some((first, last)) => format!("{first}-{last} of {} {noun_plural}", self.total),
            None => format!("0 of {} {noun_plural}", self.total),
        }
    }
}

/// Cuts page `number` (1-based) out of `items`. Page 0 reads as page 1 and
/// pages past the end clamp to the last page; a zero page size is treated
/// as one.
pub fn paginate<T>(items: Vec<T>, number: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let last_page = total.div_ceil(page_size).max(1);
    let number = number.clamp(1, last_page);

    let items = items
        .into_iter()
        .skip((number - 1) * page_size)
        .take(page_size)
        .collect();

    Page {
        items,
        number,
        page_size,
        total,
    }
}
