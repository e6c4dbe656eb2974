//! Mutable query parameters.

use serde::{Deserialize, Serialize};

use crate::filter::Filters;
use crate::ordering::SortOrder;

/// The search, filter and sort parameters of one list view.
///
/// Serializes with camelCase keys so it can be stored alongside the view's
/// other state:
///
/// ```
/// use catalog_query::{QueryState, SortOrder};
///
/// let state: QueryState = serde_json::from_str(
///     r#"{"searchQuery": "fx", "filters": {"price": "free"}, "sortOrder": "desc"}"#,
/// ).unwrap();
/// assert_eq!(state.search_query, "fx");
/// assert_eq!(state.sort_order, SortOrder::Desc);
/// assert!(state.sort_by.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryState {
    /// Free-text query; empty matches everything.
    pub search_query: String,
    /// Selected filters, keyed by filter name.
    pub filters: Filters,
    /// Field to sort by; empty disables sorting.
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl QueryState {
    pub fn new() -> Self {
        QueryState::default()
    }

    /// Returns `true` if any parameter is set.
    ///
    /// A filter key counts even when its value is inactive or matches every
    /// item; this is a presence check only.
    pub fn is_active(&self) -> bool {
        !self.search_query.is_empty() || !self.filters.is_empty() || !self.sort_by.is_empty()
    }

    /// The sort field, if sorting is enabled.
    pub fn sort_field(&self) -> Option<&str> {
        if self.sort_by.is_empty() {
            None
        } else {
            Some(&self.sort_by)
        }
    }

    /// Resets every parameter to its default.
    pub fn clear(&mut self) {
        *self = QueryState::default();
    }
}
