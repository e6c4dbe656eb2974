//! The query engine: query state plus the derived visible item list.
//!
//! The visible list is derived lazily and memoized. Every mutator that
//! actually changes something drops the memo, so the next read derives it
//! again; reads and no-op mutations never trigger a derivation.

use std::cell::{Cell, OnceCell};

use crate::config::EngineConfig;
use crate::error::{QueryError, Result};
use crate::filter::{Filter, Filters};
use crate::ordering::{compare_by_field, SortOrder};
use crate::record::Record;
use crate::search::SearchFields;
use crate::state::QueryState;

/// Search, filter and sort over a borrowed item collection.
///
/// The pipeline runs in a fixed order:
///
/// ```text
/// items ─▶ text search ─▶ filters (AND) ─▶ stable sort ─▶ visible items
/// ```
///
/// # Example
///
/// ```
/// use catalog_query::{Filters, QueryEngine, SortOrder};
/// use serde_json::json;
///
/// let courses = vec![
///     json!({"title": "Intro FX", "totalDuration": 90, "isFree": true}),
///     json!({"title": "Advanced FX", "totalDuration": 700, "isFree": false}),
/// ];
///
/// let mut engine = QueryEngine::new(&courses, ["title"]);
/// engine.set_search_query("FX");
/// engine.set_sort_by("totalDuration");
/// engine.set_sort_order(SortOrder::Desc);
///
/// let titles: Vec<_> = engine
///     .visible_items()
///     .iter()
///     .map(|c| c["title"].as_str().unwrap())
///     .collect();
/// assert_eq!(titles, ["Advanced FX", "Intro FX"]);
///
/// engine.set_filters(Filters::new().with("price", "free"));
/// assert_eq!(engine.visible_count(), 1);
/// ```
#[derive(Debug)]
pub struct QueryEngine<'a, T> {
    items: &'a [T],
    config: EngineConfig,
    state: QueryState,
    visible: OnceCell<Vec<usize>>,
    derivations: Cell<u64>,
}

impl<'a> QueryEngine<'a, serde_json::Value> {
    /// Builds an engine over an untyped JSON collection.
    ///
    /// Fails with [`QueryError::NotASequence`] unless `items` is an array.
    pub fn from_json(items: &'a serde_json::Value, config: EngineConfig) -> Result<Self> {
        match items.as_array() {
            Some(array) => QueryEngine::with_config(array, config),
            None => Err(QueryError::NotASequence {
                found: json_type_name(items),
            }),
        }
    }
}

impl<'a, T: Record> QueryEngine<'a, T> {
    /// Creates an engine with the default configuration and the given
    /// search fields.
    pub fn new(items: &'a [T], search_fields: impl Into<SearchFields>) -> Self {
        QueryEngine::from_parts(items, EngineConfig::new(search_fields))
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(items: &'a [T], config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(QueryEngine::from_parts(items, config))
    }

    fn from_parts(items: &'a [T], config: EngineConfig) -> Self {
        QueryEngine {
            items,
            config,
            state: QueryState::default(),
            visible: OnceCell::new(),
            derivations: Cell::new(0),
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn items(&self) -> &'a [T] {
        self.items
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn search_fields(&self) -> &SearchFields {
        &self.config.search_fields
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn search_query(&self) -> &str {
        &self.state.search_query
    }

    pub fn filters(&self) -> &Filters {
        &self.state.filters
    }

    pub fn sort_by(&self) -> &str {
        &self.state.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.state.sort_order
    }

    /// Returns `true` if a search, any filter key, or a sort field is set.
    pub fn has_active_query(&self) -> bool {
        self.state.is_active()
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Replaces the free-text query.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.state.search_query {
            self.state.search_query = query;
            self.invalidate();
        }
    }

    /// Replaces the filter mapping as given; merging is up to the caller
    /// (see [`Filters::merged`]).
    pub fn set_filters(&mut self, filters: Filters) {
        if filters != self.state.filters {
            self.state.filters = filters;
            self.invalidate();
        }
    }

    /// Sets the sort field; an empty name disables sorting.
    pub fn set_sort_by(&mut self, field: impl Into<String>) {
        let field = field.into();
        if field != self.state.sort_by {
            self.state.sort_by = field;
            self.invalidate();
        }
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        if order != self.state.sort_order {
            self.state.sort_order = order;
            self.invalidate();
        }
    }

    /// Replaces the whole state in one step, e.g. to restore a snapshot.
    pub fn set_state(&mut self, state: QueryState) {
        if state != self.state {
            self.state = state;
            self.invalidate();
        }
    }

    /// Resets search, filters, sort field and sort order to their defaults.
    pub fn clear_all(&mut self) {
        self.set_state(QueryState::default());
    }

    /// Points the engine at a different collection.
    ///
    /// Passing the slice the engine already holds is a no-op.
    pub fn set_items(&mut self, items: &'a [T]) {
        if !std::ptr::eq(self.items, items) {
            self.items = items;
            self.invalidate();
        }
    }

    // ========================================================================
    // Derived view
    // ========================================================================

    /// The items that pass the current query, in display order.
    pub fn visible_items(&self) -> Vec<&'a T> {
        let items = self.items;
        self.visible_indices().iter().map(|&i| &items[i]).collect()
    }

    /// Positions in [`items`](Self::items) of the visible items, in display
    /// order.
    pub fn visible_indices(&self) -> &[usize] {
        self.visible.get_or_init(|| self.derive())
    }

    pub fn visible_count(&self) -> usize {
        self.visible_indices().len()
    }

    /// How many times the visible list has been derived.
    pub fn recompute_count(&self) -> u64 {
        self.derivations.get()
    }

    fn invalidate(&mut self) {
        self.visible.take();
    }

    fn derive(&self) -> Vec<usize> {
        self.derivations.set(self.derivations.get() + 1);

        let items = self.items;
        let config = &self.config;

        let mut visible: Vec<usize> = if self.state.search_query.is_empty() {
            (0..items.len()).collect()
        } else {
            let needle = self.state.search_query.to_lowercase();
            (0..items.len())
                .filter(|&i| config.search_fields.matches(&items[i], &needle))
                .collect()
        };
        let searched = visible.len();

        let filters: Vec<Filter> = Filter::compile(&self.state.filters, config)
            .into_iter()
            .filter(|filter| !filter.is_unrestricted())
            .collect();
        if !filters.is_empty() {
            visible.retain(|&i| filters.iter().all(|f| f.matches(&items[i], config)));
        }
        let filtered = visible.len();

        if let Some(field) = self.state.sort_field() {
            let order = self.state.sort_order;
            // `sort_by` is stable: ties keep the filter stage's order.
            visible.sort_by(|&a, &b| compare_by_field(&items[a], &items[b], field, order));
        }

        tracing::debug!(
            total = items.len(),
            searched,
            filtered,
            sort_by = self.state.sort_by.as_str(),
            sort_order = %self.state.sort_order,
            "derived visible items"
        );

        visible
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
