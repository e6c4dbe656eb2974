//! Catalog query - in-memory search, filter and sort for catalog list views.
//!
//! The engine owns a list view's query state (search text, filter
//! selections, sort field and direction) and derives the visible items from
//! a borrowed collection of records. It supports:
//!
//! - Case-insensitive substring search across a fixed set of fields
//! - Filters combined with AND, including price and duration buckets
//! - Stable sorting by any field, ascending or descending
//! - Memoized derivation that is never stale
//!
//! # Quick Start
//!
//! ```rust
//! use catalog_query::{Filters, QueryEngine, SortOrder};
//! use serde_json::json;
//!
//! let courses = vec![
//!     json!({"title": "Intro FX", "totalDuration": 90, "isFree": true, "level": "BEGINNER"}),
//!     json!({"title": "Advanced FX", "totalDuration": 700, "isFree": false, "level": "ADVANCED"}),
//! ];
//!
//! let mut engine = QueryEngine::new(&courses, ["title"]);
//! engine.set_search_query("fx");
//! engine.set_filters(Filters::new().with("duration", "long"));
//!
//! let visible = engine.visible_items();
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0]["title"], "Advanced FX");
//!
//! engine.clear_all();
//! assert!(!engine.has_active_query());
//! ```
//!
//! # Pipeline
//!
//! ```text
//! visible = sort(filter(search(items)))
//! ```
//!
//! - **Search**: skipped for an empty query; otherwise an item passes if any
//!   search field contains the lower-cased query.
//! - **Filter**: every filter entry with a truthy value must pass; see
//!   [`Filter`] for the recognized kinds.
//! - **Sort**: skipped for an empty sort field; otherwise a stable sort using
//!   [`compare_values`], inverted for [`SortOrder::Desc`].
//!
//! # Records
//!
//! Items are any type implementing [`Record`]. JSON values and string-keyed
//! maps work out of the box; structs can use `#[derive(Record)]` (enabled by
//! the default `derive` feature).

mod config;
mod engine;
mod error;
mod filter;
mod ordering;
mod record;
mod search;
mod state;
mod value;

// Re-export public API
pub use config::{DurationBuckets, EngineConfig, FilterKeys};
pub use engine::QueryEngine;
pub use error::{QueryError, Result};
pub use filter::{
    DurationBucket, Filter, FilterKind, FilterValue, Filters, LevelChoice, PriceChoice,
};
pub use ordering::{compare_by_field, compare_values, SortOrder};
pub use record::{AsFieldValue, Record, RecordLabel, RecordTimestamp};
pub use search::SearchFields;
pub use state::QueryState;
pub use value::{Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use catalog_query_macros::Record;
