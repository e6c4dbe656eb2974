//! Filter selections and the predicates built from them.
//!
//! A presentation layer hands the engine a [`Filters`] mapping of
//! filter key to selected [`FilterValue`]. At derivation time each active
//! entry is classified by [`FilterKind`] and parsed once into a typed
//! [`Filter`]; matching then works on the enum, never on the raw strings.
//!
//! | Kind | Key (default) | Values |
//! |------|---------------|--------|
//! | `Price` | `price` | `free`, `paid`; anything else is no restriction |
//! | `Duration` | `duration` | `short`, `medium`, `long`; anything else is no restriction |
//! | `Level` | `level` | `ALL` is no restriction; other values match by equality |
//! | `Field` | any other key | equality with the item field of the same name |

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DurationBuckets, EngineConfig};
use crate::record::Record;
use crate::value::{Number, Value};

/// A selected filter value, as chosen in a filter control.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Nothing selected.
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl FilterValue {
    /// Whether this value activates its filter.
    ///
    /// Empty text, zero, NaN, `false` and `Null` are inactive.
    pub fn is_truthy(&self) -> bool {
        match self {
            FilterValue::Null => false,
            FilterValue::Bool(b) => *b,
            FilterValue::Number(n) => !n.is_zero() && !n.is_nan(),
            FilterValue::Text(s) => !s.is_empty(),
        }
    }

    /// Extracts the text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Strict equality against an item field.
    ///
    /// Text compares case-sensitively, numbers by numeric value across
    /// representations. A type mismatch or a missing field never matches.
    pub fn equals(&self, field: &Value<'_>) -> bool {
        match (self, field) {
            (FilterValue::Text(expected), Value::String(actual)) => expected.as_str() == *actual,
            (FilterValue::Number(expected), Value::Number(actual)) => {
                actual.compare(*expected) == Some(std::cmp::Ordering::Equal)
            }
            (FilterValue::Bool(expected), Value::Bool(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<Number> for FilterValue {
    fn from(n: Number) -> Self {
        FilterValue::Number(n)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(Number::I64(n))
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Number(Number::from(n))
    }
}

impl From<u64> for FilterValue {
    fn from(n: u64) -> Self {
        FilterValue::Number(Number::U64(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(Number::F64(n))
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Null, Into::into)
    }
}

/// Mapping of filter key to selected value.
///
/// Keys are kept sorted, so iteration order never depends on the order in
/// which selections were made.
///
/// ```
/// use catalog_query::Filters;
///
/// let filters = Filters::new().with("price", "free").with("duration", "short");
/// let narrowed = filters.merged(&Filters::new().with("duration", "long"));
/// assert_eq!(narrowed.get("duration").and_then(|v| v.as_text()), Some("long"));
/// assert_eq!(narrowed.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, FilterValue>);

impl Filters {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Filters::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets `key`, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Option<FilterValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys, active or not.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FilterValue> {
        self.0.iter()
    }

    /// Entries whose value is truthy.
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0
            .iter()
            .filter(|(_, value)| value.is_truthy())
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns a copy with `updates` layered on top; keys in `updates` win.
    pub fn merged(&self, updates: &Filters) -> Filters {
        let mut merged = self.clone();
        merged
            .0
            .extend(updates.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Filters(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Filters {
    type Item = (&'a String, &'a FilterValue);
    type IntoIter = btree_map::Iter<'a, String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Classification of a filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Free/paid selection over the price flag field.
    Price,
    /// Bucketed selection over the duration field.
    Duration,
    /// Equality with an "all" sentinel.
    Level,
    /// Plain equality with the same-named field.
    Field,
}

impl FilterKind {
    /// Classifies `key` against the configured special keys.
    pub fn classify(key: &str, config: &EngineConfig) -> Self {
        let keys = &config.filter_keys;
        if key == keys.price {
            FilterKind::Price
        } else if key == keys.duration {
            FilterKind::Duration
        } else if key == keys.level {
            FilterKind::Level
        } else {
            FilterKind::Field
        }
    }
}

/// Price selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceChoice {
    Free,
    Paid,
    /// Unrecognized value; no restriction.
    Any,
}

impl PriceChoice {
    fn parse(value: &FilterValue) -> Self {
        match value.as_text() {
            Some("free") => PriceChoice::Free,
            Some("paid") => PriceChoice::Paid,
            _ => {
                tracing::trace!(?value, "unrecognized price filter value, not restricting");
                PriceChoice::Any
            }
        }
    }

    /// Whether an item with the given free flag passes. A missing flag
    /// counts as not free.
    pub fn admits(self, is_free: bool) -> bool {
        match self {
            PriceChoice::Free => is_free,
            PriceChoice::Paid => !is_free,
            PriceChoice::Any => true,
        }
    }
}

/// Duration bucket selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
    /// Unrecognized value; no restriction.
    Any,
}

impl DurationBucket {
    fn parse(value: &FilterValue) -> Self {
        match value.as_text() {
            Some("short") => DurationBucket::Short,
            Some("medium") => DurationBucket::Medium,
            Some("long") => DurationBucket::Long,
            _ => {
                tracing::trace!(?value, "unrecognized duration filter value, not restricting");
                DurationBucket::Any
            }
        }
    }

    /// Whether `duration` falls in this bucket.
    pub fn contains(self, duration: f64, bounds: &DurationBuckets) -> bool {
        match self {
            DurationBucket::Short => duration <= bounds.short_max,
            DurationBucket::Medium => duration > bounds.short_max && duration <= bounds.medium_max,
            DurationBucket::Long => duration > bounds.medium_max,
            DurationBucket::Any => true,
        }
    }
}

/// Level selection.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelChoice {
    /// The "all" sentinel; no restriction.
    All,
    /// Items whose level field equals this value.
    Only(FilterValue),
}

/// A parsed, typed filter predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Price(PriceChoice),
    Duration(DurationBucket),
    Level { field: String, choice: LevelChoice },
    Equals { field: String, value: FilterValue },
}

impl Filter {
    /// Builds the predicate for one filter entry.
    ///
    /// Returns `None` when the value is falsy, i.e. the filter is inactive.
    pub fn from_entry(key: &str, value: &FilterValue, config: &EngineConfig) -> Option<Filter> {
        if !value.is_truthy() {
            return None;
        }

        let filter = match FilterKind::classify(key, config) {
            FilterKind::Price => Filter::Price(PriceChoice::parse(value)),
            FilterKind::Duration => Filter::Duration(DurationBucket::parse(value)),
            FilterKind::Level => {
                let choice = if value.as_text() == Some(config.all_sentinel.as_str()) {
                    LevelChoice::All
                } else {
                    LevelChoice::Only(value.clone())
                };
                Filter::Level {
                    field: key.to_string(),
                    choice,
                }
            }
            FilterKind::Field => Filter::Equals {
                field: key.to_string(),
                value: value.clone(),
            },
        };
        Some(filter)
    }

    /// Parses every active entry of `filters`.
    pub fn compile(filters: &Filters, config: &EngineConfig) -> Vec<Filter> {
        filters
            .iter()
            .filter_map(|(key, value)| Filter::from_entry(key, value, config))
            .collect()
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Price(_) => FilterKind::Price,
            Filter::Duration(_) => FilterKind::Duration,
            Filter::Level { .. } => FilterKind::Level,
            Filter::Equals { .. } => FilterKind::Field,
        }
    }

    /// Returns `true` if this predicate can never exclude an item.
    pub fn is_unrestricted(&self) -> bool {
        matches!(
            self,
            Filter::Price(PriceChoice::Any)
                | Filter::Duration(DurationBucket::Any)
                | Filter::Level {
                    choice: LevelChoice::All,
                    ..
                }
        )
    }

    /// Evaluates this predicate against an item.
    pub fn matches<T: Record + ?Sized>(&self, item: &T, config: &EngineConfig) -> bool {
        match self {
            Filter::Price(choice) => {
                let is_free = item
                    .field(&config.price_flag_field)
                    .as_bool()
                    .unwrap_or(false);
                choice.admits(is_free)
            }
            Filter::Duration(bucket) => {
                let duration = item
                    .field(&config.duration_field)
                    .as_number()
                    .map_or(0.0, Number::to_f64);
                bucket.contains(duration, &config.duration_buckets)
            }
            Filter::Level { field, choice } => match choice {
                LevelChoice::All => true,
                LevelChoice::Only(value) => value.equals(&item.field(field)),
            },
            Filter::Equals { field, value } => value.equals(&item.field(field)),
        }
    }
}
