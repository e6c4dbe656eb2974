//! Field access for catalog records.
//!
//! The engine treats items as opaque: everything it knows about a record
//! comes through [`Record::field`]. Implementations are provided for JSON
//! objects and string-keyed maps; structs usually get one from
//! `#[derive(Record)]`.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::{Number, Timestamp, Value};

/// Trait for types that can be searched, filtered and sorted by the engine.
///
/// This trait is typically derived using `#[derive(Record)]`, but can also be
/// implemented manually.
///
/// # Derive Usage
///
/// ```ignore
/// use catalog_query::Record;
///
/// #[derive(Record)]
/// struct Course {
///     #[record(String)]
///     title: String,
///     #[record(Number, rename = "totalDuration")]
///     total_duration: u32,
///     #[record(Bool, rename = "isFree")]
///     is_free: bool,
/// }
/// ```
///
/// # Manual Implementation
///
/// ```
/// use catalog_query::{Number, Record, Value};
///
/// struct Course {
///     title: String,
///     total_duration: u32,
/// }
///
/// impl Record for Course {
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "title" => Value::String(&self.title),
///             "totalDuration" => Value::Number(Number::from(self.total_duration)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] if the record has no
    /// such field.
    fn field(&self, name: &str) -> Value<'_>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, name: &str) -> Value<'_> {
        (**self).field(name)
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn field(&self, name: &str) -> Value<'_> {
        (**self).field(name)
    }
}

/// JSON objects expose their members; any other JSON value has no fields.
impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Value<'_> {
        match self {
            serde_json::Value::Object(map) => map.field(name),
            _ => Value::None,
        }
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::None, AsFieldValue::as_field_value)
    }
}

impl<V: AsFieldValue> Record for BTreeMap<String, V> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::None, AsFieldValue::as_field_value)
    }
}

impl<V: AsFieldValue, S: BuildHasher> Record for HashMap<String, V, S> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::None, AsFieldValue::as_field_value)
    }
}

/// Conversion of an owned field into a borrowed [`Value`].
///
/// Used by the map-backed [`Record`] implementations.
pub trait AsFieldValue {
    /// Borrows this value as a [`Value`].
    fn as_field_value(&self) -> Value<'_>;
}

impl AsFieldValue for serde_json::Value {
    fn as_field_value(&self) -> Value<'_> {
        match self {
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Number(n) => Value::Number(Number::from(n)),
            serde_json::Value::Bool(b) => Value::Bool(*b),
            // Nested structures are not addressable by a flat field name.
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => Value::None,
        }
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsFieldValue for &str {
    fn as_field_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl AsFieldValue for bool {
    fn as_field_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AsFieldValue for Number {
    fn as_field_value(&self) -> Value<'_> {
        Value::Number(*self)
    }
}

impl AsFieldValue for Timestamp {
    fn as_field_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::None, AsFieldValue::as_field_value)
    }
}

macro_rules! numeric_field_value {
    ($($ty:ty),+) => {
        $(
            impl AsFieldValue for $ty {
                fn as_field_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )+
    };
}

numeric_field_value!(i32, i64, u32, u64, usize, f32, f64);

/// Helper trait for exposing enum-like fields as text.
///
/// Used by `#[derive(Record)]` for fields marked `#[record(Label)]`, so a
/// typed enum compares equal to its textual filter value.
///
/// ```
/// use catalog_query::RecordLabel;
///
/// enum Level {
///     Beginner,
///     Advanced,
/// }
///
/// impl RecordLabel for Level {
///     fn record_label(&self) -> &str {
///         match self {
///             Level::Beginner => "BEGINNER",
///             Level::Advanced => "ADVANCED",
///         }
///     }
/// }
/// ```
pub trait RecordLabel {
    /// Returns the text this value is searched, filtered and sorted by.
    fn record_label(&self) -> &str;
}

/// Helper trait for converting date-like fields to timestamps.
///
/// Used by `#[derive(Record)]` for fields marked `#[record(Timestamp)]`.
pub trait RecordTimestamp {
    /// Converts this value to a [`Timestamp`] for comparison.
    fn record_timestamp(&self) -> Timestamp;
}

impl RecordTimestamp for i64 {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl RecordTimestamp for u64 {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl RecordTimestamp for Timestamp {
    fn record_timestamp(&self) -> Timestamp {
        *self
    }
}

impl RecordTimestamp for SystemTime {
    fn record_timestamp(&self) -> Timestamp {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => Timestamp(i64::try_from(after.as_millis()).unwrap_or(i64::MAX)),
            Err(before) => Timestamp(
                i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
            ),
        }
    }
}
