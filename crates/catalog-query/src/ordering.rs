//! Sort direction and field comparison.
//!
//! [`compare_values`] is a total order over [`Value`]s, so a stable sort over
//! any catalog, however inconsistent its field types, is well defined.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortOrder {
    /// Applies this direction to an ordering.
    ///
    /// `Desc` reverses the comparison, so `Equal` stays `Equal` and a stable
    /// sort keeps ties in their original order in both directions.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(QueryError::InvalidSortOrder(s.to_string()))
        }
    }
}

/// Compares two field values in ascending order.
///
/// - missing values sort before everything else
/// - strings compare case-insensitively
/// - numbers compare numerically across representations, NaN included
/// - timestamps and booleans use their natural order
/// - values of different types are ordered by type:
///   bool < number < timestamp < string
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Less,
        (_, Value::None) => Ordering::Greater,

        (Value::String(a), Value::String(b)) => compare_caseless(a, b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),

        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compares two records by one field, in the given direction.
pub fn compare_by_field<T: Record + ?Sized>(
    a: &T,
    b: &T,
    field: &str,
    order: SortOrder,
) -> Ordering {
    order.apply(compare_values(&a.field(field), &b.field(field)))
}

fn compare_caseless(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn type_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::None => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Timestamp(_) => 3,
        Value::String(_) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    #[test]
    fn sort_order_apply() {
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn sort_order_parse_and_display() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!(matches!(
            "sideways".parse::<SortOrder>(),
            Err(QueryError::InvalidSortOrder(s)) if s == "sideways"
        ));
        assert_eq!(SortOrder::Desc.to_string(), "desc");
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }

    #[test]
    fn strings_compare_case_insensitively() {
        let a = Value::String("apple");
        let b = Value::String("Banana");
        assert_eq!(compare_values(&a, &b), Ordering::Less);
        assert_eq!(
            compare_values(&Value::String("FX"), &Value::String("fx")),
            Ordering::Equal
        );
    }

    #[test]
    fn numbers_compare_numerically() {
        let a = Value::Number(Number::I64(90));
        let b = Value::Number(Number::F64(700.0));
        assert_eq!(compare_values(&a, &b), Ordering::Less);

        let nan = Value::Number(Number::F64(f64::NAN));
        assert_eq!(compare_values(&nan, &nan), Ordering::Equal);
    }

    #[test]
    fn equal_numbers_tie_across_representations() {
        let int = Value::Number(Number::U64(120));
        let float = Value::Number(Number::F64(120.0));
        assert_eq!(compare_values(&int, &float), Ordering::Equal);
        assert_eq!(compare_values(&float, &int), Ordering::Equal);

        let zero = Value::Number(Number::F64(0.0));
        let neg_zero = Value::Number(Number::F64(-0.0));
        assert_eq!(compare_values(&neg_zero, &zero), Ordering::Equal);
        assert_eq!(SortOrder::Desc.apply(compare_values(&zero, &neg_zero)), Ordering::Equal);
    }

    #[test]
    fn timestamps_and_bools() {
        assert_eq!(
            compare_values(
                &Value::Timestamp(Timestamp(1000)),
                &Value::Timestamp(Timestamp(2000))
            ),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Bool(false), &Value::Bool(true)),
            Ordering::Less
        );
    }

    #[test]
    fn missing_values_sort_first() {
        let none = Value::None;
        let some = Value::Number(Number::I64(-5));
        assert_eq!(compare_values(&none, &some), Ordering::Less);
        assert_eq!(compare_values(&some, &none), Ordering::Greater);
        assert_eq!(compare_values(&none, &none), Ordering::Equal);
    }

    #[test]
    fn mixed_types_order_by_type() {
        let s = Value::String("5");
        let n = Value::Number(Number::I64(10));
        let b = Value::Bool(true);
        assert_eq!(compare_values(&n, &s), Ordering::Less);
        assert_eq!(compare_values(&s, &n), Ordering::Greater);
        assert_eq!(compare_values(&b, &n), Ordering::Less);
    }

    #[test]
    fn desc_inverts_field_comparison() {
        let short = serde_json::json!({"totalDuration": 90});
        let long = serde_json::json!({"totalDuration": 700});
        assert_eq!(
            compare_by_field(&short, &long, "totalDuration", SortOrder::Asc),
            Ordering::Less
        );
        assert_eq!(
            compare_by_field(&short, &long, "totalDuration", SortOrder::Desc),
            Ordering::Greater
        );
    }
}
