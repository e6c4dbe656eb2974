//! Free-text search stage.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Ordered list of fields eligible for free-text search.
///
/// Fixed when the engine is built; there is no API to change it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchFields(Vec<String>);

impl SearchFields {
    /// Creates a field set from any list of names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchFields(fields.into_iter().map(Into::into).collect())
    }

    /// Iterates the field names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if at least one field of `item` contains `needle`.
    ///
    /// `needle` must already be lower-cased. Fields missing from the item
    /// simply don't match; they don't disqualify it.
    pub fn matches<T: Record + ?Sized>(&self, item: &T, needle: &str) -> bool {
        self.iter().any(|name| {
            item.field(name)
                .search_text()
                .is_some_and(|text| text.to_lowercase().contains(needle))
        })
    }
}

impl<S: Into<String>> FromIterator<S> for SearchFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SearchFields::new(iter)
    }
}

impl From<Vec<String>> for SearchFields {
    fn from(fields: Vec<String>) -> Self {
        SearchFields(fields)
    }
}

impl From<&[&str]> for SearchFields {
    fn from(fields: &[&str]) -> Self {
        SearchFields::new(fields.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for SearchFields {
    fn from(fields: [&str; N]) -> Self {
        SearchFields::new(fields)
    }
}
