//! Engine configuration.
//!
//! [`EngineConfig`] names the fields the engine reads and the keys it treats
//! specially. Every setting has a default matching the course catalog
//! schema, so a configuration file only needs to list what differs:
//!
//! ```yaml
//! search_fields: [title, description, instructor]
//! duration_buckets:
//!   short_max: 60
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::search::SearchFields;

/// Settings shared by every stage of the query pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fields free-text search looks at, in order.
    pub search_fields: SearchFields,
    /// Filter keys with special meaning.
    pub filter_keys: FilterKeys,
    /// Boolean item field read by the price filter.
    pub price_flag_field: String,
    /// Numeric item field read by the duration filter.
    pub duration_field: String,
    /// Bounds of the duration buckets.
    pub duration_buckets: DurationBuckets,
    /// Level filter value meaning "no restriction".
    pub all_sentinel: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            search_fields: SearchFields::default(),
            filter_keys: FilterKeys::default(),
            price_flag_field: "isFree".to_string(),
            duration_field: "totalDuration".to_string(),
            duration_buckets: DurationBuckets::default(),
            all_sentinel: "ALL".to_string(),
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration with the given search fields.
    pub fn new(search_fields: impl Into<SearchFields>) -> Self {
        EngineConfig {
            search_fields: search_fields.into(),
            ..EngineConfig::default()
        }
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.duration_buckets.validate()
    }
}

/// Names of the filter keys that select a special predicate.
///
/// Any key not listed here is matched by plain equality against the item
/// field of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterKeys {
    /// Key of the free/paid filter.
    pub price: String,
    /// Key of the duration bucket filter.
    pub duration: String,
    /// Key of the level filter, which honors the "all" sentinel.
    pub level: String,
}

impl Default for FilterKeys {
    fn default() -> Self {
        FilterKeys {
            price: "price".to_string(),
            duration: "duration".to_string(),
            level: "level".to_string(),
        }
    }
}

/// Upper bounds (inclusive) of the short and medium duration buckets.
///
/// `short`: `d <= short_max`; `medium`: `short_max < d <= medium_max`;
/// `long`: `d > medium_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationBuckets {
    pub short_max: f64,
    pub medium_max: f64,
}

impl Default for DurationBuckets {
    fn default() -> Self {
        DurationBuckets {
            short_max: 120.0,
            medium_max: 600.0,
        }
    }
}

impl DurationBuckets {
    /// Fails unless `short_max <= medium_max` (NaN bounds fail too).
    pub fn validate(&self) -> Result<()> {
        if self.short_max <= self.medium_max {
            Ok(())
        } else {
            Err(QueryError::InvalidDurationBuckets {
                short_max: self.short_max,
                medium_max: self.medium_max,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalog_schema() {
        let config = EngineConfig::default();
        assert_eq!(config.price_flag_field, "isFree");
        assert_eq!(config.duration_field, "totalDuration");
        assert_eq!(config.all_sentinel, "ALL");
        assert_eq!(config.filter_keys.price, "price");
        assert_eq!(config.duration_buckets.short_max, 120.0);
        assert_eq!(config.duration_buckets.medium_max, 600.0);
        assert!(config.search_fields.is_empty());
    }

    #[test]
    fn yaml_overrides_only_listed_settings() {
        let config = EngineConfig::from_yaml_str(
            "search_fields: [title, instructor]\nduration_buckets:\n  short_max: 60\n",
        )
        .unwrap();

        assert_eq!(
            config.search_fields.iter().collect::<Vec<_>>(),
            vec!["title", "instructor"]
        );
        assert_eq!(config.duration_buckets.short_max, 60.0);
        assert_eq!(config.duration_buckets.medium_max, 600.0);
        assert_eq!(config.price_flag_field, "isFree");
    }

    #[test]
    fn json_config() {
        let config =
            EngineConfig::from_json_str(r#"{"filter_keys": {"level": "difficulty"}}"#).unwrap();
        assert_eq!(config.filter_keys.level, "difficulty");
        assert_eq!(config.filter_keys.duration, "duration");
    }

    #[test]
    fn inverted_buckets_are_rejected() {
        let err = EngineConfig::from_yaml_str("duration_buckets: {short_max: 700, medium_max: 600}")
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidDurationBuckets { .. }));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = EngineConfig::from_yaml_str("search_fields: {").unwrap_err();
        assert!(matches!(err, QueryError::ConfigYaml(_)));
        assert!(err.to_string().starts_with("invalid YAML configuration"));
    }
}
