//! Error types for the catalog-query crate.
//!
//! Query evaluation itself never fails; these errors come from the
//! boundaries: loading configuration, parsing user-facing values, and
//! accepting untyped item collections.

use thiserror::Error;

/// Errors raised at the engine's boundaries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An item collection was expected but something else was supplied.
    #[error("expected a sequence of items, got {found}")]
    NotASequence { found: &'static str },

    /// A sort direction other than `asc` or `desc`.
    #[error("invalid sort order '{0}': expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    /// Duration bucket bounds that do not describe three ordered buckets.
    #[error("invalid duration buckets: short_max ({short_max}) must not exceed medium_max ({medium_max})")]
    InvalidDurationBuckets { short_max: f64, medium_max: f64 },

    /// Configuration could not be parsed as YAML.
    #[error("invalid YAML configuration: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),

    /// Configuration could not be parsed as JSON.
    #[error("invalid JSON configuration: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

/// Result type for catalog-query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
