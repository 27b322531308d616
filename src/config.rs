//! Declarative filter configuration
//!
//! A `FilterConfig` describes a pipeline in data form (typically JSON) and
//! builds the corresponding `SharedFilter`. Every call to `build()` creates
//! fresh filter state, so two builds of the same duplicate-limit config do
//! not share occupancy.

use crate::error::{GuardError, Result};
use crate::filter::{
    list_filter, regex_filter_from_pattern, Composite, DuplicateLimit, SharedFilter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Description of a filter pipeline
///
/// ```json
/// {
///   "kind": "composite",
///   "filters": [
///     { "kind": "duplicateLimit", "limit": 1 },
///     { "kind": "regex", "pattern": "[a-z_]+" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilterConfig {
    /// Full-string regular expression match
    Regex { pattern: String },

    /// Exact membership in a fixed list
    List { values: Vec<String> },

    /// Cap on duplicates of the same string beyond the first holder
    DuplicateLimit { limit: usize },

    /// Ordered conjunction of nested filters
    Composite { filters: Vec<FilterConfig> },
}

impl FilterConfig {
    /// Parse a config from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Short name of this filter kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Regex { .. } => "regex",
            Self::List { .. } => "list",
            Self::DuplicateLimit { .. } => "duplicateLimit",
            Self::Composite { .. } => "composite",
        }
    }

    /// Build the described filter
    pub fn build(&self) -> Result<SharedFilter> {
        let filter: SharedFilter = match self {
            Self::Regex { pattern } => Arc::new(regex_filter_from_pattern(pattern)?),
            Self::List { values } => {
                if values.is_empty() {
                    return Err(GuardError::Config(
                        "List filter requires at least one value".to_string(),
                    ));
                }
                Arc::new(list_filter(values.iter().cloned()))
            }
            Self::DuplicateLimit { limit } => Arc::new(DuplicateLimit::new(*limit)),
            Self::Composite { filters } => Arc::new(
                filters
                    .iter()
                    .map(FilterConfig::build)
                    .collect::<Result<Composite>>()?,
            ),
        };

        tracing::debug!(kind = self.kind(), "Filter built");
        Ok(filter)
    }
}
