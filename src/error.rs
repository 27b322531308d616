//! Error types for a3s-guarantee

use thiserror::Error;

/// Errors that can occur while filtering or committing a guarded value
#[derive(Debug, Error)]
pub enum GuardError {
    /// The regular expression found nothing in the candidate
    #[error("No match for pattern '{pattern}' in '{candidate}'")]
    NoMatch { pattern: String, candidate: String },

    /// The regular expression matched, but not across the whole candidate
    #[error("Pattern '{pattern}' matched '{candidate}' only at {start}..{end}")]
    PartialMatch {
        pattern: String,
        candidate: String,
        start: usize,
        end: usize,
    },

    /// Candidate is absent from the allow-list
    #[error("'{0}' is not in the allowed list")]
    NotInList(String),

    /// Occupancy for the candidate is already at the ceiling
    #[error("Duplicate limit reached for '{candidate}' (limit {limit})")]
    DuplicateLimitReached { candidate: String, limit: usize },

    /// Custom predicate rejection
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Regular expression failed to compile
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(String),

    /// A filter reported success without running the commit continuation
    #[error("Filter accepted '{0}' without committing it")]
    Uncommitted(String),

    /// Filter state is already borrowed further up the current call
    #[error("Filter state unavailable: {0}")]
    StateUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for guarded value operations
pub type Result<T> = std::result::Result<T, GuardError>;
