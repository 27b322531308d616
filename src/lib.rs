//! # a3s-guarantee
//!
//! Guarded string values backed by composable validation filters for the A3S ecosystem.
//!
//! ## Overview
//!
//! `a3s-guarantee` wraps a raw string in a container that only ever holds
//! values its filter has accepted. Filters share one protocol: the container
//! passes a commit continuation, and the filter runs it exactly once when the
//! candidate passes, never when it fails. Filters compose in order, so a
//! pipeline such as "duplicate limit, then regex" is itself a filter.
//!
//! ## Quick Start
//!
//! ```rust
//! use a3s_guarantee::{list_filter, Safety, SharedFilter};
//! use std::sync::Arc;
//!
//! # fn example() -> a3s_guarantee::Result<()> {
//! let colors: SharedFilter = Arc::new(list_filter(["red", "blue"]));
//!
//! let mut color = Safety::make(colors, "red")?;
//! color.assign("blue")?;
//! assert!(color.assign("green").is_err());
//! assert_eq!(color.as_str(), "blue");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Filters
//!
//! - **Validator** — wraps a single predicate; regex and list filters are validators
//! - **DuplicateLimit** — caps live duplicates of the same string
//! - **Composite** — ordered conjunction of filters, short-circuiting on the first rejection
//!
//! ## Architecture
//!
//! - **Filter** trait — `initialize`, `assign`, `duplicate`, each taking a commit continuation
//! - **SharedFilter** — `Arc<dyn Filter>` handle shared by every value built from it
//! - **Guarded** — the container, with `Safety` (exclusive buffer) and `Shared`
//!   (shared buffer) flavors
//! - **FilterConfig** — serde description of a pipeline

pub mod config;
pub mod error;
pub mod filter;
pub mod guarantee;

// Re-export core types
pub use config::FilterConfig;
pub use error::{GuardError, Result};
pub use filter::{
    check, list_filter, regex_filter, regex_filter_from_pattern, validator, AssignCommit, Commit,
    Composite, DuplicateLimit, Filter, ListMatch, PatternMatcher, Predicate, RegexMatch,
    SharedFilter, Validator,
};
pub use guarantee::{Guarded, Safety, Shared, Storage};
