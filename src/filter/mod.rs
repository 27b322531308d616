//! Filter protocol — the capability every validation rule implements
//!
//! A filter never mutates a guarded value itself. Instead the caller hands it
//! a commit continuation that performs the mutation, and the filter invokes
//! that continuation exactly once if (and only if) the candidate is accepted.
//! Filters that keep bookkeeping (see [`DuplicateLimit`]) update it only after
//! the continuation has succeeded, so a rejected attempt leaves no trace.

use crate::error::{GuardError, Result};
use std::sync::Arc;

pub mod composite;
pub mod duplicate;
pub mod validator;

pub use composite::Composite;
pub use duplicate::DuplicateLimit;
pub use validator::{
    list_filter, regex_filter, regex_filter_from_pattern, validator, ListMatch, PatternMatcher,
    Predicate, RegexMatch, Validator,
};

/// Continuation used by `initialize` and `duplicate`: receives the accepted candidate
pub type Commit<'a> = &'a mut dyn FnMut(&str) -> Result<()>;

/// Continuation used by `assign`: receives the previous value and the accepted candidate
pub type AssignCommit<'a> = &'a mut dyn FnMut(&str, &str) -> Result<()>;

/// Shared handle to a filter
///
/// Filters may carry state that spans every guarded value created from them,
/// so they are always passed around behind an `Arc`.
pub type SharedFilter = Arc<dyn Filter>;

/// Core trait for validation rules
///
/// On success the supplied continuation has been invoked exactly once and its
/// result propagated. On failure it has not been invoked at all.
pub trait Filter: Send + Sync {
    /// Admit a brand-new value
    fn initialize(&self, candidate: &str, commit: Commit<'_>) -> Result<()>;

    /// Replace `previous` with `candidate`
    ///
    /// Stateless filters ignore `previous`; bookkeeping filters use it to
    /// release whatever the old value was holding.
    fn assign(&self, previous: &str, candidate: &str, commit: AssignCommit<'_>) -> Result<()>;

    /// Admit a copy of an already-guaranteed value
    fn duplicate(&self, candidate: &str, commit: Commit<'_>) -> Result<()>;
}

/// Check whether `candidate` would pass `filter` without committing anything
///
/// The continuation records the pass and then aborts the operation, so
/// stateful filters roll nothing forward.
pub fn check(filter: &dyn Filter, candidate: &str) -> bool {
    let mut passed = false;
    let _ = filter.initialize(candidate, &mut |_| {
        passed = true;
        Err(GuardError::Rejected("dry run".to_string()))
    });
    passed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes_without_side_effects() {
        let limit = DuplicateLimit::new(0);
        assert!(check(&limit, "abc"));
        assert!(check(&limit, "abc"));
        assert_eq!(limit.occupancy("abc").unwrap(), None);
    }

    #[test]
    fn test_check_reports_rejection() {
        let filter = list_filter(["red", "blue"]);
        assert!(check(&filter, "red"));
        assert!(!check(&filter, "green"));
    }

    #[test]
    fn test_check_through_composite() {
        let filter = Composite::new(vec![
            Arc::new(regex_filter_from_pattern("^[a-z]+$").unwrap()) as SharedFilter,
            Arc::new(list_filter(["abc"])),
        ]);
        assert!(check(&filter, "abc"));
        assert!(!check(&filter, "abd"));
        assert!(!check(&filter, "ABC"));
    }
}
