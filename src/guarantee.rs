//! Guarded values — strings that have passed their filter
//!
//! A `Guarded` value owns a shared filter handle and the last string that
//! filter accepted. Every mutation goes through the filter protocol: the
//! value hands the filter a continuation that stages the new buffer, and
//! only installs it once the filter reports success.
//!
//! Two buffer policies are provided:
//!
//! - [`Safety`] keeps an independent `String`, copying on every assign,
//!   clone and filter change
//! - [`Shared`] keeps an `Arc<str>`, so clones and filter changes share
//!   one allocation

use crate::error::{GuardError, Result};
use crate::filter::SharedFilter;
use std::fmt;
use std::sync::Arc;

/// Buffer policy for a guarded string
pub trait Storage: AsRef<str> + Sized {
    /// Placeholder held by an uninitialized value
    fn empty() -> Self;

    /// Take ownership of an accepted candidate
    fn adopt(candidate: &str) -> Self;

    /// Produce the buffer for a clone of this value
    fn replicate(&self) -> Self;
}

impl Storage for String {
    fn empty() -> Self {
        String::new()
    }

    fn adopt(candidate: &str) -> Self {
        candidate.to_owned()
    }

    fn replicate(&self) -> Self {
        self.as_str().to_owned()
    }
}

impl Storage for Arc<str> {
    fn empty() -> Self {
        Arc::from("")
    }

    fn adopt(candidate: &str) -> Self {
        Arc::from(candidate)
    }

    fn replicate(&self) -> Self {
        Arc::clone(self)
    }
}

/// Guarded value with an exclusive buffer
pub type Safety = Guarded<String>;

/// Guarded value whose buffer is shared across its clone lineage
pub type Shared = Guarded<Arc<str>>;

/// A string that always satisfies its filter while initialized
///
/// When `is_initialized()` is false the value holds the empty string, which
/// has not been validated.
pub struct Guarded<S: Storage> {
    filter: SharedFilter,
    guaranteed: S,
    initialized: bool,
}

fn uncommitted(candidate: &str) -> GuardError {
    tracing::warn!(candidate, "Filter accepted without invoking its continuation");
    GuardError::Uncommitted(candidate.to_string())
}

impl<S: Storage> Guarded<S> {
    /// Validate `candidate` and wrap it, failing if the filter rejects it
    pub fn make(filter: SharedFilter, candidate: &str) -> Result<Self> {
        let mut adopted = None;
        filter.initialize(candidate, &mut |chk| {
            adopted = Some(S::adopt(chk));
            Ok(())
        })?;

        let guaranteed = adopted.ok_or_else(|| uncommitted(candidate))?;
        Ok(Self {
            filter,
            guaranteed,
            initialized: true,
        })
    }

    /// Validate `candidate` and wrap it, falling back to an uninitialized
    /// value if the filter rejects it
    ///
    /// Check `is_initialized()` before trusting the result.
    pub fn wrap(filter: SharedFilter, candidate: &str) -> Self {
        match Self::make(Arc::clone(&filter), candidate) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(candidate, error = %e, "Wrapped value left uninitialized");
                Self {
                    filter,
                    guaranteed: S::empty(),
                    initialized: false,
                }
            }
        }
    }

    /// Replace the held string with `candidate` if the filter accepts it
    ///
    /// Assigning the string already held succeeds without consulting the
    /// filter. On failure the value is left untouched.
    pub fn assign(&mut self, candidate: &str) -> Result<()> {
        if self.as_str() == candidate {
            return Ok(());
        }

        let mut adopted = None;
        self.filter
            .assign(self.guaranteed.as_ref(), candidate, &mut |_, chk| {
                adopted = Some(S::adopt(chk));
                Ok(())
            })?;

        self.guaranteed = adopted.ok_or_else(|| uncommitted(candidate))?;
        self.initialized = true;
        tracing::debug!(candidate, "Guarded value assigned");
        Ok(())
    }

    /// Clone this value through the filter
    ///
    /// The clone shares the filter and keeps the same initialized flag.
    pub fn try_clone(&self) -> Result<Self> {
        let mut cloned = None;
        self.filter.duplicate(self.as_str(), &mut |_| {
            cloned = Some(self.guaranteed.replicate());
            Ok(())
        })?;

        let guaranteed = cloned.ok_or_else(|| uncommitted(self.as_str()))?;
        Ok(Self {
            filter: Arc::clone(&self.filter),
            guaranteed,
            initialized: self.initialized,
        })
    }

    /// Re-validate the held string against `filter` and bind a copy to it
    ///
    /// The original value is never modified.
    pub fn change_filter(&self, filter: SharedFilter) -> Result<Self> {
        let mut changed = None;
        filter.initialize(self.as_str(), &mut |_| {
            changed = Some(self.guaranteed.replicate());
            Ok(())
        })?;

        let guaranteed = changed.ok_or_else(|| uncommitted(self.as_str()))?;
        Ok(Self {
            filter,
            guaranteed,
            initialized: true,
        })
    }

    /// Whether the held string has been validated
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get the held string
    pub fn as_str(&self) -> &str {
        self.guaranteed.as_ref()
    }

    /// Get the filter guarding this value
    pub fn filter(&self) -> &SharedFilter {
        &self.filter
    }

    /// Consume the value, returning its buffer
    pub fn into_inner(self) -> S {
        self.guaranteed
    }
}

impl Guarded<Arc<str>> {
    /// Whether two values point at the same buffer
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.guaranteed, &other.guaranteed)
    }
}

impl<S: Storage> AsRef<str> for Guarded<S> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<S: Storage> fmt::Display for Guarded<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<S: Storage> fmt::Debug for Guarded<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guarded")
            .field("guaranteed", &self.as_str())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{
        list_filter, regex_filter_from_pattern, validator, AssignCommit, Commit, DuplicateLimit,
        Filter,
    };

    fn colors() -> SharedFilter {
        Arc::new(list_filter(["red", "blue"]))
    }

    fn reject_all() -> SharedFilter {
        Arc::new(validator(|c| Err(GuardError::Rejected(c.to_string()))))
    }

    /// Filter that claims success without committing
    struct Silent;

    impl Filter for Silent {
        fn initialize(&self, _: &str, _: Commit<'_>) -> Result<()> {
            Ok(())
        }

        fn assign(&self, _: &str, _: &str, _: AssignCommit<'_>) -> Result<()> {
            Ok(())
        }

        fn duplicate(&self, _: &str, _: Commit<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_make_holds_candidate() {
        let value = Safety::make(colors(), "red").unwrap();
        assert!(value.is_initialized());
        assert_eq!(value.as_str(), "red");
        assert_eq!(value.to_string(), "red");
    }

    #[test]
    fn test_make_rejected() {
        let err = Safety::make(colors(), "green").unwrap_err();
        assert!(matches!(err, GuardError::NotInList(_)));
    }

    #[test]
    fn test_wrap_rejected_is_uninitialized() {
        let value = Shared::wrap(reject_all(), "anything");
        assert!(!value.is_initialized());
        assert_eq!(value.as_str(), "");
    }

    #[test]
    fn test_wrap_accepted() {
        let value = Shared::wrap(colors(), "blue");
        assert!(value.is_initialized());
        assert_eq!(value.as_str(), "blue");
    }

    #[test]
    fn test_assign_accepted_and_rejected() {
        let mut value = Safety::make(colors(), "red").unwrap();
        value.assign("blue").unwrap();
        assert_eq!(value.as_str(), "blue");

        assert!(value.assign("green").is_err());
        assert_eq!(value.as_str(), "blue");
        assert!(value.is_initialized());
    }

    #[test]
    fn test_assign_same_value_skips_filter() {
        let limit = Arc::new(DuplicateLimit::new(0));
        let mut value = Safety::make(limit.clone(), "x").unwrap();
        // A fresh value of "x" would now be rejected
        assert!(Safety::make(limit.clone(), "x").is_err());
        assert!(value.assign("x").is_ok());
        assert_eq!(limit.occupancy("x").unwrap(), Some(0));
    }

    #[test]
    fn test_assign_initializes_placeholder() {
        let mut value = Safety::wrap(colors(), "green");
        assert!(!value.is_initialized());
        value.assign("red").unwrap();
        assert!(value.is_initialized());
        assert_eq!(value.as_str(), "red");
    }

    #[test]
    fn test_try_clone_keeps_flag_and_filter() {
        let value = Safety::wrap(colors(), "green");
        let cloned = value.try_clone().unwrap();
        assert!(!cloned.is_initialized());
        assert!(Arc::ptr_eq(cloned.filter(), value.filter()));
    }

    #[test]
    fn test_shared_clone_shares_buffer() {
        let value = Shared::make(colors(), "red").unwrap();
        let cloned = value.try_clone().unwrap();
        assert!(value.shares_buffer_with(&cloned));

        let mut reassigned = cloned.try_clone().unwrap();
        reassigned.assign("blue").unwrap();
        assert!(!value.shares_buffer_with(&reassigned));
        assert_eq!(value.as_str(), "red");
    }

    #[test]
    fn test_safety_clone_is_independent_copy() {
        let value = Safety::make(colors(), "red").unwrap();
        let cloned = value.try_clone().unwrap();
        assert_ne!(value.as_str().as_ptr(), cloned.as_str().as_ptr());
        assert_eq!(cloned.into_inner(), "red");
    }

    #[test]
    fn test_change_filter() {
        let value = Safety::make(colors(), "red").unwrap();
        let pattern: SharedFilter = Arc::new(regex_filter_from_pattern("[a-z]+").unwrap());
        let changed = value.change_filter(pattern.clone()).unwrap();
        assert!(Arc::ptr_eq(changed.filter(), &pattern));
        assert_eq!(changed.as_str(), "red");

        assert!(value.change_filter(reject_all()).is_err());
        assert_eq!(value.as_str(), "red");
    }

    #[test]
    fn test_change_filter_validates_placeholder() {
        let value = Safety::wrap(colors(), "green");
        let any: SharedFilter = Arc::new(validator(|_| Ok(())));
        let changed = value.change_filter(any).unwrap();
        assert!(changed.is_initialized());
        assert_eq!(changed.as_str(), "");
    }

    #[test]
    fn test_filter_without_commit_is_an_error() {
        let err = Safety::make(Arc::new(Silent), "x").unwrap_err();
        assert!(matches!(err, GuardError::Uncommitted(_)));

        let value = Safety::make(colors(), "red").unwrap();
        let silent: SharedFilter = Arc::new(Silent);
        assert!(matches!(
            value.change_filter(silent.clone()),
            Err(GuardError::Uncommitted(_))
        ));
        assert_eq!(value.as_str(), "red");

        let mut placeholder = Safety::wrap(silent, "blue");
        assert!(!placeholder.is_initialized());
        assert!(matches!(
            placeholder.assign("red"),
            Err(GuardError::Uncommitted(_))
        ));
        assert!(!placeholder.is_initialized());
        assert_eq!(placeholder.as_str(), "");
    }

    #[test]
    fn test_debug_output() {
        let value = Safety::make(colors(), "red").unwrap();
        let debug = format!("{:?}", value);
        assert!(debug.contains("red"));
        assert!(debug.contains("initialized: true"));
    }
}
