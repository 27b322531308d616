//! Composite filter — every filter in an ordered list must approve
//!
//! Filter `i` receives a continuation that invokes filter `i + 1`, and the
//! last filter receives the caller's continuation. The chain is walked by a
//! single recursive function per operation carrying the next index, so a
//! rejection at `i` means nothing past `i` ever runs.

use super::{AssignCommit, Commit, Filter, SharedFilter};
use crate::error::Result;

/// Ordered conjunction of filters
pub struct Composite {
    filters: Vec<SharedFilter>,
}

impl Composite {
    /// Create a composite applying `filters` in the given order
    pub fn new(filters: Vec<SharedFilter>) -> Self {
        Self { filters }
    }

    /// Get the filters in application order
    pub fn filters(&self) -> &[SharedFilter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    fn initialize_from(&self, next: usize, candidate: &str, commit: Commit<'_>) -> Result<()> {
        match self.filters.get(next) {
            Some(filter) => filter.initialize(candidate, &mut |chk| {
                self.initialize_from(next + 1, chk, &mut *commit)
            }),
            None => commit(candidate),
        }
    }

    fn assign_from(
        &self,
        next: usize,
        previous: &str,
        candidate: &str,
        commit: AssignCommit<'_>,
    ) -> Result<()> {
        match self.filters.get(next) {
            Some(filter) => filter.assign(previous, candidate, &mut |prev, chk| {
                self.assign_from(next + 1, prev, chk, &mut *commit)
            }),
            None => commit(previous, candidate),
        }
    }

    fn duplicate_from(&self, next: usize, candidate: &str, commit: Commit<'_>) -> Result<()> {
        match self.filters.get(next) {
            Some(filter) => filter.duplicate(candidate, &mut |chk| {
                self.duplicate_from(next + 1, chk, &mut *commit)
            }),
            None => commit(candidate),
        }
    }
}

impl FromIterator<SharedFilter> for Composite {
    fn from_iter<I: IntoIterator<Item = SharedFilter>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Filter for Composite {
    fn initialize(&self, candidate: &str, commit: Commit<'_>) -> Result<()> {
        self.initialize_from(0, candidate, commit)
    }

    fn assign(&self, previous: &str, candidate: &str, commit: AssignCommit<'_>) -> Result<()> {
        self.assign_from(0, previous, candidate, commit)
    }

    fn duplicate(&self, candidate: &str, commit: Commit<'_>) -> Result<()> {
        self.duplicate_from(0, candidate, commit)
    }
}
