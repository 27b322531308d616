//! Duplicate-limit filter — cap how many live values share one string
//!
//! Occupancy counts duplicates beyond the first holder: the first value to
//! claim a string is recorded with occupancy 0, and every further holder
//! adds one until the ceiling is reached. `duplicate` has no first-holder
//! exemption, so cloning an unseen string already counts against the limit.

use super::{AssignCommit, Commit, Filter};
use crate::error::{GuardError, Result};
use parking_lot::ReentrantMutex;
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;

/// Stateful filter limiting duplicates of each candidate string
///
/// The occupancy map sits behind a reentrant lock held across the whole
/// call, continuation included, so the check-then-update sequence is atomic
/// between threads. The map itself is never borrowed while the continuation
/// runs, so the same instance may appear more than once in a chain. A nested
/// call sees the state from before the outer call and the outer call records
/// the occupancy it computed on entry.
pub struct DuplicateLimit {
    /// candidate → occupancy
    occupancy: ReentrantMutex<RefCell<HashMap<String, usize>>>,
    limit: usize,
}

impl DuplicateLimit {
    /// Create a filter allowing `limit` duplicates beyond the first holder
    pub fn new(limit: usize) -> Self {
        Self {
            occupancy: ReentrantMutex::new(RefCell::new(HashMap::new())),
            limit,
        }
    }

    /// Get the configured ceiling
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Current occupancy for a candidate, `None` if it has never been seen
    /// or has been released
    pub fn occupancy(&self, candidate: &str) -> Result<Option<usize>> {
        Self::current(&self.occupancy.lock(), candidate)
    }

    fn borrow_mut<'a>(
        cell: &'a RefCell<HashMap<String, usize>>,
    ) -> Result<RefMut<'a, HashMap<String, usize>>> {
        cell.try_borrow_mut().map_err(|e| GuardError::StateUnavailable(e.to_string()))
    }

    fn current(cell: &RefCell<HashMap<String, usize>>, candidate: &str) -> Result<Option<usize>> {
        let map = cell
            .try_borrow()
            .map_err(|e| GuardError::StateUnavailable(e.to_string()))?;
        Ok(map.get(candidate).copied())
    }

    fn reached(&self, candidate: &str) -> GuardError {
        tracing::debug!(candidate, limit = self.limit, "Duplicate limit reached");
        GuardError::DuplicateLimitReached {
            candidate: candidate.to_string(),
            limit: self.limit,
        }
    }

    /// Occupancy to record once the continuation succeeds, or `None` when
    /// the candidate must be rejected
    fn admit(&self, current: Option<usize>) -> Option<usize> {
        match current {
            None => Some(0),
            Some(count) if count < self.limit => Some(count + 1),
            Some(_) => None,
        }
    }
}

impl Filter for DuplicateLimit {
    fn initialize(&self, candidate: &str, commit: Commit<'_>) -> Result<()> {
        let guard = self.occupancy.lock();
        let next = self
            .admit(Self::current(&guard, candidate)?)
            .ok_or_else(|| self.reached(candidate))?;

        commit(candidate)?;
        Self::borrow_mut(&guard)?.insert(candidate.to_string(), next);
        tracing::trace!(candidate, occupancy = next, "Occupancy updated");
        Ok(())
    }

    fn assign(&self, previous: &str, candidate: &str, commit: AssignCommit<'_>) -> Result<()> {
        let guard = self.occupancy.lock();
        let next = self
            .admit(Self::current(&guard, candidate)?)
            .ok_or_else(|| self.reached(candidate))?;

        commit(previous, candidate)?;
        let mut occupancy = Self::borrow_mut(&guard)?;
        occupancy.insert(candidate.to_string(), next);

        // Release the slot the previous value held
        match occupancy.get_mut(previous) {
            Some(count) if *count > 0 => *count -= 1,
            _ => {
                occupancy.remove(previous);
            }
        }
        tracing::trace!(previous, candidate, occupancy = next, "Occupancy moved");
        Ok(())
    }

    fn duplicate(&self, candidate: &str, commit: Commit<'_>) -> Result<()> {
        let guard = self.occupancy.lock();
        let count = Self::current(&guard, candidate)?.unwrap_or(0);
        if count >= self.limit {
            return Err(self.reached(candidate));
        }

        commit(candidate)?;
        Self::borrow_mut(&guard)?.insert(candidate.to_string(), count + 1);
        tracing::trace!(candidate, occupancy = count + 1, "Occupancy updated");
        Ok(())
    }
}
