//! Stateless leaf filters built from a single predicate
//!
//! `Validator` turns any `Predicate` into a `Filter`. The regex and
//! allow-list filters are just validators over the predicates defined here.

use super::{AssignCommit, Commit, Filter};
use crate::error::{GuardError, Result};
use regex::Regex;
use std::collections::HashSet;

/// A check from candidate string to pass/fail
pub trait Predicate: Send + Sync {
    /// Return `Ok(())` when the candidate is acceptable
    fn evaluate(&self, candidate: &str) -> Result<()>;
}

impl<F> Predicate for F
where
    F: Fn(&str) -> Result<()> + Send + Sync,
{
    fn evaluate(&self, candidate: &str) -> Result<()> {
        self(candidate)
    }
}

/// Filter wrapping a single predicate
///
/// `initialize` and `assign` run the predicate before committing.
/// `duplicate` always commits: a value that was already guaranteed is
/// assumed to still satisfy a pure predicate.
pub struct Validator<P> {
    predicate: P,
}

impl<P: Predicate> Validator<P> {
    /// Create a validator from a predicate
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }

    /// Get the wrapped predicate
    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    fn evaluate(&self, candidate: &str) -> Result<()> {
        self.predicate.evaluate(candidate).map_err(|e| {
            tracing::debug!(candidate, error = %e, "Candidate rejected");
            e
        })
    }
}

impl<P: Predicate> Filter for Validator<P> {
    fn initialize(&self, candidate: &str, commit: Commit<'_>) -> Result<()> {
        self.evaluate(candidate)?;
        commit(candidate)
    }

    fn assign(&self, previous: &str, candidate: &str, commit: AssignCommit<'_>) -> Result<()> {
        self.evaluate(candidate)?;
        commit(previous, candidate)
    }

    fn duplicate(&self, candidate: &str, commit: Commit<'_>) -> Result<()> {
        commit(candidate)
    }
}

/// Pattern engine behind `RegexMatch`
pub trait PatternMatcher: Send + Sync {
    /// Byte span of the first match, or `None` when nothing matches
    fn find_span(&self, haystack: &str) -> Option<(usize, usize)>;

    /// Source pattern, used in error messages
    fn pattern(&self) -> &str;
}

impl PatternMatcher for Regex {
    fn find_span(&self, haystack: &str) -> Option<(usize, usize)> {
        self.find(haystack).map(|m| (m.start(), m.end()))
    }

    fn pattern(&self) -> &str {
        self.as_str()
    }
}

/// Predicate requiring the first pattern match to cover the whole candidate
pub struct RegexMatch<M = Regex> {
    matcher: M,
}

impl<M: PatternMatcher> RegexMatch<M> {
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }
}

impl<M: PatternMatcher> Predicate for RegexMatch<M> {
    fn evaluate(&self, candidate: &str) -> Result<()> {
        match self.matcher.find_span(candidate) {
            None => Err(GuardError::NoMatch {
                pattern: self.matcher.pattern().to_string(),
                candidate: candidate.to_string(),
            }),
            Some((start, end)) if start != 0 || end != candidate.len() => {
                Err(GuardError::PartialMatch {
                    pattern: self.matcher.pattern().to_string(),
                    candidate: candidate.to_string(),
                    start,
                    end,
                })
            }
            Some(_) => Ok(()),
        }
    }
}

/// Predicate requiring exact membership in a fixed allow-list
#[derive(Debug, Clone, Default)]
pub struct ListMatch {
    allowed: HashSet<String>,
}

impl ListMatch {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.allowed.contains(candidate)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl Predicate for ListMatch {
    fn evaluate(&self, candidate: &str) -> Result<()> {
        if self.contains(candidate) {
            Ok(())
        } else {
            Err(GuardError::NotInList(candidate.to_string()))
        }
    }
}

/// Make a filter from a closure predicate
pub fn validator<F>(predicate: F) -> Validator<F>
where
    F: Fn(&str) -> Result<()> + Send + Sync,
{
    Validator::new(predicate)
}

/// Make a filter accepting candidates the regex matches in full
pub fn regex_filter(regex: Regex) -> Validator<RegexMatch> {
    Validator::new(RegexMatch::new(regex))
}

/// Compile `pattern` and make a full-match regex filter from it
pub fn regex_filter_from_pattern(pattern: &str) -> Result<Validator<RegexMatch>> {
    let regex = Regex::new(pattern).map_err(|e| GuardError::InvalidPattern(e.to_string()))?;
    Ok(regex_filter(regex))
}

/// Make a filter accepting only the listed strings
pub fn list_filter<I, S>(values: I) -> Validator<ListMatch>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Validator::new(ListMatch::new(values))
}
