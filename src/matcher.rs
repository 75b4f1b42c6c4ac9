//! Token matcher
//!
//! A `Matcher` holds one match rule: an ordered list of global patterns
//! and an insertion-ordered table of attribute patterns. Evaluation stops
//! at the first pattern that is not satisfied.

use crate::pattern::{AttrPattern, GlobalPattern};
use crate::token::Token;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

/// Error during matching
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),
}

/// A built match rule
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matcher {
    global_patterns: Vec<GlobalPattern>,
    attr_patterns: IndexMap<String, AttrPattern>,
}

impl Matcher {
    /// Create a matcher from global and attribute patterns
    ///
    /// Patterns are stored as given; nothing is checked until match time.
    pub fn new<I, K>(global_patterns: Vec<GlobalPattern>, attr_patterns: I) -> Self
    where
        I: IntoIterator<Item = (K, AttrPattern)>,
        K: Into<String>,
    {
        Self {
            global_patterns,
            attr_patterns: attr_patterns
                .into_iter()
                .map(|(name, pat)| (name.into(), pat))
                .collect(),
        }
    }

    /// Append a global pattern
    pub fn global(mut self, pattern: impl Into<GlobalPattern>) -> Self {
        self.global_patterns.push(pattern.into());
        self
    }

    /// Add an attribute pattern
    ///
    /// Re-adding a name replaces its pattern but keeps its original position.
    pub fn attr(mut self, name: &str, pattern: impl Into<AttrPattern>) -> Self {
        self.attr_patterns.insert(name.to_string(), pattern.into());
        self
    }

    pub fn global_patterns(&self) -> &[GlobalPattern] {
        &self.global_patterns
    }

    pub fn attr_patterns(&self) -> impl Iterator<Item = (&str, &AttrPattern)> {
        self.attr_patterns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.global_patterns.is_empty() && self.attr_patterns.is_empty()
    }

    /// Test a token against the rule
    ///
    /// Global patterns are checked first, in order, then attribute
    /// patterns in insertion order. A missing attribute is an error, but
    /// only if evaluation gets that far.
    pub fn matches<T: Token + ?Sized>(&self, token: &T) -> Result<bool, MatchError> {
        for (i, pattern) in self.global_patterns.iter().enumerate() {
            if !pattern.test(&token) {
                trace!(text = token.text(), pattern = i, "global pattern failed");
                return Ok(false);
            }
        }

        for (name, pattern) in &self.attr_patterns {
            let value = token
                .attr(name)
                .ok_or_else(|| MatchError::AttributeNotFound(name.clone()))?;
            if !pattern.test(&value) {
                trace!(text = token.text(), attr = %name, %value, "attribute pattern failed");
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Keep the tokens that match
    ///
    /// Stops at the first attribute lookup error.
    pub fn filter<I, T>(&self, tokens: I) -> Result<Vec<T>, MatchError>
    where
        I: IntoIterator<Item = T>,
        T: Token,
    {
        let mut kept = Vec::new();
        for token in tokens {
            if self.matches(&token)? {
                kept.push(token);
            }
        }
        Ok(kept)
    }
}
