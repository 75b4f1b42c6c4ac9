//! Pattern representation
//!
//! A pattern is one test in a match rule. Global patterns look at the
//! whole token; attribute patterns look at the value of one named
//! attribute. Each position has its own closed set of pattern kinds.

use crate::token::{AttrValue, Token};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::fmt::Debug;
use std::sync::Arc;

/// Predicate over a whole token
pub type TokenPredicate = Arc<dyn Fn(&dyn Token) -> bool + Send + Sync>;

/// Predicate over an attribute value
pub type ValuePredicate = Arc<dyn Fn(&AttrValue) -> bool + Send + Sync>;

/// Pattern tested against the whole token
#[derive(Clone)]
pub enum GlobalPattern {
    /// Never matches
    Absent,
    Bool(bool),
    Predicate(TokenPredicate),
    /// Matches anywhere in the surface text
    Regex(Regex),
    /// Surface text is one of the set
    OneOf(FxHashSet<String>),
    /// Surface text equals the literal
    Equals(String),
}

impl GlobalPattern {
    pub fn predicate(f: impl Fn(&dyn Token) -> bool + Send + Sync + 'static) -> Self {
        GlobalPattern::Predicate(Arc::new(f))
    }

    /// Compile a regex pattern
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(GlobalPattern::Regex(Regex::new(pattern)?))
    }

    pub fn one_of<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GlobalPattern::OneOf(items.into_iter().map(Into::into).collect())
    }

    pub fn equals(text: impl Into<String>) -> Self {
        GlobalPattern::Equals(text.into())
    }

    /// Test a token against this pattern
    pub fn test(&self, token: &dyn Token) -> bool {
        match self {
            GlobalPattern::Absent => false,
            GlobalPattern::Bool(b) => *b,
            GlobalPattern::Predicate(f) => f(token),
            GlobalPattern::Regex(re) => re.is_match(token.text()),
            GlobalPattern::OneOf(set) => set.contains(token.text()),
            GlobalPattern::Equals(text) => token.text() == text.as_str(),
        }
    }
}

// Manual Debug implementation (predicates are opaque)
impl Debug for GlobalPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobalPattern::Absent => f.write_str("Absent"),
            GlobalPattern::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            GlobalPattern::Predicate(_) => f.write_str("Predicate(..)"),
            GlobalPattern::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            GlobalPattern::OneOf(set) => f.debug_tuple("OneOf").field(set).finish(),
            GlobalPattern::Equals(s) => f.debug_tuple("Equals").field(s).finish(),
        }
    }
}

// Manual PartialEq implementation (compare regex sources; predicates by identity)
impl PartialEq for GlobalPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GlobalPattern::Absent, GlobalPattern::Absent) => true,
            (GlobalPattern::Bool(a), GlobalPattern::Bool(b)) => a == b,
            (GlobalPattern::Predicate(a), GlobalPattern::Predicate(b)) => Arc::ptr_eq(a, b),
            (GlobalPattern::Regex(a), GlobalPattern::Regex(b)) => a.as_str() == b.as_str(),
            (GlobalPattern::OneOf(a), GlobalPattern::OneOf(b)) => a == b,
            (GlobalPattern::Equals(a), GlobalPattern::Equals(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for GlobalPattern {
    fn from(b: bool) -> Self {
        GlobalPattern::Bool(b)
    }
}

/// Pattern tested against one attribute value
///
/// There is no separate absence or boolean case here: those are plain
/// equality against `AttrValue::None` or `AttrValue::Bool`.
#[derive(Clone)]
pub enum AttrPattern {
    Predicate(ValuePredicate),
    /// Matches anywhere in the value's string form; `AttrValue::None` is
    /// the empty string, not `"None"`
    Regex(Regex),
    OneOf(FxHashSet<AttrValue>),
    Equals(AttrValue),
}

impl AttrPattern {
    pub fn predicate(f: impl Fn(&AttrValue) -> bool + Send + Sync + 'static) -> Self {
        AttrPattern::Predicate(Arc::new(f))
    }

    /// Compile a regex pattern
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(AttrPattern::Regex(Regex::new(pattern)?))
    }

    pub fn one_of<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttrValue>,
    {
        AttrPattern::OneOf(items.into_iter().map(Into::into).collect())
    }

    pub fn equals(value: impl Into<AttrValue>) -> Self {
        AttrPattern::Equals(value.into())
    }

    /// Test an attribute value against this pattern
    pub fn test(&self, value: &AttrValue) -> bool {
        match self {
            AttrPattern::Predicate(f) => f(value),
            AttrPattern::Regex(re) => re.is_match(&value.to_text()),
            AttrPattern::OneOf(set) => set.contains(value),
            AttrPattern::Equals(expected) => value == expected,
        }
    }
}

impl Debug for AttrPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrPattern::Predicate(_) => f.write_str("Predicate(..)"),
            AttrPattern::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            AttrPattern::OneOf(set) => f.debug_tuple("OneOf").field(set).finish(),
            AttrPattern::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
        }
    }
}

impl PartialEq for AttrPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrPattern::Predicate(a), AttrPattern::Predicate(b)) => Arc::ptr_eq(a, b),
            (AttrPattern::Regex(a), AttrPattern::Regex(b)) => a.as_str() == b.as_str(),
            (AttrPattern::OneOf(a), AttrPattern::OneOf(b)) => a == b,
            (AttrPattern::Equals(a), AttrPattern::Equals(b)) => a == b,
            _ => false,
        }
    }
}

impl From<AttrValue> for AttrPattern {
    fn from(value: AttrValue) -> Self {
        AttrPattern::Equals(value)
    }
}

impl From<&str> for AttrPattern {
    fn from(s: &str) -> Self {
        AttrPattern::Equals(s.into())
    }
}

impl From<String> for AttrPattern {
    fn from(s: String) -> Self {
        AttrPattern::Equals(s.into())
    }
}

impl From<i64> for AttrPattern {
    fn from(n: i64) -> Self {
        AttrPattern::Equals(n.into())
    }
}

impl From<bool> for AttrPattern {
    fn from(b: bool) -> Self {
        AttrPattern::Equals(b.into())
    }
}
