//! Token abstraction for matching
//!
//! Tokens come from an external pipeline (or from parsed CoNLL-U records).
//! The matcher only needs two things from them: the surface text and a
//! lookup of named attributes.

use indexmap::IndexMap;
use std::fmt;

/// Value of a named token attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttrValue {
    /// String form used by text patterns
    ///
    /// `None` renders as the empty string.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn is_none(&self) -> bool {
        matches!(self, AttrValue::None)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::None => Ok(()),
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(n) => write!(f, "{}", n),
            AttrValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Int(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::None, Into::into)
    }
}

/// Anything the matcher can inspect
pub trait Token {
    /// Surface form of the token
    fn text(&self) -> &str;

    /// Look up a named attribute
    ///
    /// Returns `None` when the token has no attribute of that name. An
    /// attribute that exists but holds no value is `Some(AttrValue::None)`.
    fn attr(&self, name: &str) -> Option<AttrValue>;
}

impl<T: Token + ?Sized> Token for &T {
    fn text(&self) -> &str {
        (**self).text()
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        (**self).attr(name)
    }
}

/// In-memory token with an insertion-ordered attribute table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleToken {
    pub text: String,
    pub attrs: IndexMap<String, AttrValue>,
}

impl SimpleToken {
    /// Create a token with no attributes
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            attrs: IndexMap::new(),
        }
    }

    /// Add (or replace) an attribute
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }
}

impl Token for SimpleToken {
    fn text(&self) -> &str {
        &self.text
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        self.attrs.get(name).cloned()
    }
}
