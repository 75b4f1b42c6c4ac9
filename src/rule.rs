//! Match rule syntax
//!
//! Parses a compact bracketed rule into a `Matcher` using a pest grammar:
//!
//! ```text
//! [text=/^[A-Z]/, upostag={"NOUN", "PROPN"}, head=2, xpostag=none]
//! ```
//!
//! `text` constrains the surface form (global patterns); any other key
//! names an attribute. Bare `true`, `false` and `none` items are global
//! boolean and absence patterns.

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::str::FromStr;
use thiserror::Error;

use crate::matcher::Matcher;
use crate::pattern::{AttrPattern, GlobalPattern};
use crate::token::AttrValue;

#[derive(Parser)]
#[grammar = "rule.pest"]
struct RuleParser;

/// Key reserved for the token's surface text
pub const TEXT_KEY: &str = "text";

/// Error type for rule parsing failures
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),

    #[error("Rule error: Invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("Rule error: Invalid integer: {0}")]
    InvalidInteger(String),

    #[error("Rule error: text only takes strings, regexes or string sets, got {0}")]
    InvalidText(String),

    #[error("Rule error: Duplicate attribute: {0}")]
    DuplicateAttribute(String),

    #[error("Rule error: Unexpected {0}")]
    Unexpected(&'static str),
}

impl From<pest::error::Error<Rule>> for RuleError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        RuleError::Syntax(Box::new(err))
    }
}

/// Parse a rule string into a Matcher
pub fn parse_rule(input: &str) -> Result<Matcher, RuleError> {
    let mut pairs = RuleParser::parse(Rule::rule, input)?;
    let rule_pair = next_pair(&mut pairs, "end of rule")?;

    let mut matcher = Matcher::default();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for item in rule_pair.into_inner() {
        if item.as_rule() != Rule::item {
            continue; // EOI
        }
        let inner = next_pair(&mut item.into_inner(), "empty item")?;

        match inner.as_rule() {
            Rule::literal => {
                matcher = matcher.global(parse_global_literal(inner.as_str()));
            }
            Rule::constraint => {
                let mut parts = inner.into_inner();
                let key = next_pair(&mut parts, "missing key")?.as_str();
                let value = next_pair(&mut parts, "missing value")?;
                let value = next_pair(&mut value.into_inner(), "empty value")?;

                if key == TEXT_KEY {
                    matcher = matcher.global(parse_text_value(value)?);
                } else {
                    if !seen.insert(key.to_string()) {
                        return Err(RuleError::DuplicateAttribute(key.to_string()));
                    }
                    matcher = matcher.attr(key, parse_attr_value(value)?);
                }
            }
            _ => return Err(RuleError::Unexpected("item")),
        }
    }

    Ok(matcher)
}

impl FromStr for Matcher {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, what: &'static str) -> Result<Pair<'i, Rule>, RuleError> {
    pairs.next().ok_or(RuleError::Unexpected(what))
}

/// Bare literal as a global pattern
fn parse_global_literal(s: &str) -> GlobalPattern {
    match s {
        "true" => GlobalPattern::Bool(true),
        "false" => GlobalPattern::Bool(false),
        _ => GlobalPattern::Absent,
    }
}

/// Value of a `text=` constraint
fn parse_text_value(pair: Pair<Rule>) -> Result<GlobalPattern, RuleError> {
    match pair.as_rule() {
        Rule::string => Ok(GlobalPattern::Equals(parse_string(pair)?)),
        Rule::regex => Ok(GlobalPattern::Regex(parse_regex(pair)?)),
        Rule::set => {
            let mut items = FxHashSet::default();
            for scalar in pair.into_inner() {
                let inner = next_pair(&mut scalar.into_inner(), "empty set item")?;
                if inner.as_rule() != Rule::string {
                    return Err(RuleError::InvalidText(inner.as_str().to_string()));
                }
                items.insert(parse_string(inner)?);
            }
            Ok(GlobalPattern::OneOf(items))
        }
        _ => Err(RuleError::InvalidText(pair.as_str().to_string())),
    }
}

/// Value of an attribute constraint
fn parse_attr_value(pair: Pair<Rule>) -> Result<AttrPattern, RuleError> {
    match pair.as_rule() {
        Rule::regex => Ok(AttrPattern::Regex(parse_regex(pair)?)),
        Rule::set => {
            let mut items = FxHashSet::default();
            for scalar in pair.into_inner() {
                let inner = next_pair(&mut scalar.into_inner(), "empty set item")?;
                items.insert(parse_scalar(inner)?);
            }
            Ok(AttrPattern::OneOf(items))
        }
        _ => Ok(AttrPattern::Equals(parse_scalar(pair)?)),
    }
}

fn parse_scalar(pair: Pair<Rule>) -> Result<AttrValue, RuleError> {
    match pair.as_rule() {
        Rule::string => Ok(AttrValue::Str(parse_string(pair)?)),
        Rule::integer => pair
            .as_str()
            .parse()
            .map(AttrValue::Int)
            .map_err(|_| RuleError::InvalidInteger(pair.as_str().to_string())),
        Rule::literal => Ok(match pair.as_str() {
            "true" => AttrValue::Bool(true),
            "false" => AttrValue::Bool(false),
            _ => AttrValue::None,
        }),
        _ => Err(RuleError::Unexpected("value")),
    }
}

/// String contents with backslash escapes removed
fn parse_string(pair: Pair<Rule>) -> Result<String, RuleError> {
    let inner = next_pair(&mut pair.into_inner(), "string contents")?;
    let mut out = String::with_capacity(inner.as_str().len());
    let mut chars = inner.as_str().chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

/// Regex between slashes; only `\/` is unescaped
fn parse_regex(pair: Pair<Rule>) -> Result<Regex, RuleError> {
    let inner = next_pair(&mut pair.into_inner(), "regex contents")?;
    let source = inner.as_str().replace("\\/", "/");
    Ok(Regex::new(&source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::SimpleToken;

    #[test]
    fn test_parse_empty_rule() {
        let matcher = parse_rule("[]").unwrap();
        assert!(matcher.is_empty());

        let matcher = parse_rule("  [ ]  ").unwrap();
        assert!(matcher.is_empty());
    }

    #[test]
    fn test_parse_attr_constraints() {
        let matcher = parse_rule(r#"[upostag="VERB", lemma="run"]"#).unwrap();

        let attrs: Vec<_> = matcher.attr_patterns().collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0], ("upostag", &AttrPattern::from("VERB")));
        assert_eq!(attrs[1], ("lemma", &AttrPattern::from("run")));
        assert!(matcher.global_patterns().is_empty());
    }

    #[test]
    fn test_parse_text_constraints() {
        let matcher = parse_rule(r#"[text="dog", text=/^d/, text={"dog", "cat"}]"#).unwrap();

        assert_eq!(
            matcher.global_patterns(),
            &[
                GlobalPattern::equals("dog"),
                GlobalPattern::regex("^d").unwrap(),
                GlobalPattern::one_of(["cat", "dog"]),
            ]
        );
    }

    #[test]
    fn test_parse_scalars() {
        let matcher = parse_rule("[head=2, is_stop=false, xpostag=none, offset=-1]").unwrap();

        let attrs: Vec<_> = matcher.attr_patterns().collect();
        assert_eq!(attrs[0].1, &AttrPattern::Equals(AttrValue::Int(2)));
        assert_eq!(attrs[1].1, &AttrPattern::Equals(AttrValue::Bool(false)));
        assert_eq!(attrs[2].1, &AttrPattern::Equals(AttrValue::None));
        assert_eq!(attrs[3].1, &AttrPattern::Equals(AttrValue::Int(-1)));
    }

    #[test]
    fn test_parse_sets_and_regexes() {
        let matcher = parse_rule(r#"[upostag={"NOUN", "PROPN",}, feats.Number=/^(Sing|Plur)$/]"#).unwrap();

        let attrs: Vec<_> = matcher.attr_patterns().collect();
        assert_eq!(attrs[0].1, &AttrPattern::one_of(["NOUN", "PROPN"]));
        assert_eq!(attrs[1].0, "feats.Number");
        assert_eq!(attrs[1].1, &AttrPattern::regex("^(Sing|Plur)$").unwrap());
    }

    #[test]
    fn test_parse_bare_literals() {
        let matcher = parse_rule("[true, false, none]").unwrap();
        assert_eq!(
            matcher.global_patterns(),
            &[
                GlobalPattern::Bool(true),
                GlobalPattern::Bool(false),
                GlobalPattern::Absent,
            ]
        );
    }

    #[test]
    fn test_parse_escapes() {
        let matcher = parse_rule(r#"[text="say \"hi\"", text=/a\/b/]"#).unwrap();
        assert_eq!(
            matcher.global_patterns(),
            &[
                GlobalPattern::equals(r#"say "hi""#),
                GlobalPattern::regex("a/b").unwrap(),
            ]
        );
    }

    #[test]
    fn test_rule_from_str_matches() {
        let matcher: Matcher = r#"[text=/^[A-Z]/, pos={"NOUN", "PROPN"}]"#.parse().unwrap();

        let paris = SimpleToken::new("Paris").with_attr("pos", "PROPN");
        let dog = SimpleToken::new("dog").with_attr("pos", "NOUN");
        assert_eq!(matcher.matches(&paris), Ok(true));
        assert_eq!(matcher.matches(&dog), Ok(false));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_rule("upostag=\"NOUN\""), Err(RuleError::Syntax(_))));
        assert!(matches!(parse_rule("[upostag=]"), Err(RuleError::Syntax(_))));
        assert!(matches!(parse_rule("[lemma=/(/]"), Err(RuleError::Regex(_))));
        assert!(matches!(parse_rule("[text=3]"), Err(RuleError::InvalidText(_))));
        assert!(matches!(parse_rule(r#"[text={"a", 1}]"#), Err(RuleError::InvalidText(_))));
        assert!(matches!(
            parse_rule("[head=99999999999999999999]"),
            Err(RuleError::InvalidInteger(_))
        ));
        assert!(matches!(
            parse_rule(r#"[pos="NOUN", pos="VERB"]"#),
            Err(RuleError::DuplicateAttribute(key)) if key == "pos"
        ));
    }
}
