//! Universal POS tag classes
//!
//! Groupings of the Universal Dependencies part-of-speech tags
//! (http://universaldependencies.org/u/pos/), ready to use as attribute
//! patterns on `upostag`.

use crate::pattern::AttrPattern;

/// Content word tags
pub const CONTENT_POS: &[&str] = &["ADJ", "ADV", "NOUN", "PROPN", "VERB"];

/// Function word tags
pub const FUNCTION_POS: &[&str] = &[
    "ADP", "AUX", "CONJ", "CCONJ", "DET", "INTJ", "PART", "PRON", "SCONJ",
];

/// Open class word tags
pub const OPEN_CLASS_POS: &[&str] = &["ADJ", "ADV", "INTJ", "NOUN", "PROPN", "VERB"];

/// Closed class word tags
pub const CLOSED_CLASS_POS: &[&str] = &[
    "ADP", "AUX", "CONJ", "CCONJ", "DET", "NUM", "PART", "PRON", "SCONJ",
];

/// Tags that are neither open nor closed class
pub const OTHER_POS: &[&str] = &["PUNCT", "SYM", "X"];

/// Membership pattern over a tag list
pub fn one_of(tags: &[&str]) -> AttrPattern {
    AttrPattern::one_of(tags.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;
    use crate::token::{AttrValue, SimpleToken};

    #[test]
    fn test_classes_partition_tags() {
        for tag in OPEN_CLASS_POS {
            assert!(!CLOSED_CLASS_POS.contains(tag));
            assert!(!OTHER_POS.contains(tag));
        }
        for tag in CLOSED_CLASS_POS {
            assert!(!OTHER_POS.contains(tag));
        }
    }

    #[test]
    fn test_one_of() {
        let content = one_of(CONTENT_POS);
        assert!(content.test(&AttrValue::from("PROPN")));
        assert!(!content.test(&AttrValue::from("DET")));
    }

    #[test]
    fn test_content_word_matcher() {
        let matcher = Matcher::default().attr("upostag", one_of(CONTENT_POS));
        let dog = SimpleToken::new("dog").with_attr("upostag", "NOUN");
        let the = SimpleToken::new("the").with_attr("upostag", "DET");

        assert_eq!(matcher.matches(&dog), Ok(true));
        assert_eq!(matcher.matches(&the), Ok(false));
    }
}
