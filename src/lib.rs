//! Conllmatch: declarative token matching and CoNLL-U parsing
//!
//! Two small, independent tools for linguistic annotations: a matcher that
//! tests tokens against global and attribute patterns, and a best-effort
//! CoNLL-U decoder. The searcher runs a matcher over parsed records.

pub mod conllu; // CoNLL-U decoding and serialization
pub mod matcher; // Match rules and evaluation
pub mod pattern; // Global and attribute pattern kinds
pub mod rule; // Textual rule syntax
pub mod searcher; // Matching over parsed documents
pub mod token; // Token trait and attribute values
pub mod upos; // Universal POS tag classes

// Re-exports for convenience
pub use conllu::{
    CoNLLUParser, ConlluError, DEFAULT_FIELDS, Document, FieldValue, Record, Sentence,
    parse_dict_value, parse_document, parse_document_with, parse_line, read_document,
    write_document,
};
pub use matcher::{MatchError, Matcher};
pub use pattern::{AttrPattern, GlobalPattern};
pub use rule::{RuleError, parse_rule};
pub use searcher::{Hit, search, search_records};
pub use token::{AttrValue, SimpleToken, Token};
