//! Matching over parsed CoNLL-U documents
//!
//! Records act as tokens: the surface text is the FORM column and each
//! column is an attribute. Dotted names (`feats.Number`, `misc.SpaceAfter`)
//! reach into FEATS/MISC pairs.

use crate::conllu::{Document, FieldValue, Record, render_dict};
use crate::matcher::{MatchError, Matcher};
use crate::token::{AttrValue, Token};
use tracing::debug;

/// Position of a matching record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hit {
    /// Index of the sentence in the document
    pub sentence: usize,
    /// Index of the record in the sentence
    pub token: usize,
}

impl Token for Record {
    fn text(&self) -> &str {
        self.form().unwrap_or("")
    }

    fn attr(&self, name: &str) -> Option<AttrValue> {
        if let Some(value) = self.get(name) {
            return Some(value.map_or(AttrValue::None, field_to_attr));
        }

        // feats.Key / misc.Key: a key the column lacks is unset, not unknown
        let (field, key) = name.split_once('.')?;
        match self.get(field)? {
            Some(FieldValue::Dict(dict)) => Some(dict.get(key).and_then(|v| v.as_deref()).into()),
            None => Some(AttrValue::None),
            Some(_) => None,
        }
    }
}

fn field_to_attr(value: &FieldValue) -> AttrValue {
    match value {
        FieldValue::Int(n) => AttrValue::Int(*n),
        FieldValue::Str(s) => AttrValue::Str(s.clone()),
        FieldValue::Dict(dict) => AttrValue::Str(render_dict(dict)),
    }
}

/// Find every record in a document that the matcher accepts
///
/// Hits come back in document order. The first attribute lookup error
/// aborts the search.
pub fn search(document: &Document, matcher: &Matcher) -> Result<Vec<Hit>, MatchError> {
    let mut hits = Vec::new();

    for (sentence, records) in document.iter().enumerate() {
        for (token, record) in records.iter().enumerate() {
            if matcher.matches(record)? {
                hits.push(Hit { sentence, token });
            }
        }
    }

    debug!(hits = hits.len(), "search finished");
    Ok(hits)
}

/// Like `search`, but returns the matching records themselves
pub fn search_records<'a>(
    document: &'a Document,
    matcher: &Matcher,
) -> Result<Vec<&'a Record>, MatchError> {
    let hits = search(document, matcher)?;
    Ok(hits
        .into_iter()
        .map(|hit| &document[hit.sentence][hit.token])
        .collect())
}
