//! CoNLL-U text parsing
//!
//! Best-effort decoding of CoNLL-U text into ordered records. Sentences are
//! separated by blank lines; comment lines (`#`) are skipped. Each token
//! line is split into columns and each column is decoded by a rule chosen
//! from its field name. Values that can't be decoded become `None` rather
//! than errors, and short lines give partial records.
//!
//! CoNLL-U format: https://universaldependencies.org/format.html

use flate2::read::MultiGzDecoder;
use indexmap::IndexMap;
use memchr::memchr;
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace};

/// The ten standard CoNLL-U columns, in file order
pub const DEFAULT_FIELDS: [&str; 10] = [
    "id", "form", "lemma", "upostag", "xpostag", "feats", "head", "deprel", "deps", "misc",
];

// Column separator: a tab, or a run of two or more spaces
static COLUMN_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t| {2,}").expect("column separator regex"));

// Sentence separator: two or more consecutive newlines
static SENTENCE_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n(?:\r?\n)+").expect("sentence separator regex"));

/// Key/value pairs from a FEATS or MISC column, in column order
pub type FeatureMap = IndexMap<String, Option<String>>;

/// A decoded column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Str(String),
    Dict(FeatureMap),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&FeatureMap> {
        match self {
            FieldValue::Dict(d) => Some(d),
            _ => None,
        }
    }
}

/// One token line: field name to decoded value, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: IndexMap<String, Option<FieldValue>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, keeping its position if already present
    pub fn insert(&mut self, name: &str, value: Option<FieldValue>) {
        self.fields.insert(name.to_string(), value);
    }

    /// Look up a field
    ///
    /// The outer `Option` is whether the record has the field at all, the
    /// inner one whether it decoded to a value.
    pub fn get(&self, name: &str) -> Option<Option<&FieldValue>> {
        self.fields.get(name).map(Option::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in order
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn int_field(&self, name: &str) -> Option<i64> {
        self.get(name).flatten().and_then(FieldValue::as_int)
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).flatten().and_then(FieldValue::as_str)
    }

    fn dict_field(&self, name: &str) -> Option<&FeatureMap> {
        self.get(name).flatten().and_then(FieldValue::as_dict)
    }

    pub fn id(&self) -> Option<i64> {
        self.int_field("id")
    }

    pub fn form(&self) -> Option<&str> {
        self.str_field("form")
    }

    pub fn lemma(&self) -> Option<&str> {
        self.str_field("lemma")
    }

    pub fn upostag(&self) -> Option<&str> {
        self.str_field("upostag")
    }

    pub fn xpostag(&self) -> Option<&str> {
        self.str_field("xpostag")
    }

    /// FEATS as key/value pairs (only when the column had `=` in it)
    pub fn feats(&self) -> Option<&FeatureMap> {
        self.dict_field("feats")
    }

    pub fn head(&self) -> Option<i64> {
        self.int_field("head")
    }

    pub fn deprel(&self) -> Option<&str> {
        self.str_field("deprel")
    }

    pub fn deps(&self) -> Option<&str> {
        self.str_field("deps")
    }

    pub fn misc(&self) -> Option<&FeatureMap> {
        self.dict_field("misc")
    }

    /// Render the record as one tab-separated CoNLL-U line
    ///
    /// Missing values are written as `_`.
    pub fn to_conllu_line(&self) -> String {
        self.fields
            .values()
            .map(|v| render_value(v.as_ref()))
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// Sentence: records in line order
pub type Sentence = Vec<Record>;

/// Document: sentences in text order
pub type Document = Vec<Sentence>;

/// Error reading a CoNLL-U file
///
/// Decoding text never fails; only getting the text can.
#[derive(Debug, Error)]
pub enum ConlluError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file {}: {}", .path.display(), .source)]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Parser configured with a field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoNLLUParser {
    fields: Vec<String>,
}

impl Default for CoNLLUParser {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS)
    }
}

impl CoNLLUParser {
    /// Create a parser for the given columns
    ///
    /// Field names pick the decoding rule; unknown names keep the raw text.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn parse_line(&self, line: &str) -> Record {
        parse_line(line, self.fields.as_slice())
    }

    pub fn parse_document(&self, text: &str) -> Document {
        parse_document_with(text, self.fields.as_slice())
    }

    /// Read and parse a file, gunzipping `.gz` files
    pub fn read_document(&self, path: impl AsRef<Path>) -> Result<Document, ConlluError> {
        let text = read_text(path.as_ref())?;
        Ok(self.parse_document(&text))
    }
}

/// Parse a document with the standard ten fields
pub fn parse_document(text: &str) -> Document {
    parse_document_with(text, &DEFAULT_FIELDS)
}

/// Parse a document with a custom field list
pub fn parse_document_with<S: AsRef<str>>(text: &str, fields: &[S]) -> Document {
    let mut document = Document::new();

    for block in SENTENCE_SEP.split(text) {
        let mut sentence = Sentence::new();

        for line in block.split('\n') {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                trace!(line = trimmed, "skipping comment");
                continue;
            }
            sentence.push(parse_line(line, fields));
        }

        // Comment-only blocks don't make a sentence
        if !sentence.is_empty() {
            document.push(sentence);
        }
    }

    debug!(sentences = document.len(), "parsed document");
    document
}

/// Parse one token line
///
/// Columns are paired with fields by position. A line with fewer columns
/// than fields gives a record with only the leading fields. A trailing
/// `\r` is dropped.
pub fn parse_line<S: AsRef<str>>(line: &str, fields: &[S]) -> Record {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let columns: Vec<&str> = split_columns(line).collect();
    if columns.len() < fields.len() {
        debug!(
            columns = columns.len(),
            fields = fields.len(),
            "line has fewer columns than fields"
        );
    }

    let mut record = Record::new();
    for (field, raw) in fields.iter().zip(columns) {
        let field = field.as_ref();
        record.insert(field, decode_field(field, raw));
    }
    record
}

/// Split a line on tabs or runs of two or more spaces
pub fn split_columns(line: &str) -> impl Iterator<Item = &str> {
    COLUMN_SEP.split(line)
}

/// Decode a raw column by field name
pub fn decode_field(field: &str, raw: &str) -> Option<FieldValue> {
    match field {
        "id" | "head" => parse_int_value(raw),
        "xpostag" | "deps" => parse_nullable_value(raw),
        "feats" | "misc" => parse_dict_value(raw),
        _ => Some(FieldValue::Str(raw.to_string())),
    }
}

/// Integer if the value is all ASCII digits, else `None`
pub fn parse_int_value(raw: &str) -> Option<FieldValue> {
    let bytes = raw.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    // atoi gives None on overflow
    atoi::atoi::<i64>(bytes).map(FieldValue::Int)
}

/// `None` for an empty value or the `_` placeholder
pub fn parse_nullable_value(raw: &str) -> Option<FieldValue> {
    nullable(raw).map(|s| FieldValue::Str(s.to_string()))
}

/// Parse `Key=Value|Key=Value`
///
/// Without any `=` the value is decoded as nullable text instead. Each
/// pair value is itself nullable, and a pair with no `=` keeps its key
/// with no value.
pub fn parse_dict_value(raw: &str) -> Option<FieldValue> {
    if memchr(b'=', raw.as_bytes()).is_none() {
        return parse_nullable_value(raw);
    }

    let mut dict = FeatureMap::new();
    for pair in raw.split('|') {
        match pair.split_once('=') {
            Some((key, value)) => {
                dict.insert(key.to_string(), nullable(value).map(str::to_string));
            }
            None => {
                dict.insert(pair.to_string(), None);
            }
        }
    }
    Some(FieldValue::Dict(dict))
}

fn nullable(raw: &str) -> Option<&str> {
    if raw.is_empty() || raw == "_" {
        None
    } else {
        Some(raw)
    }
}

fn render_value(value: Option<&FieldValue>) -> String {
    match value {
        None => "_".to_string(),
        Some(FieldValue::Int(n)) => n.to_string(),
        Some(FieldValue::Str(s)) => s.clone(),
        Some(FieldValue::Dict(dict)) => render_dict(dict),
    }
}

/// Render pairs as `Key=Value|Key=Value`, `_` when empty
pub(crate) fn render_dict(dict: &FeatureMap) -> String {
    if dict.is_empty() {
        return "_".to_string();
    }
    dict.iter()
        .map(|(k, v)| format!("{}={}", k, v.as_deref().unwrap_or("_")))
        .collect::<Vec<_>>()
        .join("|")
}

/// Render a document as CoNLL-U text
///
/// Each sentence is followed by a blank line.
pub fn write_document(document: &Document) -> String {
    let mut out = String::new();
    for sentence in document {
        for record in sentence {
            out.push_str(&record.to_conllu_line());
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Read and parse a file with the standard fields
pub fn read_document(path: impl AsRef<Path>) -> Result<Document, ConlluError> {
    CoNLLUParser::default().read_document(path)
}

fn read_text(path: &Path) -> Result<String, ConlluError> {
    let file = File::open(path).map_err(|source| ConlluError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut text = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        MultiGzDecoder::new(BufReader::new(file)).read_to_string(&mut text)?;
    } else {
        BufReader::new(file).read_to_string(&mut text)?;
    }
    debug!(path = %path.display(), bytes = text.len(), "read CoNLL-U text");
    Ok(text)
}
