//! JSON record mapping for catalog books.
//!
//! # Responsibility
//! - Map `Book` to and from the persisted `BookRecord` shape.
//! - Decode whole catalog documents without partial results.
//!
//! # Invariants
//! - `decode(encode(book)) == book` for every valid book.
//! - `title`, `author` and `isbn` are required; `status` and `type` are not.
//! - Unknown `type` names fall back to the standard variant.

use crate::model::book::{Book, BookStatus, BookValidationError, BookVariant};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wire name of the standard variant.
pub const STANDARD_TYPE_NAME: &str = "Book";
/// Wire name of the non-circulating variant.
pub const REFERENCE_TYPE_NAME: &str = "ReferenceBook";

/// Serializable form of one catalog entry.
///
/// Every field is optional on the way in so that absent keys surface as
/// typed decode errors instead of opaque serde messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Serialized as `type` to match the catalog schema.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Failure to rebuild a book (or a whole catalog) from persisted data.
#[derive(Debug)]
pub enum DecodeError {
    /// Document is not valid JSON or not the expected shape.
    Malformed(String),
    MissingField(&'static str),
    InvalidStatus(String),
    Invalid(BookValidationError),
    /// Two entries share one id.
    DuplicateId(String),
    /// A single entry of a catalog document failed.
    Entry {
        index: usize,
        source: Box<DecodeError>,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed catalog: {message}"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidStatus(value) => write!(f, "invalid status `{value}`"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "duplicate isbn `{id}`"),
            Self::Entry { index, source } => write!(f, "entry {index}: {source}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Entry { source, .. } => Some(source.as_ref()),
            Self::Malformed(_)
            | Self::MissingField(_)
            | Self::InvalidStatus(_)
            | Self::DuplicateId(_) => None,
        }
    }
}

impl From<BookValidationError> for DecodeError {
    fn from(value: BookValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Failure to serialize the catalog.
#[derive(Debug)]
pub enum CodecError {
    Serialize(serde_json::Error),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize catalog: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Maps a book to its persisted record.
pub fn encode(book: &Book) -> BookRecord {
    BookRecord {
        title: Some(book.title().to_string()),
        author: Some(book.author().to_string()),
        isbn: Some(book.id().to_string()),
        status: Some(book.status().as_str().to_string()),
        kind: Some(variant_to_type_name(book.variant()).to_string()),
    }
}

/// Rebuilds a book from a persisted record.
///
/// # Errors
/// - `MissingField` when `title`, `author` or `isbn` is absent.
/// - `Invalid` when one of them is blank.
/// - `InvalidStatus` when `status` is neither `available` nor `issued`.
pub fn decode(record: BookRecord) -> Result<Book, DecodeError> {
    let title = record.title.ok_or(DecodeError::MissingField("title"))?;
    let author = record.author.ok_or(DecodeError::MissingField("author"))?;
    let isbn = record.isbn.ok_or(DecodeError::MissingField("isbn"))?;

    let status = match record.status.as_deref() {
        Some(value) => parse_status(value)?,
        None => BookStatus::Available,
    };
    let variant = record
        .kind
        .as_deref()
        .map(parse_variant)
        .unwrap_or_default();

    Ok(Book::new(title, author, isbn, variant)?.with_status(status))
}

/// Serializes books as a pretty-printed JSON array (`[]` when empty).
pub fn encode_catalog(books: &[Book]) -> Result<String, CodecError> {
    let records = books.iter().map(encode).collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parses a whole catalog document.
///
/// Either every entry decodes or the call fails; there is no partial result.
pub fn decode_catalog(text: &str) -> Result<Vec<Book>, DecodeError> {
    let document: serde_json::Value =
        serde_json::from_str(text).map_err(|err| DecodeError::Malformed(err.to_string()))?;
    let entries = match document {
        serde_json::Value::Array(entries) => entries,
        other => {
            return Err(DecodeError::Malformed(format!(
                "expected a JSON array, found {}",
                json_kind(&other)
            )));
        }
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut books = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let book = BookRecord::deserialize(entry)
            .map_err(|err| DecodeError::Malformed(err.to_string()))
            .and_then(decode)
            .map_err(|source| DecodeError::Entry {
                index,
                source: Box::new(source),
            })?;
        if !seen.insert(book.id().to_string()) {
            return Err(DecodeError::Entry {
                index,
                source: Box::new(DecodeError::DuplicateId(book.id().to_string())),
            });
        }
        books.push(book);
    }

    Ok(books)
}

fn variant_to_type_name(variant: BookVariant) -> &'static str {
    match variant {
        BookVariant::Standard => STANDARD_TYPE_NAME,
        BookVariant::NonCirculating => REFERENCE_TYPE_NAME,
    }
}

fn parse_variant(value: &str) -> BookVariant {
    match value {
        REFERENCE_TYPE_NAME => BookVariant::NonCirculating,
        STANDARD_TYPE_NAME => BookVariant::Standard,
        _ => {
            warn!("event=book_decode module=codec status=defaulted reason=unknown_type");
            BookVariant::Standard
        }
    }
}

fn parse_status(value: &str) -> Result<BookStatus, DecodeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "available" => Ok(BookStatus::Available),
        "issued" => Ok(BookStatus::Issued),
        _ => Err(DecodeError::InvalidStatus(value.to_string())),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
