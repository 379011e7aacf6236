//! In-memory catalog with JSON file persistence.
//!
//! # Responsibility
//! - Provide add/search/list/issue/return entry points over stored books.
//! - Hydrate from and flush to the catalog document.
//! - Report one `CatalogEvent` per operation to the injected sink.
//!
//! # Invariants
//! - Insertion order is display order.
//! - Callers only ever see clones or shared references of stored books.
//! - Corrupt input is reported, never silently discarded.

use super::atomic::{copy_file, write_atomic};
use super::{StoreError, StoreResult};
use crate::codec::{decode_catalog, encode_catalog, DecodeError};
use crate::event::{CatalogEvent, EventKind, EventSink, LogEventSink};
use crate::model::book::Book;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const EMPTY_CATALOG: &str = "[]";

/// Result of `Catalog::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A book with the same id is already stored; nothing changed.
    DuplicateId,
}

/// Result of `Catalog::issue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOutcome {
    Issued,
    NotFound,
    AlreadyIssued,
    /// Reference books never leave the library.
    NotCirculating,
}

/// Result of `Catalog::return_item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    Returned,
    NotFound,
    AlreadyAvailable,
}

/// Result of `Catalog::load`.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Document parsed; the store now holds this many books.
    Loaded(usize),
    /// No file, or a blank one; the store is empty.
    Empty,
    /// Document could not be decoded. The store was not modified and the
    /// caller must pick `reset_catalog`, `backup_and_reset` or `abort_load`.
    CorruptionDetected(DecodeError),
}

impl AddOutcome {
    fn reason(self) -> Option<&'static str> {
        match self {
            Self::Added => None,
            Self::DuplicateId => Some("duplicate_id"),
        }
    }
}

impl IssueOutcome {
    fn reason(self) -> Option<&'static str> {
        match self {
            Self::Issued => None,
            Self::NotFound => Some("not_found"),
            Self::AlreadyIssued => Some("already_issued"),
            Self::NotCirculating => Some("not_circulating"),
        }
    }
}

impl ReturnOutcome {
    fn reason(self) -> Option<&'static str> {
        match self {
            Self::Returned => None,
            Self::NotFound => Some("not_found"),
            Self::AlreadyAvailable => Some("already_available"),
        }
    }
}

/// Ordered, id-unique collection of books.
///
/// Not internally synchronized: a concurrent host must guard each whole
/// operation with one lock.
#[derive(Debug)]
pub struct Catalog<S: EventSink = LogEventSink> {
    books: Vec<Book>,
    sink: S,
}

impl Default for Catalog<LogEventSink> {
    fn default() -> Self {
        Self::new(LogEventSink)
    }
}

impl<S: EventSink> Catalog<S> {
    /// Creates an empty catalog reporting to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            books: Vec::new(),
            sink,
        }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Read-only view of every stored book, insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Appends `book` unless its id is already taken.
    pub fn add(&mut self, book: Book) -> AddOutcome {
        let id = book.id().to_string();
        let outcome = if self.position(&id).is_some() {
            AddOutcome::DuplicateId
        } else {
            self.books.push(book);
            AddOutcome::Added
        };
        self.emit(outcome_event(EventKind::BookAdd, outcome.reason()).with_id(id));
        outcome
    }

    /// Case-insensitive substring search on titles.
    ///
    /// The query is trimmed; an empty query matches every book.
    pub fn find_by_title(&self, query: &str) -> Vec<Book> {
        let needle = query.trim().to_lowercase();
        let hits = self
            .books
            .iter()
            .filter(|book| book.title().to_lowercase().contains(&needle))
            .cloned()
            .collect::<Vec<_>>();
        self.emit(
            CatalogEvent::ok(EventKind::SearchTitle).with_detail(format!("hits={}", hits.len())),
        );
        hits
    }

    /// Exact, case-sensitive lookup on the trimmed id.
    pub fn find_by_id(&self, query: &str) -> Option<Book> {
        let id = query.trim();
        let hit = self.position(id).map(|index| self.books[index].clone());
        let event = match hit {
            Some(_) => CatalogEvent::ok(EventKind::SearchId),
            None => CatalogEvent::rejected(EventKind::SearchId, "not_found"),
        };
        self.emit(event.with_id(id));
        hit
    }

    /// Lends the book with `id`.
    pub fn issue(&mut self, id: &str) -> IssueOutcome {
        let id = id.trim();
        let outcome = match self.books.iter_mut().find(|book| book.id() == id) {
            None => IssueOutcome::NotFound,
            Some(book) if !book.is_circulating() => IssueOutcome::NotCirculating,
            Some(book) => {
                if book.issue() {
                    IssueOutcome::Issued
                } else {
                    IssueOutcome::AlreadyIssued
                }
            }
        };
        self.emit(outcome_event(EventKind::BookIssue, outcome.reason()).with_id(id));
        outcome
    }

    /// Takes the book with `id` back.
    pub fn return_item(&mut self, id: &str) -> ReturnOutcome {
        let id = id.trim();
        let outcome = match self.books.iter_mut().find(|book| book.id() == id) {
            None => ReturnOutcome::NotFound,
            Some(book) => {
                if book.return_item() {
                    ReturnOutcome::Returned
                } else {
                    ReturnOutcome::AlreadyAvailable
                }
            }
        };
        self.emit(outcome_event(EventKind::BookReturn, outcome.reason()).with_id(id));
        outcome
    }

    /// One display line per book, insertion order.
    pub fn list_all(&self) -> Vec<String> {
        let lines = self
            .books
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        self.emit(
            CatalogEvent::ok(EventKind::ListAll).with_detail(format!("count={}", lines.len())),
        );
        lines
    }

    /// Writes the whole catalog to `path` with an atomic replace.
    pub fn save(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let result = encode_catalog(&self.books)
            .map_err(StoreError::from)
            .and_then(|text| write_atomic(path, text.as_bytes()));

        match &result {
            Ok(()) => self.emit(CatalogEvent::ok(EventKind::CatalogSave).with_detail(format!(
                "count={} path={}",
                self.books.len(),
                path.display()
            ))),
            Err(err) => self.emit(CatalogEvent::error(
                EventKind::CatalogSave,
                "write_failed",
                err.to_string(),
            )),
        }
        result
    }

    /// Hydrates the catalog from `path`.
    ///
    /// # Contract
    /// - Missing or blank file: store emptied, `LoadOutcome::Empty`.
    /// - Valid document: store replaced, `LoadOutcome::Loaded(count)`.
    /// - Undecodable document: store untouched, `LoadOutcome::CorruptionDetected`.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file exists but cannot be read; the store
    ///   is untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> StoreResult<LoadOutcome> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                self.books.clear();
                self.emit(CatalogEvent::ok(EventKind::CatalogLoad).with_detail("source=missing"));
                return Ok(LoadOutcome::Empty);
            }
            Err(err) => {
                let err = StoreError::io(path, err);
                self.emit(CatalogEvent::error(
                    EventKind::CatalogLoad,
                    "read_failed",
                    err.to_string(),
                ));
                return Err(err);
            }
        };

        let decoded = String::from_utf8(bytes)
            .map_err(|_| DecodeError::Malformed("catalog is not valid UTF-8".to_string()))
            .and_then(|text| {
                if text.trim().is_empty() {
                    Ok(None)
                } else {
                    decode_catalog(&text).map(Some)
                }
            });

        match decoded {
            Ok(None) => {
                self.books.clear();
                self.emit(CatalogEvent::ok(EventKind::CatalogLoad).with_detail("source=blank"));
                Ok(LoadOutcome::Empty)
            }
            Ok(Some(books)) => {
                let count = books.len();
                self.books = books;
                self.emit(
                    CatalogEvent::ok(EventKind::CatalogLoad).with_detail(format!("count={count}")),
                );
                Ok(LoadOutcome::Loaded(count))
            }
            Err(err) => {
                self.emit(CatalogEvent::error(
                    EventKind::CatalogLoad,
                    "corrupt",
                    err.to_string(),
                ));
                Ok(LoadOutcome::CorruptionDetected(err))
            }
        }
    }

    /// Overwrites `path` with an empty catalog and empties the store.
    pub fn reset_catalog(&mut self, path: impl AsRef<Path>) -> StoreResult<()> {
        let path = path.as_ref();
        let result = self.write_empty(path);
        match &result {
            Ok(()) => self.emit(
                CatalogEvent::ok(EventKind::CatalogReset)
                    .with_detail(format!("path={}", path.display())),
            ),
            Err(err) => self.emit(CatalogEvent::error(
                EventKind::CatalogReset,
                "write_failed",
                err.to_string(),
            )),
        }
        result
    }

    /// Copies the current bytes at `path` to `backup_path`, then resets.
    ///
    /// Nothing is reset when the copy fails.
    pub fn backup_and_reset(
        &mut self,
        path: impl AsRef<Path>,
        backup_path: impl AsRef<Path>,
    ) -> StoreResult<()> {
        let path = path.as_ref();
        let backup_path = backup_path.as_ref();
        let result = copy_file(path, backup_path).and_then(|()| self.write_empty(path));
        match &result {
            Ok(()) => self.emit(
                CatalogEvent::ok(EventKind::CatalogBackup)
                    .with_detail(format!("backup={}", backup_path.display())),
            ),
            Err(err) => self.emit(CatalogEvent::error(
                EventKind::CatalogBackup,
                "backup_failed",
                err.to_string(),
            )),
        }
        result
    }

    /// Gives up on the persisted catalog: empties memory, leaves disk alone.
    pub fn abort_load(&mut self) {
        self.books.clear();
        self.emit(CatalogEvent::ok(EventKind::LoadAbort));
    }

    fn write_empty(&mut self, path: &Path) -> StoreResult<()> {
        write_atomic(path, EMPTY_CATALOG.as_bytes())?;
        self.books.clear();
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id() == id)
    }

    fn emit(&self, event: CatalogEvent) {
        self.sink.notify(&event);
    }
}

/// Backup location used when the caller has none configured:
/// `catalog.json` becomes `catalog.backup.json`.
pub fn default_backup_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut name: OsString = path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(".backup.json");
    path.with_file_name(name)
}

fn outcome_event(kind: EventKind, reason: Option<&'static str>) -> CatalogEvent {
    match reason {
        Some(reason) => CatalogEvent::rejected(kind, reason),
        None => CatalogEvent::ok(kind),
    }
}
