//! Core catalog logic for Bookshelf.
//! This crate is the single source of truth for catalog invariants.

pub mod codec;
pub mod event;
pub mod logging;
pub mod model;
pub mod store;

pub use codec::{BookRecord, CodecError, DecodeError};
pub use event::{
    CatalogEvent, EventKind, EventSink, EventStatus, LogEventSink, MemoryEventSink, NoopEventSink,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookStatus, BookValidationError, BookVariant};
pub use store::{
    default_backup_path, AddOutcome, Catalog, IssueOutcome, LoadOutcome, ReturnOutcome,
    StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
