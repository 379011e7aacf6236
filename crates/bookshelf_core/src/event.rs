//! Store notifications for the logging collaborator.
//!
//! # Responsibility
//! - Describe one significant store operation as a `CatalogEvent`.
//! - Deliver events through an injected `EventSink` instead of global state.
//!
//! # Invariants
//! - Every public store operation emits exactly one event.
//! - Events carry metadata only (kind, id, outcome, reason, detail).

use log::{error, info, warn};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};

/// Operation that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BookAdd,
    BookIssue,
    BookReturn,
    SearchTitle,
    SearchId,
    ListAll,
    CatalogSave,
    CatalogLoad,
    CatalogReset,
    CatalogBackup,
    LoadAbort,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookAdd => "book_add",
            Self::BookIssue => "book_issue",
            Self::BookReturn => "book_return",
            Self::SearchTitle => "search_title",
            Self::SearchId => "search_id",
            Self::ListAll => "list_all",
            Self::CatalogSave => "catalog_save",
            Self::CatalogLoad => "catalog_load",
            Self::CatalogReset => "catalog_reset",
            Self::CatalogBackup => "catalog_backup",
            Self::LoadAbort => "load_abort",
        }
    }
}

/// Outcome class of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    /// Operation did what was asked.
    Ok,
    /// Operation was refused by a domain rule (duplicate, not found, ...).
    Rejected,
    /// Operation failed on I/O or corrupt data.
    Error,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }
}

/// One store notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEvent {
    pub kind: EventKind,
    pub status: EventStatus,
    /// Book id involved, when the operation targets one book.
    pub id: Option<String>,
    /// Stable machine-readable reason code (`duplicate_id`, `not_found`, ...).
    pub reason: Option<&'static str>,
    /// Free-form detail such as result counts or error text.
    pub detail: Option<String>,
}

impl CatalogEvent {
    pub fn ok(kind: EventKind) -> Self {
        Self {
            kind,
            status: EventStatus::Ok,
            id: None,
            reason: None,
            detail: None,
        }
    }

    pub fn rejected(kind: EventKind, reason: &'static str) -> Self {
        Self {
            status: EventStatus::Rejected,
            reason: Some(reason),
            ..Self::ok(kind)
        }
    }

    pub fn error(kind: EventKind, reason: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status: EventStatus::Error,
            reason: Some(reason),
            detail: Some(detail.into()),
            ..Self::ok(kind)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl Display for CatalogEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "event={} module=store status={}",
            self.kind.as_str(),
            self.status.as_str()
        )?;
        if let Some(id) = &self.id {
            write!(f, " id={id}")?;
        }
        if let Some(reason) = self.reason {
            write!(f, " reason={reason}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " detail={}", detail.replace(['\n', '\r'], " "))?;
        }
        Ok(())
    }
}

/// Receiver of store notifications.
pub trait EventSink {
    fn notify(&self, event: &CatalogEvent);
}

/// Forwards events to the `log` facade at a level matching their status.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn notify(&self, event: &CatalogEvent) {
        match event.status {
            EventStatus::Ok => info!("{event}"),
            EventStatus::Rejected => warn!("{event}"),
            EventStatus::Error => error!("{event}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn notify(&self, _event: &CatalogEvent) {}
}

/// Keeps events in memory, in emission order.
///
/// Single-threaded like the store itself.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: RefCell<Vec<CatalogEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events.borrow().clone()
    }

    /// Removes and returns the recorded events.
    pub fn drain(&self) -> Vec<CatalogEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl EventSink for MemoryEventSink {
    fn notify(&self, event: &CatalogEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn notify(&self, event: &CatalogEvent) {
        (**self).notify(event)
    }
}
