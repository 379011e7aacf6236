//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record and its circulation variant.
//! - Own the available/issued lifecycle transitions.
//!
//! # Invariants
//! - `title`, `author` and `id` are trimmed and never empty.
//! - A `NonCirculating` book is always `Available`; `issue()` never mutates it.
//! - `issue()` and `return_item()` are total: an invalid edge returns `false`.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Circulation state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookStatus {
    /// On the shelf and issuable.
    Available,
    /// Lent out; must be returned before it can be issued again.
    Issued,
}

impl BookStatus {
    /// Lower-case wire name used by the persisted catalog.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Issued => "issued",
        }
    }
}

/// Circulation category of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BookVariant {
    /// Ordinary lending book.
    #[default]
    Standard,
    /// Reference copy that never leaves the library.
    NonCirculating,
}

/// Construction-time validation failures for `Book`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
    EmptyId,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyAuthor => write!(f, "author cannot be empty"),
            Self::EmptyId => write!(f, "isbn cannot be empty"),
        }
    }
}

impl Error for BookValidationError {}

/// One catalog record.
///
/// Fields are read-only outside the crate. A stored book is only reachable
/// through shared references or clones, so status changes on it go through
/// `Catalog::issue` / `Catalog::return_item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    title: String,
    author: String,
    id: String,
    status: BookStatus,
    variant: BookVariant,
}

impl Book {
    /// Creates an available book after trimming and validating the texts.
    ///
    /// # Errors
    /// - Returns the first empty field, checked in `title`, `author`, `id` order.
    pub fn new(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        id: impl AsRef<str>,
        variant: BookVariant,
    ) -> Result<Self, BookValidationError> {
        let title = title.as_ref().trim();
        let author = author.as_ref().trim();
        let id = id.as_ref().trim();

        if title.is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if author.is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        if id.is_empty() {
            return Err(BookValidationError::EmptyId);
        }

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            id: id.to_string(),
            status: BookStatus::Available,
            variant,
        })
    }

    /// Shorthand for a `Standard` book.
    pub fn standard(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        id: impl AsRef<str>,
    ) -> Result<Self, BookValidationError> {
        Self::new(title, author, id, BookVariant::Standard)
    }

    /// Shorthand for a `NonCirculating` book.
    pub fn reference(
        title: impl AsRef<str>,
        author: impl AsRef<str>,
        id: impl AsRef<str>,
    ) -> Result<Self, BookValidationError> {
        Self::new(title, author, id, BookVariant::NonCirculating)
    }

    /// Rebuilds a book with a persisted status.
    ///
    /// Reference books are pinned to `Available` whatever the input says.
    pub(crate) fn with_status(mut self, status: BookStatus) -> Self {
        self.status = match self.variant {
            BookVariant::NonCirculating => BookStatus::Available,
            BookVariant::Standard => status,
        };
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> BookStatus {
        self.status
    }

    pub fn variant(&self) -> BookVariant {
        self.variant
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn is_circulating(&self) -> bool {
        self.variant == BookVariant::Standard
    }

    /// Moves `Available -> Issued`.
    ///
    /// Returns `false` without mutation for reference books and for books
    /// that are already issued.
    pub fn issue(&mut self) -> bool {
        if !self.is_circulating() || !self.is_available() {
            return false;
        }
        self.status = BookStatus::Issued;
        true
    }

    /// Moves `Issued -> Available`.
    ///
    /// A second return is a no-op that reports `false`.
    pub fn return_item(&mut self) -> bool {
        if self.is_available() {
            return false;
        }
        self.status = BookStatus::Available;
        true
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} by {} (ISBN: {}) - ", self.title, self.author, self.id)?;
        match (self.variant, self.status) {
            (BookVariant::NonCirculating, _) => write!(f, "Reference (Always in-library)"),
            (BookVariant::Standard, BookStatus::Available) => write!(f, "Available"),
            (BookVariant::Standard, BookStatus::Issued) => write!(f, "Issued"),
        }
    }
}
