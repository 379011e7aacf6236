//! Catalog store and its file persistence.
//!
//! # Responsibility
//! - Hold the ordered in-memory catalog and enforce id uniqueness.
//! - Own the load/save protocol, including corruption reporting and the
//!   recovery primitives a caller may pick afterwards.
//!
//! # Invariants
//! - No two stored books share an id.
//! - `load` either replaces the whole sequence or leaves it untouched.
//! - `save` replaces the catalog file atomically; a failed write keeps the
//!   previous file intact.
//! - The store never prompts or prints; policy belongs to the caller.

use crate::codec::CodecError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

mod atomic;
pub mod catalog;

pub use catalog::{
    default_backup_path, AddOutcome, Catalog, IssueOutcome, LoadOutcome, ReturnOutcome,
};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store I/O operation.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Encode(CodecError),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Encode(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Encode(value)
    }
}
