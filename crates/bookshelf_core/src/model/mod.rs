//! Catalog domain model.
//!
//! # Responsibility
//! - Define the record type held by the catalog store.
//! - Keep variant-specific behavior behind a single enum guard.
//!
//! # Invariants
//! - Every book is identified by a trimmed, non-empty id.
//! - There is no hard delete; books live as long as the process.

pub mod book;
