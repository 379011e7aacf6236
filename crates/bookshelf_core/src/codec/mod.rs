//! Persisted catalog format.
//!
//! # Responsibility
//! - Own the JSON shape of the catalog document.
//! - Keep serde details out of the store and model layers.
//!
//! # Invariants
//! - A catalog document is a JSON array of book objects; `[]` when empty.
//! - Decoding is all-or-nothing per document.

pub mod record;

pub use record::{
    decode, decode_catalog, encode, encode_catalog, BookRecord, CodecError, DecodeError,
    REFERENCE_TYPE_NAME, STANDARD_TYPE_NAME,
};
