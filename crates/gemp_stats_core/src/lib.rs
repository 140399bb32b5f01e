//! Domain primitives for the GEMP statistics export.
//!
//! This crate owns the request/response contract, credential parsing, the
//! deck-archetype query, row-to-document conversion and object naming. It
//! intentionally excludes AWS SDK, database driver and Lambda runtime concerns.

pub mod contract;
pub mod credentials;
pub mod document;
pub mod object_keys;
pub mod query;
