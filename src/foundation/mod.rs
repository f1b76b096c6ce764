//! Shared primitives and the crate error taxonomy.

/// Ids, sentinel tags and geometry re-exports.
pub mod core;
/// `SegError` and `SegResult`.
pub mod error;
