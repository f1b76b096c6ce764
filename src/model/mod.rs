//! Persisted data model: segments, asset metadata and project tags.

/// Per-asset metadata record.
pub mod metadata;
/// Segments, annotations and offsets.
pub mod segment;
/// Project tag registry.
pub mod tag;
