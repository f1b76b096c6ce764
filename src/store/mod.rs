//! Collaborator interfaces for metadata persistence and partition fetching.

/// Asset metadata persistence.
pub mod metadata;
/// Vector partition sources.
pub mod partition;
