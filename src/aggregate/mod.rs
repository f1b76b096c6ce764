//! Segment aggregation: incremental offsets and full rescans.
//!
//! Both pathways must agree on the tag to shape-set mapping they produce.

/// Segment id generation.
pub mod ids;
/// Incremental offset application.
pub mod offsets;
/// Full rescan of the painted surface.
pub mod rescan;
