//! The rendering surface as an explicit shape index, plus its decoding and serialization.

/// Bounding boxes and polygon extraction.
pub mod geometry;
/// Shape index keyed by `ShapeId`.
pub mod index;
/// Vector partition decoding.
pub mod partition;
/// Per-shape geometry and paint state.
pub mod shape;
/// SVG serialization of the painted overlay.
pub mod svg_out;
