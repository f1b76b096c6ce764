//! Export of segment records and overlay images.

/// PNG rasterization of the overlay.
pub mod raster;
/// JSON segment records.
pub mod records;
