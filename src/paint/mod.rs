//! Paint mode, paint constants and the per-shape pointer linker.

/// Pointer event handling per shape.
pub mod linker;
/// Shared current paint mode.
pub mod mode;
/// Paint constants.
pub mod style;
