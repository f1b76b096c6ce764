//! Overlay synchronization: lifecycle state machine, the canvas session and the grid.

/// Optional line grid.
pub mod grid;
/// The interactive canvas.
pub mod session;
/// Pure lifecycle transitions.
pub mod state;
