//! # Vehicle interface crate.
//!
//! Provides the types exchanged with the vehicle-facing collaborators: the
//! platform identification consumed at startup and the state, event, and
//! safety-config records passed around the control loop every cycle.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Platform variant and family definitions
pub mod car;

/// Car event definitions
pub mod events;

/// Firmware fingerprint records read off the vehicle's ECUs
pub mod fw;

/// Safety configuration passed to the safety gating hardware
pub mod safety;

/// Per-cycle vehicle state records
pub mod state;
