//! Lateral control module
//!
//! Runs every cycle. Computes the feedforward steering torque for the
//! demanded lateral acceleration using the strategy resolved at startup, and
//! updates the low speed lockout which suppresses steering assist below the
//! platform's minimum steering speed.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod feedforward;
mod lockout;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use feedforward::*;
pub use lockout::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LatCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LatCtrlError {
    #[error("Processing requested before the module was initialised")]
    NotInitialised,

    #[error("Could not initialise the module's archives: {0}")]
    ArchiveInitError(String),
}
