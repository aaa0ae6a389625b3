//! Vehicle parameter resolution module
//!
//! Resolution runs once at startup. It dispatches on the vehicle family to a
//! fixed record of physical constants and lateral tuning, then applies the
//! firmware-derived minimum steering speed overrides. The resolved
//! [`CarParams`] record is immutable for the rest of the session.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod resolve;
mod tuning;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use resolve::*;
pub use tuning::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during parameter resolution.
#[derive(Debug, thiserror::Error)]
pub enum CarParamsError {
    #[error("Unsupported vehicle: {0}")]
    UnsupportedVehicle(String),
}
