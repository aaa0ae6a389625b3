//! # Car event definitions
//!
//! Events raised by the control loop for the alert aggregator. The lateral
//! core raises at most one event per cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An advisory event for the alert aggregator.
#[derive(Debug, Serialize, Eq, PartialEq, Copy, Clone)]
pub enum CarEvent {
    /// Vehicle speed is below the minimum steering speed, steering assist is
    /// suppressed.
    BelowSteerSpeed,
}
