//! # Per-cycle vehicle state
//!
//! The control loop consumes one [`CycleInput`] record per cycle. On the
//! vehicle these values are decoded from the bus; in replay they are parsed
//! from drive-script JSON payloads.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The vehicle state and lateral demands for one control cycle.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default)]
pub struct CycleInput {
    /// Vehicle longitudinal speed.
    ///
    /// Units: meters/second
    pub v_ego_ms: f64,

    /// Desired lateral acceleration from the policy layer.
    ///
    /// Units: meters/second^2
    pub lat_accel_desired_ms2: f64,

    /// Error between desired and measured lateral acceleration.
    ///
    /// Units: meters/second^2
    pub lat_accel_error_ms2: f64,

    /// Half-width of the dead band applied to the lateral acceleration error
    /// before friction compensation.
    ///
    /// Units: meters/second^2
    pub lat_accel_deadzone_ms2: f64,

    /// Whether friction compensation is active this cycle.
    pub friction_compensation: bool,

    /// Lateral acceleration due to gravity acting through road roll.
    ///
    /// Units: meters/second^2
    pub g_lat_accel_ms2: f64,

    /// Desired lateral jerk, used to anticipate static friction breakaway.
    ///
    /// Units: meters/second^3
    pub lat_jerk_desired_ms3: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible errors when parsing a state record.
#[derive(Debug, Error)]
pub enum StateParseError {
    #[error("State record contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CycleInput {
    /// Parse a cycle input from a JSON payload.
    pub fn from_json(json_str: &str) -> Result<Self, StateParseError> {
        serde_json::from_str(json_str).map_err(StateParseError::InvalidJson)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        let input = CycleInput::from_json(
            r#"{
                "v_ego_ms": 20.0,
                "lat_accel_desired_ms2": 1.2,
                "lat_accel_error_ms2": 0.1,
                "lat_accel_deadzone_ms2": 0.05,
                "friction_compensation": true,
                "g_lat_accel_ms2": -0.3,
                "lat_jerk_desired_ms3": 0.5
            }"#,
        )
        .unwrap();

        assert!((input.v_ego_ms - 20.0).abs() < f64::EPSILON);
        assert!(input.friction_compensation);

        assert!(CycleInput::from_json("not json").is_err());
    }
}
