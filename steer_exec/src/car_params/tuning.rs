//! Lateral control tuning structures
//!
//! Two tuning strategies exist: a gain-scheduled PID table used by the
//! minivan and SUV families, and a torque controller configuration used by
//! the pickups. The torque configurator pulls its per-platform calibration
//! from a fixed table.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use veh_if::car::{CarFamily, CarVariant};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gain-scheduled PID tuning, scheduled over vehicle speed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PidTuning {
    /// Proportional gain breakpoints.
    ///
    /// Units: meters/second
    pub kp_bp: [f64; 2],

    /// Proportional gains at each breakpoint.
    pub kp_v: [f64; 2],

    /// Integral gain breakpoints.
    ///
    /// Units: meters/second
    pub ki_bp: [f64; 2],

    /// Integral gains at each breakpoint.
    pub ki_v: [f64; 2],

    /// Feedforward scalar.
    pub kf: f64,
}

/// Torque controller tuning.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TorqueTuning {
    /// Use the measured steering angle for the correction term. Disabled on
    /// platforms whose angle signal is too coarse to correct against.
    pub use_steering_angle: bool,

    /// Proportional gain.
    pub kp: f64,

    /// Integral gain.
    pub ki: f64,

    /// Feedforward scalar.
    pub kf: f64,

    /// Steering angle dead band below which no correction is applied.
    ///
    /// Units: degrees
    pub steering_angle_deadzone_deg: f64,

    /// Offset applied to the lateral acceleration target.
    ///
    /// Units: meters/second^2
    pub lat_accel_offset_ms2: f64,
}

/// Per-platform lateral acceleration calibration.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TorqueParams {
    /// Lateral acceleration produced per unit of steering torque.
    pub lat_accel_factor: f64,

    /// Static friction of the steering rack, in torque units.
    pub friction: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The lateral tuning strategy for a platform.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum LatTuning {
    Pid(PidTuning),
    Torque(TorqueTuning),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the torque tuning for a platform.
///
/// `steering_angle_deadzone_deg` and `use_steering_angle` are the only
/// per-platform tunables, the gains are fixed. The calibration the
/// controller corrects against lives in [`TorqueParams`].
pub fn torque_tuning(
    steering_angle_deadzone_deg: f64,
    use_steering_angle: bool,
) -> TorqueTuning {
    TorqueTuning {
        use_steering_angle,
        kp: 1.0,
        ki: 0.1,
        kf: 1.0,
        steering_angle_deadzone_deg,
        lat_accel_offset_ms2: 0.0,
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TorqueParams {
    /// Look up the lateral acceleration calibration for a platform.
    pub fn for_variant(variant: CarVariant) -> Self {
        match variant.family() {
            CarFamily::Pacifica => TorqueParams {
                lat_accel_factor: 2.0,
                friction: 0.08,
            },
            CarFamily::Jeep => TorqueParams {
                lat_accel_factor: 1.9,
                friction: 0.08,
            },
            CarFamily::RamDt => TorqueParams {
                lat_accel_factor: 2.0,
                friction: 0.05,
            },
            CarFamily::RamHd => TorqueParams {
                lat_accel_factor: 1.4,
                friction: 0.11,
            },
        }
    }
}

impl PidTuning {
    /// The PID table shared by the minivan and SUV families.
    pub fn standard() -> Self {
        PidTuning {
            kp_bp: [9.0, 20.0],
            kp_v: [0.15, 0.30],
            ki_bp: [9.0, 20.0],
            ki_v: [0.03, 0.05],
            kf: 0.00006,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_torque_tuning_tunables() {
        let dt = torque_tuning(0.0, true);
        assert!(dt.use_steering_angle);
        assert_eq!(dt.steering_angle_deadzone_deg, 0.0);

        let hd = torque_tuning(1.0, false);
        assert!(!hd.use_steering_angle);
        assert_eq!(hd.steering_angle_deadzone_deg, 1.0);

        // Fixed gains are common to both
        assert_eq!(dt.kp, hd.kp);
        assert_eq!(dt.ki, hd.ki);
        assert_eq!(dt.kf, hd.kf);
    }

    #[test]
    fn test_calibration_table_positive() {
        for variant in [
            CarVariant::Pacifica2018,
            CarVariant::JeepCherokee,
            CarVariant::Ram1500,
            CarVariant::RamHd,
        ]
        .iter()
        {
            let params = TorqueParams::for_variant(*variant);
            assert!(params.lat_accel_factor > 0.0);
            assert!(params.friction > 0.0);
        }
    }
}
