//! Feedforward steering torque models
//!
//! Two strategies exist. The light duty pickup uses a hand-fit sigmoid plus
//! linear model which captures the nonlinearity of its steering rack, every
//! other platform uses the baseline linear model. The strategy is resolved
//! once at startup and fixed for the session, see
//! [`crate::car_params::CarParams::feedforward`].
//!
//! Both models are pure functions of the cycle input and the platform's
//! lateral acceleration calibration. There are no failure modes, speed is
//! clamped internally before exponentiation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::car_params::TorqueParams;
use util::maths::interp;
use veh_if::state::CycleInput;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lateral jerk at which the sigmoid model's friction compensation
/// saturates.
///
/// Units: meters/second^3
const FRICTION_THRESHOLD_LAT_JERK: f64 = 2.0;

/// Lateral acceleration error at which the linear model's friction
/// compensation saturates.
///
/// Units: meters/second^2
const FRICTION_THRESHOLD_LAT_ACCEL: f64 = 0.3;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The feedforward strategy for a platform, resolved once at startup.
#[derive(Debug, Serialize, Eq, PartialEq, Copy, Clone)]
pub enum FeedforwardModel {
    /// Speed-dependent sigmoid plus linear model, light duty pickup only.
    Sigmoid,

    /// Baseline linear model, all other platforms.
    Linear,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FeedforwardModel {
    /// Compute the feedforward steering torque for this cycle.
    pub fn compute(&self, input: &CycleInput, torque_params: &TorqueParams) -> f64 {
        match self {
            FeedforwardModel::Sigmoid => sigmoid_model(input, torque_params),
            FeedforwardModel::Linear => linear_model(input, torque_params),
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The sigmoid plus linear model fit to the light duty pickup.
///
/// The sigmoid term models the rack's friction and backlash, which grow with
/// lateral demand and shrink with speed. The linear term is the dominant
/// first order response. Friction compensation anticipates static friction
/// breakaway from the demanded rate of change rather than the current error,
/// and the gravity term compensates road roll.
fn sigmoid_model(input: &CycleInput, torque_params: &TorqueParams) -> f64 {
    const ANGLE_COEF: f64 = 3.79351891;
    const ANGLE_COEF2: f64 = 0.22;
    const ANGLE_OFFSET: f64 = 0.0;
    const SPEED_OFFSET: f64 = 15.0;
    const SIGMOID_COEF_RIGHT: f64 = 0.50;
    const SIGMOID_COEF_LEFT: f64 = 0.48228739;
    const SPEED_COEF: f64 = 2.0;
    const SPEED_COEF2: f64 = 0.1;
    const SPEED_OFFSET2: f64 = 30.0;
    const SPEED_GAIN: f64 = 40.23;
    const G_LAT_FACTOR: f64 = 0.7;

    let lat_accel = input.lat_accel_desired_ms2 + ANGLE_OFFSET;

    let x = ANGLE_COEF
        * lat_accel
        * (SPEED_GAIN / (input.v_ego_ms + SPEED_OFFSET).max(1.0).powf(SPEED_COEF));

    // The rack is not symmetric, the left and right lobes carry separate
    // coefficients
    let sigmoid_factor = if lat_accel < 0.0 {
        SIGMOID_COEF_RIGHT
    } else {
        SIGMOID_COEF_LEFT
    };

    let mut sigmoid = x / (1.0 + x.abs());
    sigmoid *= sigmoid_factor * sigmoid_factor;

    // Secondary speed decay with a floor so the term never vanishes
    sigmoid *=
        (SPEED_GAIN / (input.v_ego_ms + SPEED_OFFSET2).max(1.0).powf(SPEED_COEF2)).max(0.2);

    let linear = ANGLE_COEF2 * lat_accel;

    let friction = interp(
        input.lat_jerk_desired_ms3,
        &[-FRICTION_THRESHOLD_LAT_JERK, FRICTION_THRESHOLD_LAT_JERK],
        &[-torque_params.friction, torque_params.friction],
    );

    sigmoid + linear + friction + input.g_lat_accel_ms2 * G_LAT_FACTOR
}

/// The baseline linear model: torque proportional to the demanded lateral
/// acceleration, with friction compensation driven by the deadzoned error.
fn linear_model(input: &CycleInput, torque_params: &TorqueParams) -> f64 {
    let error = apply_centre_deadzone(
        input.lat_accel_error_ms2,
        input.lat_accel_deadzone_ms2,
    );

    let friction_interp = interp(
        error,
        &[-FRICTION_THRESHOLD_LAT_ACCEL, FRICTION_THRESHOLD_LAT_ACCEL],
        &[-torque_params.friction, torque_params.friction],
    );

    let friction = if input.friction_compensation {
        friction_interp
    } else {
        0.0
    };

    input.lat_accel_desired_ms2 / torque_params.lat_accel_factor + friction
}

/// Zero the error inside the dead band.
fn apply_centre_deadzone(error: f64, deadzone: f64) -> f64 {
    if -deadzone < error && error < deadzone {
        0.0
    } else {
        error
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn torque_params() -> TorqueParams {
        TorqueParams {
            lat_accel_factor: 2.0,
            friction: 0.05,
        }
    }

    fn input_at(v_ego_ms: f64, lat_accel_desired_ms2: f64) -> CycleInput {
        CycleInput {
            v_ego_ms,
            lat_accel_desired_ms2,
            ..CycleInput::default()
        }
    }

    #[test]
    fn test_sigmoid_zero_demand_is_zero() {
        // No demand, no jerk, no roll, cruising speed
        let input = input_at(20.0, 0.0);

        assert_eq!(
            FeedforwardModel::Sigmoid.compute(&input, &torque_params()),
            0.0
        );
    }

    #[test]
    fn test_sigmoid_left_right_asymmetry() {
        // The left and right sigmoid coefficients differ, so the output
        // magnitude must differ for mirrored demands
        let left = FeedforwardModel::Sigmoid
            .compute(&input_at(20.0, 1.5), &torque_params());
        let right = FeedforwardModel::Sigmoid
            .compute(&input_at(20.0, -1.5), &torque_params());

        assert!(left > 0.0);
        assert!(right < 0.0);
        assert!((left.abs() - right.abs()).abs() > 1e-6);
    }

    #[test]
    fn test_sigmoid_friction_clamps_at_jerk_threshold() {
        let mut at_threshold = input_at(20.0, 1.0);
        at_threshold.lat_jerk_desired_ms3 = 2.0;

        let mut beyond_threshold = at_threshold;
        beyond_threshold.lat_jerk_desired_ms3 = 5.0;

        let params = torque_params();
        assert_eq!(
            FeedforwardModel::Sigmoid.compute(&at_threshold, &params),
            FeedforwardModel::Sigmoid.compute(&beyond_threshold, &params)
        );
    }

    #[test]
    fn test_sigmoid_friction_is_interpolated() {
        let params = torque_params();

        let mut half_jerk = input_at(20.0, 1.0);
        half_jerk.lat_jerk_desired_ms3 = 1.0;

        let mut no_jerk = half_jerk;
        no_jerk.lat_jerk_desired_ms3 = 0.0;

        let diff = FeedforwardModel::Sigmoid.compute(&half_jerk, &params)
            - FeedforwardModel::Sigmoid.compute(&no_jerk, &params);

        // Half the threshold jerk contributes half the friction coefficient
        assert!((diff - params.friction * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_gravity_term() {
        let params = torque_params();

        let mut rolled = input_at(20.0, 0.0);
        rolled.g_lat_accel_ms2 = 1.0;

        assert!(
            (FeedforwardModel::Sigmoid.compute(&rolled, &params) - 0.7).abs() < 1e-12
        );
    }

    #[test]
    fn test_sigmoid_low_speed_clamp() {
        // Speeds far below the offset must not blow up the model
        let params = torque_params();
        let out = FeedforwardModel::Sigmoid.compute(&input_at(-20.0, 1.0), &params);

        assert!(out.is_finite());
    }

    #[test]
    fn test_linear_proportional_term() {
        let input = input_at(20.0, 1.0);

        assert!(
            (FeedforwardModel::Linear.compute(&input, &torque_params()) - 0.5).abs()
                < 1e-12
        );
    }

    #[test]
    fn test_linear_deadzone_suppresses_friction() {
        let params = torque_params();

        let mut input = input_at(20.0, 0.0);
        input.friction_compensation = true;
        input.lat_accel_deadzone_ms2 = 0.1;
        input.lat_accel_error_ms2 = 0.05;

        // Error inside the dead band contributes nothing
        assert_eq!(FeedforwardModel::Linear.compute(&input, &params), 0.0);

        // Outside the dead band it does
        input.lat_accel_error_ms2 = 0.2;
        assert!(FeedforwardModel::Linear.compute(&input, &params) > 0.0);
    }

    #[test]
    fn test_linear_friction_clamps() {
        let params = torque_params();

        let mut at_threshold = input_at(20.0, 0.0);
        at_threshold.friction_compensation = true;
        at_threshold.lat_accel_error_ms2 = 0.3;

        let mut beyond_threshold = at_threshold;
        beyond_threshold.lat_accel_error_ms2 = 2.0;

        let clamped = FeedforwardModel::Linear.compute(&at_threshold, &params);
        assert_eq!(
            clamped,
            FeedforwardModel::Linear.compute(&beyond_threshold, &params)
        );
        assert!((clamped - params.friction).abs() < 1e-12);
    }

    #[test]
    fn test_linear_friction_disabled() {
        let params = torque_params();

        let mut input = input_at(20.0, 0.0);
        input.friction_compensation = false;
        input.lat_accel_error_ms2 = 0.3;

        assert_eq!(FeedforwardModel::Linear.compute(&input, &params), 0.0);
    }
}
