//! Resolved vehicle parameters structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::tuning::{LatTuning, TorqueParams};
use crate::lat_ctrl::FeedforwardModel;
use veh_if::car::CarVariant;
use veh_if::safety::SafetyConfig;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The fixed parameter set of a vehicle, resolved once at startup.
///
/// Consumed by the control laws and safety gating downstream. All values are
/// fixed for the session once resolution completes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CarParams {
    /// The platform variant these parameters were resolved for.
    pub variant: CarVariant,

    // ---- CHASSIS ----

    /// Curb mass plus standard cargo allowance.
    ///
    /// Units: kilograms
    pub mass_kg: f64,

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    /// Steering wheel angle to road wheel angle ratio.
    pub steer_ratio: f64,

    /// Distance from the centre of mass to the front axle.
    ///
    /// Units: meters
    pub centre_to_front_m: f64,

    // ---- ACTUATION ----

    /// Delay between a steering command and the actuator responding.
    ///
    /// Units: seconds
    pub steer_actuator_delay_s: f64,

    /// Time the steering rate limit may be exceeded before faulting.
    ///
    /// Units: seconds
    pub steer_limit_timer_s: f64,

    /// Minimum speed at which the power steering accepts assist commands.
    /// Zero means the vehicle can be steered down to a standstill.
    ///
    /// Units: meters/second
    pub min_steer_speed_ms: f64,

    // ---- CAPABILITIES ----

    /// The factory radar cannot be used by the control stack.
    pub radar_unavailable: bool,

    /// The platform is supported for logging only, no actuation.
    pub dashcam_only: bool,

    /// Blind spot monitoring messages are present on the bus.
    pub enable_bsm: bool,

    // ---- SAFETY AND TUNING ----

    /// Safety model and platform sub-flags for the gating hardware.
    pub safety_config: SafetyConfig,

    /// Lateral control tuning for this platform.
    pub lat_tuning: LatTuning,

    /// Per-platform lateral acceleration calibration, used by the
    /// feedforward model.
    pub torque_params: TorqueParams,

    /// Which feedforward strategy to run, fixed for the session.
    pub feedforward: FeedforwardModel,
}
