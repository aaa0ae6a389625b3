//! Low speed steering lockout
//!
//! The power steering refuses assist commands below the platform's minimum
//! steering speed. This state machine tracks whether assist is currently
//! suppressed, with hysteresis around the threshold so the state cannot
//! chatter when the vehicle hovers near it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Margin above the minimum steering speed below which the lockout engages.
///
/// Units: meters/second
const ENGAGE_MARGIN_MS: f64 = 0.5;

/// Margin above the minimum steering speed above which the lockout
/// releases. Must be greater than [`ENGAGE_MARGIN_MS`], the band between
/// the two is the hysteresis dead band.
///
/// Units: meters/second
const RELEASE_MARGIN_MS: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The lockout state, owned by the control loop for the drive session.
///
/// Starts unlocked. The state only ever changes through [`update`], once per
/// cycle.
///
/// [`update`]: LowSpeedLockout::update
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct LowSpeedLockout {
    active: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LowSpeedLockout {
    /// True if steering assist is currently suppressed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Update the lockout for this cycle and return the new state.
    ///
    /// A platform with a zero minimum steering speed never locks, and is
    /// never forced unlocked either - the state simply stays where it
    /// started.
    pub fn update(&mut self, v_ego_ms: f64, min_steer_speed_ms: f64) -> bool {
        if min_steer_speed_ms > 0.0 && v_ego_ms < min_steer_speed_ms + ENGAGE_MARGIN_MS {
            self.active = true;
        } else if v_ego_ms > min_steer_speed_ms + RELEASE_MARGIN_MS {
            self.active = false;
        }

        self.active
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hysteresis_sequence() {
        let mut lockout = LowSpeedLockout::default();
        let min_steer_speed_ms = 14.5;

        // 14.8 m/s sits in the dead band between the 15.0 engage and 15.5
        // release thresholds, so the state must hold
        let speeds = [20.0, 14.0, 14.8, 10.0, 16.0];
        let expected = [false, true, true, true, false];

        for (speed, expect) in speeds.iter().zip(expected.iter()) {
            assert_eq!(
                lockout.update(*speed, min_steer_speed_ms),
                *expect,
                "wrong state at {} m/s",
                speed
            );
        }
    }

    #[test]
    fn test_dead_band_holds_unlocked_too() {
        let mut lockout = LowSpeedLockout::default();

        // Unlocked and inside the dead band stays unlocked
        assert!(!lockout.update(20.0, 14.5));
        assert!(!lockout.update(15.2, 14.5));
    }

    #[test]
    fn test_zero_min_speed_never_locks() {
        let mut lockout = LowSpeedLockout::default();

        for speed in [0.0, 0.2, 0.9, 1.5, 30.0].iter() {
            assert!(!lockout.update(*speed, 0.0));
        }
    }

    #[test]
    fn test_engage_boundary() {
        let mut lockout = LowSpeedLockout::default();

        // Exactly at the engage threshold is not below it
        assert!(!lockout.update(15.0, 14.5));

        // Just under engages
        assert!(lockout.update(14.99, 14.5));

        // Exactly at the release threshold is not above it, state holds
        assert!(lockout.update(15.5, 14.5));

        // Just over releases
        assert!(!lockout.update(15.51, 14.5));
    }
}
