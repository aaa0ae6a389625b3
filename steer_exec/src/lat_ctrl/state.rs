//! Implementations for the LatCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{LatCtrlError, LowSpeedLockout};
use crate::car_params::CarParams;
use util::{
    archive::{Archived, Archiver},
    module::State,
    session::Session,
};
use veh_if::events::CarEvent;
use veh_if::state::CycleInput;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Lateral control module state
#[derive(Default)]
pub struct LatCtrl {
    /// Parameters resolved at startup, `None` until `init` runs.
    params: Option<CarParams>,

    lockout: LowSpeedLockout,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    pub(crate) output: Option<CycleOutput>,
    arch_output: Archiver,
}

/// Output command from LatCtrl for the steering command composer and the
/// event aggregator.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct CycleOutput {
    /// Feedforward steering torque demand, normalised to the platform's
    /// torque units.
    pub torque_ff: f64,

    /// The advisory raised this cycle, at most one.
    pub event: Option<CarEvent>,
}

/// Status report for LatCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Steering assist is suppressed below the minimum steering speed.
    pub lockout_active: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LatCtrl {
    type InitData = CarParams;
    type InitError = LatCtrlError;

    type InputData = CycleInput;
    type OutputData = CycleOutput;
    type StatusReport = StatusReport;
    type ProcError = LatCtrlError;

    /// Initialise the LatCtrl module.
    ///
    /// Expected init data is the parameter set resolved at startup.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Create the arch folder for lat_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("lat_ctrl");
        std::fs::create_dir_all(arch_path)
            .map_err(|e| LatCtrlError::ArchiveInitError(e.to_string()))?;

        // Initialise the archivers
        self.arch_report = Archiver::from_path(
            session, "lat_ctrl/status_report.csv"
        ).map_err(|e| LatCtrlError::ArchiveInitError(e.to_string()))?;
        self.arch_output = Archiver::from_path(
            session, "lat_ctrl/output.csv"
        ).map_err(|e| LatCtrlError::ArchiveInitError(e.to_string()))?;

        self.params = Some(init_data);

        Ok(())
    }

    /// Perform cyclic processing of Lateral Control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let params = match self.params {
            Some(ref p) => p,
            None => return Err(LatCtrlError::NotInitialised)
        };

        // Clear the status report
        self.report = StatusReport::default();

        // Feedforward torque for this cycle's demand
        let torque_ff = params
            .feedforward
            .compute(input_data, &params.torque_params);

        // Update the lockout against the current speed
        let locked = self
            .lockout
            .update(input_data.v_ego_ms, params.min_steer_speed_ms);
        self.report.lockout_active = locked;

        let output = CycleOutput {
            torque_ff,
            event: if locked {
                Some(CarEvent::BelowSteerSpeed)
            } else {
                None
            },
        };

        trace!(
            "LatCtrl output:\n    torque_ff: {:.6}\n    lockout: {}",
            output.torque_ff,
            locked
        );

        // Update the output in self
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for LatCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Write each one individually
        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output)?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_proc_before_init_fails() {
        let mut lat_ctrl = LatCtrl::default();

        assert!(matches!(
            lat_ctrl.proc(&CycleInput::default()),
            Err(LatCtrlError::NotInitialised)
        ));
    }
}
