//! # Data Store

use crate::lat_ctrl::{self, LatCtrl};
use veh_if::state::CycleInput;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // LatCtrl
    pub lat_ctrl: LatCtrl,

    /// The cycle input currently applied. Unlike the outputs this persists
    /// between cycles, the vehicle state holds until the next record
    /// arrives.
    pub lat_ctrl_input: CycleInput,

    pub lat_ctrl_output: lat_ctrl::CycleOutput,
    pub lat_ctrl_status_rpt: lat_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the previous cycle's output and sets the 1Hz cycle flag. The
    /// input is deliberately left alone, it holds until superseded.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.lat_ctrl_output = lat_ctrl::CycleOutput::default();
    }
}
