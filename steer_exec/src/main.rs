//! Main lateral-control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Resolve the vehicle parameters from the identification record
//!     - Initialise all modules
//!     - Main loop:
//!         - Vehicle state acquisition (drive script replay)
//!         - Lateral control processing:
//!             - Feedforward torque computation
//!             - Low speed lockout update
//!         - Archiving and telemetry logging
//!
//! # Modules
//!
//! All cyclic modules (e.g. `lat_ctrl`) shall meet the following
//! requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use steer_lib::{car_params::CarParams, data_store::DataStore};
use veh_if::car::CarIdentity;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    archive::Archived,
    drive_script::{DriveScript, PendingInputs},
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.01;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "steer_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Lateral Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD VEHICLE IDENTITY ----

    let identity: CarIdentity = util::params::load(
        "car_identity.toml"
    ).wrap_err("Could not load the vehicle identity")?;

    info!(
        "Vehicle identity loaded: variant \"{}\", {} firmware record(s)",
        identity.variant,
        identity.car_fw.len()
    );

    // ---- RESOLVE VEHICLE PARAMETERS ----

    // An unsupported variant is fatal, there is nothing sensible to steer.
    let car_params = CarParams::resolve(&identity)
        .wrap_err("Failed to resolve the vehicle parameters")?;

    info!("Parameters resolved for {:?}:", car_params.variant);
    info!("    mass: {:.0} kg, wheelbase: {:.3} m", car_params.mass_kg, car_params.wheelbase_m);
    info!("    min steer speed: {:.1} m/s", car_params.min_steer_speed_ms);
    info!("    feedforward strategy: {:?}", car_params.feedforward);

    // Keep a record of the resolved parameters with the session
    session.save("car_params.json", car_params.clone());

    // ---- LOAD DRIVE SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    // The script to replay is the single expected argument
    if args.len() != 2 {
        return Err(eyre!(
            "Expected exactly one argument (the drive script path), found {}",
            args.len() - 1
        ));
    }

    info!("Loading drive script from \"{}\"", &args[1]);

    let mut drive_script = DriveScript::new(&args[1])
        .wrap_err("Failed to load the drive script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} records\n",
        drive_script.get_duration(),
        drive_script.get_num_records()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.lat_ctrl.init(car_params, &session)
        .wrap_err("Failed to initialise LatCtrl")?;
    info!("LatCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- DATA INPUT ----

        // Apply any scripted state records which are due. If more than one
        // is due this cycle the latest wins, matching what the bus decoder
        // would have delivered.
        match drive_script.get_pending_inputs() {
            PendingInputs::None => (),
            PendingInputs::Some(input_vec) => {
                if let Some(input) = input_vec.last() {
                    ds.lat_ctrl_input = *input;
                }
            }
            // Exit if end of script reached
            PendingInputs::EndOfScript => {
                info!("End of drive script reached, stopping");
                break
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        let was_locked = ds.lat_ctrl_status_rpt.lockout_active;

        // LatCtrl processing
        match ds.lat_ctrl.proc(&ds.lat_ctrl_input) {
            Ok((o, r)) => {
                ds.lat_ctrl_output = o;
                ds.lat_ctrl_status_rpt = r;
            },
            Err(e) => {
                // A proc error here means the module was driven before init,
                // which is a programming error rather than bad input.
                warn!("Error during LatCtrl processing: {}", e)
            }
        };

        // Log lockout transitions
        if ds.lat_ctrl_status_rpt.lockout_active && !was_locked {
            warn!(
                "Speed below minimum steering speed, steering assist suppressed"
            );
        }
        if !ds.lat_ctrl_status_rpt.lockout_active && was_locked {
            info!("Steering assist available again");
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.lat_ctrl.write() {
            warn!("Could not write LatCtrl archives: {}", e);
        }

        // ---- TELEMETRY ----

        if ds.is_1_hz_cycle {
            info!(
                "v = {:5.1} m/s, ff torque = {:8.4}, lockout = {}",
                ds.lat_ctrl_input.v_ego_ms,
                ds.lat_ctrl_output.torque_ff,
                ds.lat_ctrl_status_rpt.lockout_active
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S)
            .checked_sub(cycle_dur)
        {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64()
                        - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    // Let the save thread flush before exiting
    session.exit();

    info!("End of execution");

    Ok(())
}
