//! # Drive script interpreter module
//!
//! This module provides an interpreter for recorded drive scripts, allowing
//! vehicle state to be replayed through the control loop in place of live
//! bus data. A script is a sequence of `time: payload;` lines, where the
//! payload is a JSON cycle-input record.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use veh_if::state::{CycleInput, StateParseError};
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A state record which is scripted to apply from a specific time.
pub struct Record {
    /// The time the record is supposed to apply at
    apply_time_s: f64,

    /// The cycle input to feed to the control loop
    input: CycleInput
}

/// A drive script interpreter.
///
/// After initialising with the path to the script to replay use
/// `.get_pending_inputs` to acquire the state records that apply now.
pub struct DriveScript {
    _script_path: PathBuf,
    records: VecDeque<Record>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid state record at {0} s: {1}")]
    InvalidRecord(f64, StateParseError)
}

pub enum PendingInputs {
    None,
    Some(Vec<CycleInput>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveScript {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(
                path.to_string_lossy().to_string()));
        }

        // Load the script into a string
        let script = match fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e))
        };

        // Empty queue of records
        let mut record_queue: VecDeque<Record> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .unwrap();

        let mut num_caps = 0;

        for cap in re.captures_iter(&script) {
            // Parse the apply time
            let apply_time_s: f64 = match cap.get(1).unwrap().as_str().parse() {
                Ok(t) => t,
                Err(e) => return Err(
                    ScriptError::InvalidTimestamp(format!("{}", e)))
            };

            // Parse the input from the payload. The scripts contain JSON only.
            let input = match CycleInput::from_json(
                cap.get(3).unwrap().as_str())
            {
                Ok(i) => i,
                Err(e) => return Err(ScriptError::InvalidRecord(
                    apply_time_s, e
                ))
            };

            // Build record from the match
            record_queue.push_back(Record {
                apply_time_s,
                input
            });

            num_caps += 1;
        }

        if num_caps == 0 {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(DriveScript {
            _script_path: path,
            records: record_queue
        })
    }

    /// Return a vector of pending inputs, or `None` if no records apply now.
    pub fn get_pending_inputs(&mut self) -> PendingInputs {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.records.is_empty() {
            return PendingInputs::EndOfScript
        }

        let mut input_vec: Vec<CycleInput> = vec![];

        let current_time_s = get_elapsed_seconds();

        // Peek items from the queue, if the head's apply time is lower than
        // the current time add it to the vector, and keep adding records
        // until the apply times are larger than the current time.
        while
            !self.records.is_empty()
            &&
            self.records.front().unwrap().apply_time_s < current_time_s
        {
            input_vec.push(self.records.pop_front().unwrap().input);
        }

        // If the vector is longer than 0 return Some, otherwise None
        if !input_vec.is_empty() {
            PendingInputs::Some(input_vec)
        }
        else {
            PendingInputs::None
        }
    }

    /// Get the number of records in the script
    pub fn get_num_records(&self) -> usize {
        self.records.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.records.back() {
            Some(r) => r.apply_time_s,
            None => 0f64
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    /// Write a script into the temp dir and return its path.
    fn write_script(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_script() {
        let path = write_script(
            "drive_script_parse_test.drs",
            "0.0: {\"v_ego_ms\": 20.0};\n\
             1.5: {\"v_ego_ms\": 14.0, \"lat_accel_desired_ms2\": 0.5};\n"
        );

        let script = DriveScript::new(&path).unwrap();
        assert_eq!(script.get_num_records(), 2);
        assert!((script.get_duration() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bad_payload() {
        let path = write_script(
            "drive_script_bad_payload_test.drs",
            "0.0: {\"v_ego_ms\": \"fast\"};\n"
        );

        assert!(matches!(
            DriveScript::new(&path),
            Err(ScriptError::InvalidRecord(_, _))
        ));
    }

    #[test]
    fn test_empty_script() {
        let path = write_script("drive_script_empty_test.drs", "# nothing\n");

        assert!(matches!(
            DriveScript::new(&path),
            Err(ScriptError::ScriptEmpty)
        ));
    }

    #[test]
    fn test_missing_script() {
        assert!(matches!(
            DriveScript::new("/nonexistent/path/to/script.drs"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }
}
