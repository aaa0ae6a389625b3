//! # Firmware fingerprint records
//!
//! Each record pairs an ECU with the raw version byte string read from it.
//! Version comparisons downstream are byte-prefix lexical comparisons on
//! these strings, never numeric parses.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Deserializer};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// ECUs a firmware version can be read from.
#[derive(Debug, Deserialize, Eq, PartialEq, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum EcuKind {
    /// Electronic power steering
    Eps,
    /// Engine control
    Engine,
    /// Forward-facing camera
    FwdCamera,
    /// Forward-facing radar
    FwdRadar,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single (ECU, version bytes) fingerprint record.
#[derive(Debug, Deserialize, Clone)]
pub struct CarFw {
    /// The ECU this version was read from.
    pub ecu: EcuKind,

    /// The raw version byte string. Configuration files carry this as a
    /// plain string, it is stored as bytes.
    #[serde(deserialize_with = "bytes_from_string")]
    pub version: Vec<u8>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CarFw {
    /// Get the first `len` bytes of the version, or `None` if the version is
    /// shorter than `len`. Truncated records must never satisfy a version
    /// condition.
    pub fn version_prefix(&self, len: usize) -> Option<&[u8]> {
        self.version.get(..len)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Deserialise a version byte string from a plain string field.
fn bytes_from_string<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.into_bytes())
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_version_prefix() {
        let fw = CarFw {
            ecu: EcuKind::Eps,
            version: b"68412180AD".to_vec(),
        };

        assert_eq!(fw.version_prefix(4), Some(&b"6841"[..]));

        let short = CarFw {
            ecu: EcuKind::Eps,
            version: b"68".to_vec(),
        };

        assert_eq!(short.version_prefix(4), None);
    }
}
