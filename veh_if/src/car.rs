//! # Platform variant definitions
//!
//! Every supported vehicle is identified by a [`CarVariant`]. Variants group
//! into families which share most physical constants. Identification itself
//! (fingerprinting the bus) is done upstream, this module only names the
//! result.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// Internal
use crate::fw::CarFw;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A supported vehicle variant.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone)]
pub enum CarVariant {
    Pacifica2017Hybrid,
    Pacifica2018,
    Pacifica2018Hybrid,
    Pacifica2019Hybrid,
    Pacifica2020,
    JeepCherokee,
    JeepCherokee2019,
    Ram1500,
    RamHd,
}

/// The vehicle family a variant belongs to.
///
/// Families share chassis constants and lateral tuning. The heavy-duty pickup
/// is a separate family from the light-duty one even though the two share
/// most of their electrical architecture.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone)]
pub enum CarFamily {
    Pacifica,
    Jeep,
    RamDt,
    RamHd,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The identification record produced by the upstream fingerprinting step.
///
/// The variant is carried as the raw identifier string so that an
/// unrecognised platform can be rejected with a proper error rather than
/// failing deserialisation.
#[derive(Debug, Deserialize, Clone)]
pub struct CarIdentity {
    /// Raw variant identifier, see [`CarVariant::from_name`] for known values.
    pub variant: String,

    /// Firmware versions read from the vehicle's ECUs.
    #[serde(default)]
    pub car_fw: Vec<CarFw>,

    /// CAN message identifiers observed on bus 0 during fingerprinting.
    #[serde(default)]
    pub fingerprint: CanFingerprint,
}

/// The set of CAN message identifiers seen on bus 0 while fingerprinting.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CanFingerprint {
    pub bus0_msg_ids: BTreeSet<u32>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CarVariant {
    /// Parse a variant from its raw identifier, or `None` if the identifier
    /// names no known platform.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pacifica_2017_hybrid" => Some(CarVariant::Pacifica2017Hybrid),
            "pacifica_2018" => Some(CarVariant::Pacifica2018),
            "pacifica_2018_hybrid" => Some(CarVariant::Pacifica2018Hybrid),
            "pacifica_2019_hybrid" => Some(CarVariant::Pacifica2019Hybrid),
            "pacifica_2020" => Some(CarVariant::Pacifica2020),
            "jeep_cherokee" => Some(CarVariant::JeepCherokee),
            "jeep_cherokee_2019" => Some(CarVariant::JeepCherokee2019),
            "ram_1500" => Some(CarVariant::Ram1500),
            "ram_hd" => Some(CarVariant::RamHd),
            _ => None,
        }
    }

    /// Get the family this variant belongs to.
    pub fn family(&self) -> CarFamily {
        match self {
            CarVariant::Pacifica2017Hybrid
            | CarVariant::Pacifica2018
            | CarVariant::Pacifica2018Hybrid
            | CarVariant::Pacifica2019Hybrid
            | CarVariant::Pacifica2020 => CarFamily::Pacifica,
            CarVariant::JeepCherokee | CarVariant::JeepCherokee2019 => CarFamily::Jeep,
            CarVariant::Ram1500 => CarFamily::RamDt,
            CarVariant::RamHd => CarFamily::RamHd,
        }
    }

    /// True if the variant is one of the pickup families (light or heavy
    /// duty).
    pub fn is_ram(&self) -> bool {
        matches!(self.family(), CarFamily::RamDt | CarFamily::RamHd)
    }
}

impl CanFingerprint {
    /// True if the given CAN message identifier was seen on bus 0.
    pub fn has_msg(&self, id: u32) -> bool {
        self.bus0_msg_ids.contains(&id)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_variant_names() {
        assert_eq!(
            CarVariant::from_name("ram_1500"),
            Some(CarVariant::Ram1500)
        );
        assert_eq!(
            CarVariant::from_name("pacifica_2020"),
            Some(CarVariant::Pacifica2020)
        );
        assert_eq!(CarVariant::from_name("grand_caravan"), None);
    }

    #[test]
    fn test_families() {
        assert_eq!(CarVariant::Pacifica2018.family(), CarFamily::Pacifica);
        assert_eq!(CarVariant::JeepCherokee2019.family(), CarFamily::Jeep);
        assert_eq!(CarVariant::Ram1500.family(), CarFamily::RamDt);
        assert_eq!(CarVariant::RamHd.family(), CarFamily::RamHd);
        assert!(CarVariant::Ram1500.is_ram());
        assert!(CarVariant::RamHd.is_ram());
        assert!(!CarVariant::JeepCherokee.is_ram());
    }
}
