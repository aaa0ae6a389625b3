//! # Safety configuration
//!
//! The safety config selects the base safety model enforced by the gating
//! hardware, plus optional platform sub-flags. At most one sub-flag may be
//! set for a given platform.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Safety param bit for the light-duty pickup platform.
pub const FLAG_RAM_DT: u32 = 1;

/// Safety param bit for the heavy-duty pickup platform.
pub const FLAG_RAM_HD: u32 = 2;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Base safety models understood by the gating hardware.
#[derive(Debug, Serialize, Eq, PartialEq, Copy, Clone)]
pub enum SafetyModel {
    Chrysler,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The full safety configuration for a platform.
#[derive(Debug, Serialize, Eq, PartialEq, Copy, Clone)]
pub struct SafetyConfig {
    /// The base safety model.
    pub safety_model: SafetyModel,

    /// Platform sub-flag bits ORed together. At most one of [`FLAG_RAM_DT`]
    /// and [`FLAG_RAM_HD`] may be set.
    pub safety_param: u32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SafetyConfig {
    /// Build a config for the given model with no sub-flags set.
    pub fn new(safety_model: SafetyModel) -> Self {
        Self {
            safety_model,
            safety_param: 0,
        }
    }
}
