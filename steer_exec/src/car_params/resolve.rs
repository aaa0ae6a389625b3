//! Vehicle parameter resolution
//!
//! Resolution is a flat dispatch on the vehicle family followed by the
//! firmware overrides of the minimum steering speed. The override order is
//! load bearing: the higher-minimum override is applied last and supersedes
//! the older-firmware zero override.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::tuning::{torque_tuning, LatTuning, PidTuning, TorqueParams};
use super::{CarParams, CarParamsError};
use crate::lat_ctrl::FeedforwardModel;
use veh_if::car::{CanFingerprint, CarFamily, CarIdentity, CarVariant};
use veh_if::fw::{CarFw, EcuKind};
use veh_if::safety::{SafetyConfig, SafetyModel, FLAG_RAM_DT, FLAG_RAM_HD};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Standard cargo allowance added to every curb mass.
///
/// Units: kilograms
pub const STD_CARGO_KG: f64 = 136.0;

/// Ratio of the centre of mass to front axle distance over the wheelbase.
pub const CENTRE_TO_FRONT_RATIO: f64 = 0.44;

/// Minimum steering speed enforced on platforms with the newer power
/// steering firmware.
///
/// Units: meters/second
pub const HIGHER_MIN_STEER_SPEED_MS: f64 = 17.5;

/// CAN message identifier whose presence on bus 0 indicates blind spot
/// monitoring is fitted.
const BSM_MSG_ID: u32 = 720;

/// Number of version bytes compared against the firmware markers.
const EPS_FW_PREFIX_LEN: usize = 4;

/// Power steering firmware versions at or above this marker enforce the
/// higher minimum steering speed. Lexical byte comparison, not numeric.
const NEW_EPS_FW_MARKER: &[u8; 4] = b"6841";

/// Power steering firmware versions at or below this marker permit steering
/// down to a standstill on the light-duty pickup. Lexical byte comparison,
/// not numeric.
const OLD_EPS_FW_MARKER: &[u8; 4] = b"6831";

/// Platforms which ship the newer power steering firmware from the factory.
const NEW_EPS_PLATFORMS: [CarVariant; 3] = [
    CarVariant::Pacifica2019Hybrid,
    CarVariant::Pacifica2020,
    CarVariant::JeepCherokee2019,
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The per-family constant record resolution dispatches to.
struct FamilyRecord {
    mass_kg: f64,
    wheelbase_m: f64,
    steer_ratio: f64,
    steer_actuator_delay_s: f64,
    min_steer_speed_ms: f64,
    lat_tuning: LatTuning,
    feedforward: FeedforwardModel,
}

/// Minimum steering speed overrides derived from the observed firmware.
#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct SpeedOverrides {
    /// Older power steering firmware permits full-range steering.
    pub allow_zero: bool,

    /// Newer firmware or platform requires the higher minimum speed.
    pub higher_min: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CarParams {
    /// Resolve the parameter set from the identification record.
    ///
    /// Fails with [`CarParamsError::UnsupportedVehicle`] if the raw variant
    /// identifier names no known platform. No partial record is produced on
    /// failure.
    pub fn resolve(identity: &CarIdentity) -> Result<Self, CarParamsError> {
        let variant = CarVariant::from_name(&identity.variant)
            .ok_or_else(|| CarParamsError::UnsupportedVehicle(identity.variant.clone()))?;

        Ok(Self::resolve_variant(
            variant,
            &identity.car_fw,
            &identity.fingerprint,
        ))
    }

    /// Resolve the parameter set for a known variant.
    pub fn resolve_variant(
        variant: CarVariant,
        car_fw: &[CarFw],
        fingerprint: &CanFingerprint,
    ) -> Self {
        let record = family_record(variant);

        let overrides = fw_speed_overrides(variant, car_fw);
        let min_steer_speed_ms =
            apply_speed_overrides(record.min_steer_speed_ms, overrides);

        CarParams {
            variant,
            mass_kg: record.mass_kg,
            wheelbase_m: record.wheelbase_m,
            steer_ratio: record.steer_ratio,
            centre_to_front_m: record.wheelbase_m * CENTRE_TO_FRONT_RATIO,
            steer_actuator_delay_s: record.steer_actuator_delay_s,
            steer_limit_timer_s: 0.4,
            min_steer_speed_ms,
            // Radar parsing is not supported on this platform
            radar_unavailable: true,
            dashcam_only: variant.family() == CarFamily::RamHd,
            enable_bsm: fingerprint.has_msg(BSM_MSG_ID),
            safety_config: safety_config(variant),
            lat_tuning: record.lat_tuning,
            torque_params: TorqueParams::for_variant(variant),
            feedforward: record.feedforward,
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Look up the constant record for a variant's family.
fn family_record(variant: CarVariant) -> FamilyRecord {
    match variant.family() {
        CarFamily::Pacifica => FamilyRecord {
            mass_kg: 2242.0 + STD_CARGO_KG,
            wheelbase_m: 3.089,
            steer_ratio: 16.2,
            steer_actuator_delay_s: 0.1,
            min_steer_speed_ms: 3.8,
            lat_tuning: LatTuning::Pid(PidTuning::standard()),
            feedforward: FeedforwardModel::Linear,
        },
        CarFamily::Jeep => FamilyRecord {
            mass_kg: 1778.0 + STD_CARGO_KG,
            wheelbase_m: 2.71,
            steer_ratio: 16.7,
            steer_actuator_delay_s: 0.2,
            min_steer_speed_ms: 3.8,
            lat_tuning: LatTuning::Pid(PidTuning::standard()),
            feedforward: FeedforwardModel::Linear,
        },
        CarFamily::RamDt => FamilyRecord {
            mass_kg: 2493.0 + STD_CARGO_KG,
            wheelbase_m: 3.88,
            steer_ratio: 16.3,
            steer_actuator_delay_s: 0.2,
            min_steer_speed_ms: 14.5,
            lat_tuning: LatTuning::Torque(torque_tuning(0.0, true)),
            feedforward: FeedforwardModel::Sigmoid,
        },
        CarFamily::RamHd => FamilyRecord {
            mass_kg: 3405.0 + STD_CARGO_KG,
            wheelbase_m: 3.785,
            steer_ratio: 15.61,
            steer_actuator_delay_s: 0.2,
            min_steer_speed_ms: 16.0,
            // The angle signal on the heavy duty platform is too coarse for
            // the steering angle correction, and needs a wider dead band
            lat_tuning: LatTuning::Torque(torque_tuning(1.0, false)),
            feedforward: FeedforwardModel::Linear,
        },
    }
}

/// Derive the minimum steering speed overrides from the observed firmware.
fn fw_speed_overrides(variant: CarVariant, car_fw: &[CarFw]) -> SpeedOverrides {
    let mut overrides = SpeedOverrides::default();

    // Newer firmware is standard on some platforms, or flashed by a dealer
    // onto older ones. Not applicable to the pickups.
    if !variant.is_ram() {
        let new_eps_platform = NEW_EPS_PLATFORMS.contains(&variant);
        let new_eps_firmware = any_eps_prefix(car_fw, |prefix| {
            prefix >= &NEW_EPS_FW_MARKER[..]
        });

        if new_eps_platform || new_eps_firmware {
            overrides.higher_min = true;
        }
    }

    // Older power steering firmware on the light duty pickup allows steer to
    // zero
    if variant == CarVariant::Ram1500
        && any_eps_prefix(car_fw, |prefix| prefix <= &OLD_EPS_FW_MARKER[..])
    {
        overrides.allow_zero = true;
    }

    overrides
}

/// True if any power steering firmware record's 4 byte prefix satisfies the
/// predicate. Records shorter than the prefix never match.
fn any_eps_prefix<F>(car_fw: &[CarFw], predicate: F) -> bool
where
    F: Fn(&[u8]) -> bool,
{
    car_fw.iter().any(|fw| {
        fw.ecu == EcuKind::Eps
            && fw
                .version_prefix(EPS_FW_PREFIX_LEN)
                .map_or(false, &predicate)
    })
}

/// Apply the overrides to the family's base minimum steering speed.
///
/// The higher-minimum override is applied last so that it wins whenever both
/// overrides hold.
pub(crate) fn apply_speed_overrides(base_ms: f64, overrides: SpeedOverrides) -> f64 {
    let mut min_steer_speed_ms = base_ms;

    if overrides.allow_zero {
        min_steer_speed_ms = 0.0;
    }

    if overrides.higher_min {
        min_steer_speed_ms = HIGHER_MIN_STEER_SPEED_MS;
    }

    min_steer_speed_ms
}

/// Build the safety configuration for a variant. At most one platform
/// sub-flag is set.
fn safety_config(variant: CarVariant) -> SafetyConfig {
    let mut config = SafetyConfig::new(SafetyModel::Chrysler);

    match variant.family() {
        CarFamily::RamHd => config.safety_param |= FLAG_RAM_HD,
        CarFamily::RamDt => config.safety_param |= FLAG_RAM_DT,
        _ => (),
    }

    config
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const ALL_VARIANTS: [CarVariant; 9] = [
        CarVariant::Pacifica2017Hybrid,
        CarVariant::Pacifica2018,
        CarVariant::Pacifica2018Hybrid,
        CarVariant::Pacifica2019Hybrid,
        CarVariant::Pacifica2020,
        CarVariant::JeepCherokee,
        CarVariant::JeepCherokee2019,
        CarVariant::Ram1500,
        CarVariant::RamHd,
    ];

    fn eps_fw(version: &[u8]) -> CarFw {
        CarFw {
            ecu: EcuKind::Eps,
            version: version.to_vec(),
        }
    }

    fn engine_fw(version: &[u8]) -> CarFw {
        CarFw {
            ecu: EcuKind::Engine,
            version: version.to_vec(),
        }
    }

    fn resolve(variant: CarVariant, car_fw: &[CarFw]) -> CarParams {
        CarParams::resolve_variant(variant, car_fw, &CanFingerprint::default())
    }

    #[test]
    fn test_all_variants_resolve() {
        for variant in ALL_VARIANTS.iter() {
            let params = resolve(*variant, &[]);

            assert!(params.min_steer_speed_ms >= 0.0);
            assert!(params.mass_kg > 0.0);
            assert!(params.wheelbase_m > 0.0);
            assert!(params.steer_ratio > 0.0);
            assert!(
                (params.centre_to_front_m
                    - params.wheelbase_m * CENTRE_TO_FRONT_RATIO)
                    .abs()
                    < 1e-12
            );

            // At most one safety sub-flag
            let sub_flags = params.safety_config.safety_param;
            assert!(sub_flags == 0 || sub_flags == FLAG_RAM_DT || sub_flags == FLAG_RAM_HD);
        }
    }

    #[test]
    fn test_safety_sub_flags() {
        assert_eq!(
            resolve(CarVariant::Ram1500, &[]).safety_config.safety_param,
            FLAG_RAM_DT
        );
        assert_eq!(
            resolve(CarVariant::RamHd, &[]).safety_config.safety_param,
            FLAG_RAM_HD
        );
        assert_eq!(
            resolve(CarVariant::Pacifica2018, &[]).safety_config.safety_param,
            0
        );
        assert_eq!(
            resolve(CarVariant::JeepCherokee, &[]).safety_config.safety_param,
            0
        );
    }

    #[test]
    fn test_dashcam_only_heavy_duty() {
        assert!(resolve(CarVariant::RamHd, &[]).dashcam_only);
        assert!(!resolve(CarVariant::Ram1500, &[]).dashcam_only);
        assert!(!resolve(CarVariant::Pacifica2020, &[]).dashcam_only);
    }

    #[test]
    fn test_new_eps_platforms_get_higher_min_speed() {
        for variant in [
            CarVariant::Pacifica2019Hybrid,
            CarVariant::Pacifica2020,
            CarVariant::JeepCherokee2019,
        ]
        .iter()
        {
            assert_eq!(
                resolve(*variant, &[]).min_steer_speed_ms,
                HIGHER_MIN_STEER_SPEED_MS
            );
        }

        // Older platforms keep the family minimum without newer firmware
        assert_eq!(resolve(CarVariant::Pacifica2018, &[]).min_steer_speed_ms, 3.8);
        assert_eq!(resolve(CarVariant::JeepCherokee, &[]).min_steer_speed_ms, 3.8);
    }

    #[test]
    fn test_new_eps_firmware_gets_higher_min_speed() {
        let params = resolve(CarVariant::Pacifica2018, &[eps_fw(b"68412180AD")]);
        assert_eq!(params.min_steer_speed_ms, HIGHER_MIN_STEER_SPEED_MS);

        // The comparison is lexical on the first four bytes
        let params = resolve(CarVariant::Pacifica2018, &[eps_fw(b"6842")]);
        assert_eq!(params.min_steer_speed_ms, HIGHER_MIN_STEER_SPEED_MS);

        // Older firmware does not trigger it
        let params = resolve(CarVariant::Pacifica2018, &[eps_fw(b"68350180AC")]);
        assert_eq!(params.min_steer_speed_ms, 3.8);
    }

    #[test]
    fn test_non_eps_firmware_ignored() {
        let params = resolve(CarVariant::Pacifica2018, &[engine_fw(b"68412180AD")]);
        assert_eq!(params.min_steer_speed_ms, 3.8);

        let params = resolve(CarVariant::Ram1500, &[engine_fw(b"68310180AA")]);
        assert_eq!(params.min_steer_speed_ms, 14.5);
    }

    #[test]
    fn test_short_fw_version_never_matches() {
        let params = resolve(CarVariant::Pacifica2018, &[eps_fw(b"68")]);
        assert_eq!(params.min_steer_speed_ms, 3.8);

        let params = resolve(CarVariant::Ram1500, &[eps_fw(b"683")]);
        assert_eq!(params.min_steer_speed_ms, 14.5);
    }

    #[test]
    fn test_old_eps_firmware_allows_steer_to_zero() {
        let params = resolve(CarVariant::Ram1500, &[eps_fw(b"68310180AA")]);
        assert_eq!(params.min_steer_speed_ms, 0.0);

        // Newer firmware keeps the base minimum
        let params = resolve(CarVariant::Ram1500, &[eps_fw(b"68412180AD")]);
        assert_eq!(params.min_steer_speed_ms, 14.5);

        // The zero override applies to the light duty pickup only
        let params = resolve(CarVariant::RamHd, &[eps_fw(b"68310180AA")]);
        assert_eq!(params.min_steer_speed_ms, 16.0);
    }

    #[test]
    fn higher_min_speed_wins_over_fw_zero() {
        // When both overrides hold the higher minimum is applied last and
        // wins
        let both = SpeedOverrides {
            allow_zero: true,
            higher_min: true,
        };

        assert_eq!(
            apply_speed_overrides(14.5, both),
            HIGHER_MIN_STEER_SPEED_MS
        );
    }

    #[test]
    fn test_mixed_fw_on_light_duty_pickup() {
        // The pickup is excluded from the higher-minimum condition, so an
        // old-firmware record wins even when a newer record is also present
        let params = resolve(
            CarVariant::Ram1500,
            &[eps_fw(b"68412180AD"), eps_fw(b"68310180AA")],
        );
        assert_eq!(params.min_steer_speed_ms, 0.0);
    }

    #[test]
    fn test_enable_bsm() {
        let mut fingerprint = CanFingerprint::default();
        assert!(!CarParams::resolve_variant(CarVariant::Pacifica2018, &[], &fingerprint).enable_bsm);

        fingerprint.bus0_msg_ids.insert(720);
        assert!(CarParams::resolve_variant(CarVariant::Pacifica2018, &[], &fingerprint).enable_bsm);
    }

    #[test]
    fn test_feedforward_strategy_selection() {
        assert_eq!(
            resolve(CarVariant::Ram1500, &[]).feedforward,
            FeedforwardModel::Sigmoid
        );

        for variant in ALL_VARIANTS.iter().filter(|v| **v != CarVariant::Ram1500) {
            assert_eq!(resolve(*variant, &[]).feedforward, FeedforwardModel::Linear);
        }
    }

    #[test]
    fn test_tuning_strategy_selection() {
        assert!(matches!(
            resolve(CarVariant::Pacifica2018, &[]).lat_tuning,
            LatTuning::Pid(_)
        ));
        assert!(matches!(
            resolve(CarVariant::JeepCherokee, &[]).lat_tuning,
            LatTuning::Pid(_)
        ));
        assert!(matches!(
            resolve(CarVariant::Ram1500, &[]).lat_tuning,
            LatTuning::Torque(_)
        ));
        assert!(matches!(
            resolve(CarVariant::RamHd, &[]).lat_tuning,
            LatTuning::Torque(_)
        ));
    }

    #[test]
    fn test_unsupported_vehicle() {
        let identity = CarIdentity {
            variant: String::from("grand_caravan"),
            car_fw: vec![],
            fingerprint: CanFingerprint::default(),
        };

        assert!(matches!(
            CarParams::resolve(&identity),
            Err(CarParamsError::UnsupportedVehicle(_))
        ));
    }
}
