//! Randomized demo payloads for the two query commands and the periodic
//! status frame.
//!
//! The emulator has no real sensors; snapshot content is generated fresh
//! on every query, within plausible ranges for the emulated hardware.

use rand::rngs::ThreadRng;
use rand::Rng;

use scopesim_proto::{CoefRow, DeviceStatus, Profile};

const PROFILE_NAMES: &[&str] = &["338LM 250gr", "308Win 168gr", "6.5CM 140gr"];
const CARTRIDGE_NAMES: &[&str] = &["Lapua Magnum", "Federal GMM", "Hornady ELD"];
const BULLET_NAMES: &[&str] = &["Scenar OTM", "Sierra MK", "ELD Match"];

/// Generates fixture snapshots from an owned RNG.
///
/// Each task constructs its own; nothing is shared.
pub struct Fixtures<R = ThreadRng> {
    rng: R,
}

impl Fixtures<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for Fixtures<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Fixtures<R> {
    /// Build a generator over an explicit RNG (seeded in tests).
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Full environment/sensor snapshot for a status query.
    pub fn dev_status(&mut self) -> DeviceStatus {
        DeviceStatus {
            charge: self.rng.random_range(0..=100),
            zoom: self.rng.random_range(1..=8),
            air_temp: self.rng.random_range(-40..=50),
            air_hum: self.rng.random_range(0..=100),
            air_press: self.rng.random_range(9_000..=11_000),
            powder_temp: self.rng.random_range(-40..=50),
            wind_direction: self.rng.random_range(0..360),
            wind_speed: self.rng.random_range(0..=30),
            pitch: self.rng.random_range(-90..=90),
            cant: self.rng.random_range(-45..=45),
            distance: self.rng.random_range(50..=2_000),
        }
    }

    /// Status snapshot for the periodic emitter: a randomized charge
    /// measurement over baseline values.
    pub fn charge_status(&mut self) -> DeviceStatus {
        DeviceStatus {
            charge: self.rng.random_range(0..=100),
            ..DeviceStatus::default()
        }
    }

    /// Ballistic/calibration snapshot for a profile query.
    pub fn profile(&mut self) -> Profile {
        let pick = self.rng.random_range(0..PROFILE_NAMES.len());
        let distance_count = self.rng.random_range(4..=12u32);
        let coef_count = self.rng.random_range(1..=3);

        Profile {
            profile_name: PROFILE_NAMES[pick].to_string(),
            cartridge_name: CARTRIDGE_NAMES[pick].to_string(),
            bullet_name: BULLET_NAMES[pick].to_string(),
            zero_x: self.rng.random_range(-600_000..=600_000),
            zero_y: self.rng.random_range(-600_000..=600_000),
            muzzle_velocity: self.rng.random_range(700..=1_000),
            zero_distance_index: self.rng.random_range(0..distance_count),
            distances: (1..=distance_count).map(|i| i * 100).collect(),
            coef_rows: (0..coef_count)
                .map(|_| CoefRow {
                    bc_cd: self.rng.random_range(300..=700),
                    mv_temp: self.rng.random_range(-40..=50),
                })
                .collect(),
        }
    }
}
