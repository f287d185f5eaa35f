//! Machine Simulator - Correlated sensor readings for a single machine
//!
//! Owns one sensor profile and advances its wear state on every tick.
//! Sensor values are sampled around slowly drifting baselines and clamped
//! to the configured physical ranges before they leave this module.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::logic::config::SensorRanges;
use crate::logic::error::CoreError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Cycle interval at which sensor baselines drift
const BASELINE_DRIFT_INTERVAL: u64 = 100;

/// Wear fraction above which torque starts to climb
const HIGH_WEAR_FACTOR: f64 = 0.6;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Product quality variant of a machine. Closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineType {
    L,
    M,
    H,
}

impl MachineType {
    pub const ALL: [MachineType; 3] = [MachineType::L, MachineType::M, MachineType::H];

    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::L => "L",
            MachineType::M => "M",
            MachineType::H => "H",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(MachineType::L),
            "M" => Ok(MachineType::M),
            "H" => Ok(MachineType::H),
            other => Err(CoreError::InvalidInput(format!(
                "unknown machine type `{}` (expected L, M or H)",
                other
            ))),
        }
    }
}

/// Operating mode carried on every reading. Always `normal` today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Normal,
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Normal => f.write_str("normal"),
        }
    }
}

/// Named starting condition of a machine at fleet initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialCondition {
    /// Low wear, optimal sensor values
    Healthy,
    /// High wear, approaching the maintenance threshold
    Risk,
    /// Very high wear, clearly degraded sensor values
    Maintenance,
}

/// Per-machine baseline parameters and degradation state.
///
/// Tool wear is non-decreasing except on an explicit maintenance reset;
/// baselines mutate only at fixed cycle intervals or on maintenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorProfile {
    pub machine_id: String,
    pub machine_type: MachineType,
    pub tool_wear: f64,
    pub air_temp_baseline: f64,
    pub process_temp_baseline: f64,
    pub speed_baseline: f64,
    pub torque_baseline: f64,
    pub degradation_rate: f64,
    pub operating_mode: OperatingMode,
    pub cycles: u64,
}

/// One sensor reading. Immutable once produced.
///
/// Serializes with the external bracketed-unit field names so a reading
/// can be handed straight to the API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub machine_id: String,
    #[serde(rename = "Type")]
    pub machine_type: MachineType,
    #[serde(rename = "Air temperature [K]")]
    pub air_temperature: f64,
    #[serde(rename = "Process temperature [K]")]
    pub process_temperature: f64,
    #[serde(rename = "Rotational speed [rpm]")]
    pub rotational_speed: f64,
    #[serde(rename = "Torque [Nm]")]
    pub torque: f64,
    #[serde(rename = "Tool wear [min]")]
    pub tool_wear: f64,
    pub timestamp: DateTime<Utc>,
    pub operating_mode: OperatingMode,
    pub cycles: u64,
}

// ============================================================================
// MACHINE SIMULATOR
// ============================================================================

/// Simulates sensor data for a single machine.
#[derive(Debug)]
pub struct MachineSimulator {
    profile: SensorProfile,
    ranges: SensorRanges,
    rng: StdRng,
}

impl MachineSimulator {
    /// Create a machine with entropy-seeded randomness.
    pub fn new(
        machine_id: impl Into<String>,
        machine_type: MachineType,
        condition: InitialCondition,
        ranges: SensorRanges,
    ) -> Self {
        Self::with_rng(machine_id, machine_type, condition, ranges, StdRng::from_entropy())
    }

    /// Create a machine with a fixed seed. Readings become reproducible.
    pub fn with_seed(
        machine_id: impl Into<String>,
        machine_type: MachineType,
        condition: InitialCondition,
        ranges: SensorRanges,
        seed: u64,
    ) -> Self {
        Self::with_rng(machine_id, machine_type, condition, ranges, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        machine_id: impl Into<String>,
        machine_type: MachineType,
        condition: InitialCondition,
        ranges: SensorRanges,
        mut rng: StdRng,
    ) -> Self {
        let profile = sample_profile(machine_id.into(), machine_type, condition, &mut rng);
        Self { profile, ranges, rng }
    }

    pub fn profile(&self) -> &SensorProfile {
        &self.profile
    }

    pub fn machine_id(&self) -> &str {
        &self.profile.machine_id
    }

    pub fn tool_wear(&self) -> f64 {
        self.profile.tool_wear
    }

    /// Generate one correlated sensor reading and advance the wear state.
    pub fn generate_reading(&mut self) -> Reading {
        let Self { profile, ranges, rng } = self;

        profile.cycles += 1;

        // Gradual tool wear increase
        let wear_increment = profile.degradation_rate * rng.gen_range(0.1..0.3);
        let wear_max = ranges.tool_wear.max;
        profile.tool_wear = (profile.tool_wear + wear_increment).min(wear_max);
        let wear_factor = profile.tool_wear / wear_max;

        // Air temperature, slow variations around the baseline
        let air_noise = Normal::new(0.0, 0.2).unwrap().sample(rng);
        let air_temp = ranges.air_temperature.clamp(profile.air_temp_baseline + air_noise);

        // Process temperature, correlated with air temp, rises with wear
        let process_base = air_temp + rng.gen_range(8.0..12.0);
        let process_noise = Normal::new(0.0, 0.3).unwrap().sample(rng) + wear_factor * 1.0;
        let process_temp = ranges.process_temperature.clamp(process_base + process_noise);

        // Rotational speed, stable with minor variations
        let speed_noise = Normal::new(0.0, 20.0).unwrap().sample(rng);
        let speed = ranges.rotational_speed.clamp(profile.speed_baseline + speed_noise);

        // Torque, climbs slightly once wear is high
        let mut base_torque = profile.torque_baseline;
        if wear_factor > HIGH_WEAR_FACTOR {
            base_torque += rng.gen_range(0.0..3.0);
        }
        let torque_noise = Normal::new(0.0, 1.5).unwrap().sample(rng);
        let torque = ranges.torque.clamp(base_torque + torque_noise);

        // Long-term baseline drift, the only baseline mutation path
        // besides maintenance
        if profile.cycles % BASELINE_DRIFT_INTERVAL == 0 {
            profile.air_temp_baseline += rng.gen_range(-0.1..0.1);
            profile.speed_baseline += rng.gen_range(-5.0..5.0);
            profile.torque_baseline += rng.gen_range(-0.5..0.5);
        }

        Reading {
            machine_id: profile.machine_id.clone(),
            machine_type: profile.machine_type,
            air_temperature: round1(air_temp),
            process_temperature: round1(process_temp),
            rotational_speed: speed.trunc(),
            torque: round1(torque),
            tool_wear: profile.tool_wear.trunc(),
            timestamp: Utc::now(),
            operating_mode: profile.operating_mode,
            cycles: profile.cycles,
        }
    }

    /// Maintenance event. The only operation that decreases wear.
    pub fn reset_wear(&mut self) {
        self.profile.tool_wear = self.rng.gen_range(0.0..20.0);
        self.profile.degradation_rate = self.rng.gen_range(0.2..0.5);
        log::info!(
            "Maintenance performed on {} - tool wear reset to {}min",
            self.profile.machine_id,
            self.profile.tool_wear as u64
        );
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn sample_profile(
    machine_id: String,
    machine_type: MachineType,
    condition: InitialCondition,
    rng: &mut StdRng,
) -> SensorProfile {
    let (tool_wear, air, process, speed, torque, rate) = match condition {
        InitialCondition::Healthy => (
            rng.gen_range(5.0..45.0),
            rng.gen_range(296.0..299.5),
            rng.gen_range(306.0..309.5),
            rng.gen_range(1600.0..2100.0),
            rng.gen_range(22.0..38.0),
            rng.gen_range(0.15..0.3),
        ),
        InitialCondition::Risk => (
            rng.gen_range(165.0..185.0),
            rng.gen_range(301.0..303.0),
            rng.gen_range(311.2..312.8),
            rng.gen_range(1240.0..1300.0),
            rng.gen_range(63.0..68.0),
            rng.gen_range(0.2..0.35),
        ),
        InitialCondition::Maintenance => (
            rng.gen_range(180.0..220.0),
            rng.gen_range(301.0..303.5),
            rng.gen_range(311.0..313.0),
            rng.gen_range(1220.0..1320.0),
            rng.gen_range(62.0..70.0),
            rng.gen_range(0.2..0.35),
        ),
    };

    SensorProfile {
        machine_id,
        machine_type,
        tool_wear,
        air_temp_baseline: air,
        process_temp_baseline: process,
        speed_baseline: speed,
        torque_baseline: torque,
        degradation_rate: rate,
        operating_mode: OperatingMode::Normal,
        cycles: 0,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(condition: InitialCondition, seed: u64) -> MachineSimulator {
        MachineSimulator::with_seed("M001", MachineType::M, condition, SensorRanges::default(), seed)
    }

    #[test]
    fn test_readings_stay_within_configured_ranges() {
        let ranges = SensorRanges::default();
        for condition in [
            InitialCondition::Healthy,
            InitialCondition::Risk,
            InitialCondition::Maintenance,
        ] {
            let mut sim = machine(condition, 7);
            for _ in 0..500 {
                let r = sim.generate_reading();
                assert!(ranges.air_temperature.contains(r.air_temperature), "air {}", r.air_temperature);
                assert!(ranges.process_temperature.contains(r.process_temperature));
                assert!(ranges.rotational_speed.contains(r.rotational_speed));
                assert!(ranges.torque.contains(r.torque));
                assert!(ranges.tool_wear.contains(r.tool_wear));
            }
        }
    }

    #[test]
    fn test_tool_wear_monotonic_until_reset() {
        let mut sim = machine(InitialCondition::Maintenance, 11);
        let mut previous = sim.tool_wear();
        for _ in 0..200 {
            sim.generate_reading();
            assert!(sim.tool_wear() >= previous);
            previous = sim.tool_wear();
        }

        let before_reset = sim.tool_wear();
        assert!(before_reset >= 180.0);

        sim.reset_wear();
        assert!(sim.tool_wear() < 20.0);
        assert!(sim.tool_wear() < before_reset);
        let rate = sim.profile().degradation_rate;
        assert!((0.2..0.5).contains(&rate));
    }

    #[test]
    fn test_tool_wear_saturates_at_maximum() {
        let mut sim = machine(InitialCondition::Maintenance, 3);
        for _ in 0..4000 {
            let r = sim.generate_reading();
            assert!(r.tool_wear <= 250.0);
        }
        assert_eq!(sim.tool_wear(), 250.0);
    }

    #[test]
    fn test_baselines_drift_only_on_interval() {
        let mut sim = machine(InitialCondition::Healthy, 42);
        let air = sim.profile().air_temp_baseline;
        let speed = sim.profile().speed_baseline;
        let torque = sim.profile().torque_baseline;

        for _ in 0..99 {
            sim.generate_reading();
        }
        assert_eq!(sim.profile().air_temp_baseline, air);
        assert_eq!(sim.profile().speed_baseline, speed);
        assert_eq!(sim.profile().torque_baseline, torque);

        sim.generate_reading();
        assert_ne!(sim.profile().air_temp_baseline, air);
        assert!((sim.profile().air_temp_baseline - air).abs() <= 0.1);
        assert!((sim.profile().speed_baseline - speed).abs() <= 5.0);
        assert!((sim.profile().torque_baseline - torque).abs() <= 0.5);
    }

    #[test]
    fn test_condition_distributions() {
        let healthy = machine(InitialCondition::Healthy, 1);
        let risk = machine(InitialCondition::Risk, 2);
        let maintenance = machine(InitialCondition::Maintenance, 3);

        assert!((5.0..45.0).contains(&healthy.tool_wear()));
        assert!((165.0..185.0).contains(&risk.tool_wear()));
        assert!((180.0..220.0).contains(&maintenance.tool_wear()));

        // Degraded machines always run hotter, slower and at higher torque
        assert!(healthy.profile().torque_baseline < risk.profile().torque_baseline);
        assert!(healthy.profile().torque_baseline < maintenance.profile().torque_baseline);
        assert!(healthy.profile().speed_baseline > maintenance.profile().speed_baseline);
        assert!(healthy.profile().air_temp_baseline < maintenance.profile().air_temp_baseline);
    }

    #[test]
    fn test_reading_serializes_with_external_field_names() {
        let mut sim = machine(InitialCondition::Healthy, 5);
        let reading = sim.generate_reading();
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["machine_id"], "M001");
        assert_eq!(json["Type"], "M");
        assert!(json["Air temperature [K]"].is_number());
        assert!(json["Process temperature [K]"].is_number());
        assert!(json["Rotational speed [rpm]"].is_number());
        assert!(json["Torque [Nm]"].is_number());
        assert!(json["Tool wear [min]"].is_number());
        assert_eq!(json["operating_mode"], "normal");
        assert_eq!(json["cycles"], 1);
    }

    #[test]
    fn test_machine_type_parse_round_trip() {
        for t in MachineType::ALL {
            assert_eq!(t.as_str().parse::<MachineType>().unwrap(), t);
        }
        assert!(matches!(
            "X".parse::<MachineType>(),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cycle_counter_increments() {
        let mut sim = machine(InitialCondition::Healthy, 9);
        let first = sim.generate_reading();
        let second = sim.generate_reading();
        assert_eq!(first.cycles, 1);
        assert_eq!(second.cycles, 2);
    }
}
