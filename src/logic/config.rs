//! Configuration module
//!
//! Static configuration read once at process start. Nothing here is
//! re-read per request.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_MODEL_DIR, DEFAULT_NUM_MACHINES,
    DEFAULT_SIMULATION_INTERVAL_SECS,
};

/// Inclusive physical range of one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorRange {
    pub min: f64,
    pub max: f64,
}

impl SensorRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a sampled value into the physical range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Valid ranges for every simulated sensor.
///
/// Downstream classification was trained on bounded data, so every
/// emitted reading must stay inside these ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRanges {
    pub air_temperature: SensorRange,
    pub process_temperature: SensorRange,
    pub rotational_speed: SensorRange,
    pub torque: SensorRange,
    pub tool_wear: SensorRange,
}

impl Default for SensorRanges {
    fn default() -> Self {
        Self {
            air_temperature: SensorRange::new(295.0, 304.0),
            process_temperature: SensorRange::new(305.0, 313.0),
            rotational_speed: SensorRange::new(1200.0, 2500.0),
            torque: SensorRange::new(15.0, 70.0),
            tool_wear: SensorRange::new(0.0, 250.0),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Number of simulated machines
    pub num_machines: usize,

    /// Interval between simulation ticks (seconds)
    pub tick_interval_secs: u64,

    /// Probability threshold for a maintenance alert
    pub failure_threshold: f64,

    /// Directory holding the trained model artifacts
    pub model_dir: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Per-sensor valid ranges
    pub sensor_ranges: SensorRanges,
}

impl CoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            num_machines: env::var("NUM_MACHINES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_NUM_MACHINES),

            tick_interval_secs: env::var("SIMULATION_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SIMULATION_INTERVAL_SECS),

            failure_threshold: env::var("FAILURE_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FAILURE_THRESHOLD),

            model_dir: env::var("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR)),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            sensor_ranges: SensorRanges::default(),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            num_machines: DEFAULT_NUM_MACHINES,
            tick_interval_secs: DEFAULT_SIMULATION_INTERVAL_SECS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            environment: "development".to_string(),
            sensor_ranges: SensorRanges::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.num_machines, 5);
        assert_eq!(config.tick_interval_secs, 2);
        assert_eq!(config.failure_threshold, 0.6);
        assert!(!config.is_production());
    }

    #[test]
    fn test_sensor_range_clamp() {
        let range = SensorRange::new(295.0, 304.0);
        assert_eq!(range.clamp(310.0), 304.0);
        assert_eq!(range.clamp(290.0), 295.0);
        assert_eq!(range.clamp(298.5), 298.5);
        assert!(range.contains(304.0));
        assert!(!range.contains(304.1));
    }

    #[test]
    fn test_default_ranges_match_training_bounds() {
        let ranges = SensorRanges::default();
        assert_eq!(ranges.tool_wear.max, 250.0);
        assert_eq!(ranges.rotational_speed.min, 1200.0);
        assert_eq!(ranges.torque.max, 70.0);
    }
}
