//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change a default, only edit this file.

/// App name
pub const APP_NAME: &str = "Predictive Maintenance Core";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of simulated machines
pub const DEFAULT_NUM_MACHINES: usize = 5;

/// Default interval between simulation ticks (seconds)
pub const DEFAULT_SIMULATION_INTERVAL_SECS: u64 = 2;

/// Default probability threshold for a maintenance alert
pub const DEFAULT_FAILURE_THRESHOLD: f64 = 0.6;

/// Default directory holding the trained model artifacts
pub const DEFAULT_MODEL_DIR: &str = "models";
