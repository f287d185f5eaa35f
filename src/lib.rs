//! Predictive Maintenance Monitoring Core
//!
//! Stateful sensor-degradation simulator paired with an inference and
//! health-classification pipeline. The HTTP layer and the offline
//! training pipeline are external consumers of this crate.

pub mod constants;
pub mod logic;
