//! External Reading Adapter - Boundary normalization of sensor payloads
//!
//! Callers submit sensor data under either the bracketed-unit spelling
//! (`"Air temperature [K]"`) or the normalized spelling
//! (`Air_temperature_K`). Both map to the same canonical `Reading` field;
//! the core never sees the dual naming.

use chrono::Utc;
use serde::Deserialize;

use crate::logic::error::{CoreError, CoreResult};
use crate::logic::simulator::machine::{MachineType, OperatingMode, Reading};

/// Sensor payload as submitted by an external caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalReading {
    pub machine_id: String,

    #[serde(rename = "Type")]
    pub machine_type: String,

    #[serde(rename = "Air temperature [K]", alias = "Air_temperature_K", default)]
    pub air_temperature: Option<f64>,

    #[serde(rename = "Process temperature [K]", alias = "Process_temperature_K", default)]
    pub process_temperature: Option<f64>,

    #[serde(rename = "Rotational speed [rpm]", alias = "Rotational_speed_rpm", default)]
    pub rotational_speed: Option<f64>,

    #[serde(rename = "Torque [Nm]", alias = "Torque_Nm", default)]
    pub torque: Option<f64>,

    #[serde(rename = "Tool wear [min]", alias = "Tool_wear_min", default)]
    pub tool_wear: Option<f64>,
}

impl ExternalReading {
    /// Convert into the canonical reading, naming any missing field.
    pub fn into_reading(self) -> CoreResult<Reading> {
        let machine_type: MachineType = self.machine_type.parse()?;

        Ok(Reading {
            machine_id: self.machine_id,
            machine_type,
            air_temperature: require(self.air_temperature, "Air temperature [K]")?,
            process_temperature: require(self.process_temperature, "Process temperature [K]")?,
            rotational_speed: require(self.rotational_speed, "Rotational speed [rpm]")?,
            torque: require(self.torque, "Torque [Nm]")?,
            tool_wear: require(self.tool_wear, "Tool wear [min]")?,
            timestamp: Utc::now(),
            operating_mode: OperatingMode::Normal,
            cycles: 0,
        })
    }
}

fn require(value: Option<f64>, field: &str) -> CoreResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(CoreError::InvalidInput(format!(
            "non-finite value for field `{}`",
            field
        ))),
        None => Err(CoreError::InvalidInput(format!(
            "missing field `{}`",
            field
        ))),
    }
}
