//! Feature Preprocessor - Reading to model-input vector
//!
//! Maps a raw reading plus the categorical machine type into the numeric
//! vector the classifier expects. Column order is dictated by the model
//! metadata, never by convention; the order actually used is hashed into
//! the vector so downstream consumers can verify compatibility.

use serde::{Deserialize, Serialize};

use crate::logic::error::{CoreError, CoreResult};
use crate::logic::features::layout::{columns_hash, validate_columns, FEATURE_VERSION};
use crate::logic::model::encoder::TypeEncoder;
use crate::logic::simulator::machine::Reading;

/// Ordered numeric model input.
///
/// `values[i]` corresponds to the i-th column of the metadata order that
/// produced this vector, witnessed by `columns_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub version: u8,
    pub columns_hash: u32,
    pub values: Vec<f64>,
}

pub struct FeaturePreprocessor;

impl FeaturePreprocessor {
    /// Assemble the feature vector strictly in the given column order.
    pub fn transform(
        reading: &Reading,
        encoder: &TypeEncoder,
        feature_columns: &[String],
    ) -> CoreResult<FeatureVector> {
        validate_columns(feature_columns)?;

        let type_encoded = encoder.encode(reading.machine_type.as_str())? as f64;
        let temp_diff = reading.process_temperature - reading.air_temperature;
        let power = reading.torque * reading.rotational_speed / 1000.0;

        let mut values = Vec::with_capacity(feature_columns.len());
        for column in feature_columns {
            let value = match column.as_str() {
                "Air_temperature_K" => reading.air_temperature,
                "Process_temperature_K" => reading.process_temperature,
                "Rotational_speed_rpm" => reading.rotational_speed,
                "Torque_Nm" => reading.torque,
                "Tool_wear_min" => reading.tool_wear,
                "Type_encoded" => type_encoded,
                "Temp_diff" => temp_diff,
                "Power" => power,
                other => {
                    return Err(CoreError::InvalidInput(format!(
                        "unknown feature column `{}`",
                        other
                    )))
                }
            };

            if !value.is_finite() {
                return Err(CoreError::ComputationFault(format!(
                    "non-finite value computed for feature `{}`",
                    column
                )));
            }
            values.push(value);
        }

        Ok(FeatureVector {
            version: FEATURE_VERSION,
            columns_hash: columns_hash(feature_columns),
            values,
        })
    }
}
