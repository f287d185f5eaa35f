//! Monitoring Coordinator - Simulate, featurize, classify, annotate
//!
//! Pure orchestration over injected collaborators. Holds no state of its
//! own; every fleet-wide call stamps one shared timestamp across the
//! whole batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::error::CoreResult;
use crate::logic::features::preprocess::FeaturePreprocessor;
use crate::logic::model::inference::ClassifierAdapter;
use crate::logic::model::threshold::HealthClassifier;
use crate::logic::simulator::fleet::{FleetSimulator, MachineSummary};
use crate::logic::simulator::machine::Reading;

/// Final annotated verdict for one machine.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub machine_id: String,
    pub prediction: u8,
    pub failure_probability: f64,
    pub normal_probability: f64,
    pub health_status: String,
    pub alert: bool,
    pub sensor_data: Reading,
    pub timestamp: DateTime<Utc>,
}

/// Loaded-model description for the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub training_date: String,
    pub metrics: serde_json::Value,
    pub feature_columns: Vec<String>,
    pub status: &'static str,
}

/// Service liveness snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub model_loaded: bool,
    pub model_name: Option<String>,
    pub machines: usize,
    pub timestamp: DateTime<Utc>,
}

/// Coordinates the simulator, the preprocessor, the classifier and the
/// health bands per request.
pub struct MonitoringCoordinator {
    fleet: Arc<FleetSimulator>,
    classifier: Arc<ClassifierAdapter>,
    health: HealthClassifier,
}

impl MonitoringCoordinator {
    pub fn new(
        fleet: Arc<FleetSimulator>,
        classifier: Arc<ClassifierAdapter>,
        health: HealthClassifier,
    ) -> Self {
        Self {
            fleet,
            classifier,
            health,
        }
    }

    /// Generate fresh readings and classify every machine. All reports
    /// of one call carry the identical timestamp.
    pub fn predict_fleet(&self) -> CoreResult<Vec<PredictionReport>> {
        let readings = self.fleet.generate_all();
        let timestamp = Utc::now();
        readings
            .into_iter()
            .map(|reading| self.evaluate(reading, timestamp))
            .collect()
    }

    /// Generate a reading and classify a single machine.
    pub fn predict_one(&self, machine_id: &str) -> CoreResult<PredictionReport> {
        let reading = self.fleet.generate_one(machine_id)?;
        self.evaluate(reading, Utc::now())
    }

    /// Reset a machine's tool wear. Unknown id is an ordinary `false`.
    pub fn maintain(&self, machine_id: &str) -> bool {
        self.fleet.perform_maintenance(machine_id)
    }

    /// Status snapshot of every machine.
    pub fn fleet_status(&self) -> Vec<MachineSummary> {
        self.fleet.list_machines()
    }

    /// Description of the loaded model.
    pub fn model_info(&self) -> CoreResult<ModelInfo> {
        let artifact = self.classifier.artifact()?;
        Ok(ModelInfo {
            model_name: artifact.metadata.model_name.clone(),
            training_date: artifact.metadata.training_date.clone(),
            metrics: artifact.metadata.metrics.clone(),
            feature_columns: artifact.metadata.feature_columns.clone(),
            status: "loaded",
        })
    }

    /// Service liveness snapshot.
    pub fn status(&self) -> ServiceStatus {
        let model_name = self
            .classifier
            .artifact()
            .ok()
            .map(|a| a.metadata.model_name.clone());
        ServiceStatus {
            model_loaded: self.classifier.is_loaded(),
            model_name,
            machines: self.fleet.len(),
            timestamp: Utc::now(),
        }
    }

    fn evaluate(&self, reading: Reading, timestamp: DateTime<Utc>) -> CoreResult<PredictionReport> {
        let artifact = self.classifier.artifact()?;

        let vector = FeaturePreprocessor::transform(
            &reading,
            &artifact.encoder,
            &artifact.metadata.feature_columns,
        )
        .map_err(|e| e.context(format!("prediction failed for {}", reading.machine_id)))?;

        let (label, probability) = self
            .classifier
            .predict(&vector)
            .map_err(|e| e.context(format!("prediction failed for {}", reading.machine_id)))?;

        let verdict = self.health.classify(probability);
        if verdict.alert {
            log::debug!(
                "{} crossed the failure threshold (p={:.4})",
                reading.machine_id,
                probability
            );
        }

        Ok(PredictionReport {
            machine_id: reading.machine_id.clone(),
            prediction: label,
            failure_probability: round4(probability),
            normal_probability: round4(1.0 - probability),
            health_status: verdict.status.display_label().to_string(),
            alert: verdict.alert,
            sensor_data: reading,
            timestamp,
        })
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
