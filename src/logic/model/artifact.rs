//! Model Artifact Store - One-time load of the trained model
//!
//! The training pipeline leaves three files in the model directory: the
//! serialized classifier, the fitted type encoder and a metadata document
//! naming them. The store loads all three exactly once; concurrent early
//! callers wait for the in-flight load instead of triggering duplicates.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::error::{CoreError, CoreResult};
use crate::logic::features::layout::validate_columns;
use crate::logic::model::encoder::TypeEncoder;
use crate::logic::model::inference::TreeEnsemble;

/// Metadata document file name
pub const METADATA_FILE: &str = "model_metadata.json";

/// Fitted encoder file name
pub const ENCODER_FILE: &str = "label_encoder.json";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Metadata written by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub training_date: String,
    pub metrics: serde_json::Value,
    pub feature_columns: Vec<String>,
    #[serde(default)]
    pub random_state: Option<u64>,
    /// Optional SHA-256 digests keyed by artifact file name.
    #[serde(default)]
    pub checksums: HashMap<String, String>,
}

/// The frozen model: classifier, encoder and metadata. Read-only and
/// shared across all prediction calls once loaded.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub encoder: TypeEncoder,
    pub classifier: TreeEnsemble,
}

impl ModelArtifact {
    /// Classifier file name derived from the metadata.
    pub fn classifier_file(metadata: &ModelMetadata) -> String {
        format!("{}.json", metadata.model_name)
    }
}

// ============================================================================
// ARTIFACT STORE
// ============================================================================

pub struct ArtifactStore {
    model_dir: PathBuf,
    loaded: OnceCell<Arc<ModelArtifact>>,
}

impl ArtifactStore {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            loaded: OnceCell::new(),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Check that all three artifact files exist before attempting a load.
    pub fn preflight(&self) -> CoreResult<()> {
        let metadata = self.read_metadata()?;

        for file in [
            ENCODER_FILE.to_string(),
            ModelArtifact::classifier_file(&metadata),
        ] {
            let path = self.model_dir.join(&file);
            if !path.exists() {
                return Err(CoreError::ModelUnavailable(format!(
                    "artifact file `{}` not found in {}",
                    file,
                    self.model_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Load the artifact, or return the already loaded handle.
    ///
    /// Errors are not cached: a failed load can be retried by the caller.
    pub fn load(&self) -> CoreResult<Arc<ModelArtifact>> {
        self.loaded
            .get_or_try_init(|| self.load_inner().map(Arc::new))
            .cloned()
    }

    /// Already loaded handle, if any.
    pub fn get(&self) -> Option<Arc<ModelArtifact>> {
        self.loaded.get().cloned()
    }

    fn load_inner(&self) -> CoreResult<ModelArtifact> {
        let metadata = self.read_metadata()?;

        validate_columns(&metadata.feature_columns).map_err(|e| {
            CoreError::ModelUnavailable(format!("metadata feature_columns rejected: {}", e))
        })?;

        self.verify_checksums(&metadata)?;

        let encoder: TypeEncoder = self.read_json(ENCODER_FILE)?;
        let classifier: TreeEnsemble =
            self.read_json(&ModelArtifact::classifier_file(&metadata))?;

        classifier.validate().map_err(|e| {
            CoreError::ModelUnavailable(format!("classifier rejected: {}", e))
        })?;

        log::info!("Model loaded successfully: {}", metadata.model_name);
        log::info!("  training date: {}", metadata.training_date);
        log::info!("  metrics: {}", metadata.metrics);

        Ok(ModelArtifact {
            metadata,
            encoder,
            classifier,
        })
    }

    fn read_metadata(&self) -> CoreResult<ModelMetadata> {
        let path = self.model_dir.join(METADATA_FILE);
        if !path.exists() {
            return Err(CoreError::ModelUnavailable(format!(
                "model metadata not found at {}, train the model first",
                path.display()
            )));
        }
        self.read_json(METADATA_FILE)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> CoreResult<T> {
        let path = self.model_dir.join(file);
        let content = fs::read_to_string(&path).map_err(|e| {
            CoreError::ModelUnavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            CoreError::ModelUnavailable(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Verify every digest recorded in the metadata.
    fn verify_checksums(&self, metadata: &ModelMetadata) -> CoreResult<()> {
        for (file, expected) in &metadata.checksums {
            let actual = sha256_hex(&self.model_dir.join(file))?;
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(CoreError::ModelUnavailable(format!(
                    "checksum mismatch for `{}`: expected {}, got {}",
                    file, expected, actual
                )));
            }
            log::debug!("Checksum verified for {}", file);
        }
        Ok(())
    }
}

fn sha256_hex(path: &Path) -> CoreResult<String> {
    let bytes = fs::read(path).map_err(|e| {
        CoreError::ModelUnavailable(format!("failed to read {}: {}", path.display(), e))
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

// ============================================================================
// TESTS
// ============================================================================
