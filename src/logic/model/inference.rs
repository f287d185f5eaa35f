//! Inference Engine - Frozen tree-ensemble classifier
//!
//! Wraps the classifier exported by the offline training pipeline. The
//! artifact is a plain node-array ensemble, either gradient boosting
//! (summed leaf margins through a sigmoid) or a random forest (averaged
//! leaf probabilities). Inference is deterministic: same vector, same
//! loaded artifact, same output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::logic::error::{CoreError, CoreResult};
use crate::logic::features::layout::columns_hash;
use crate::logic::features::preprocess::FeatureVector;
use crate::logic::model::artifact::ModelArtifact;

/// Probability above which the binary label flips to failure.
const LABEL_CUTOFF: f64 = 0.5;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One decision tree in node-array form.
///
/// Arrays are indexed by node id; a node is a leaf when its left child
/// is negative, and `value` holds its output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub children_left: Vec<i32>,
    pub children_right: Vec<i32>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    /// Walk the tree to a leaf. Assumes the tree was validated at load.
    fn score(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        loop {
            let left = self.children_left[node];
            if left < 0 {
                return self.value[node];
            }
            let feature = self.feature[node] as usize;
            node = if features[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
    }

    fn validate(&self, n_features: usize) -> CoreResult<()> {
        let n = self.value.len();
        if n == 0
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.children_left.len() != n
            || self.children_right.len() != n
        {
            return Err(CoreError::InvalidInput(
                "malformed decision tree: node arrays disagree".to_string(),
            ));
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left < 0 {
                continue;
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(CoreError::InvalidInput(format!(
                    "decision tree node {} references feature {} of {}",
                    node, feature, n_features
                )));
            }
            if left as usize >= n || right < 0 || right as usize >= n {
                return Err(CoreError::InvalidInput(format!(
                    "decision tree node {} has out-of-range children",
                    node
                )));
            }
        }

        Ok(())
    }
}

/// Ensemble families the training pipeline exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleKind {
    GradientBoosting,
    RandomForest,
}

/// The frozen classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub model_type: EnsembleKind,
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<DecisionTree>,
}

/// Seam for swapping classifier implementations.
pub trait Classifier {
    fn predict_probability(&self, features: &[f64]) -> CoreResult<f64>;
}

impl TreeEnsemble {
    pub fn validate(&self) -> CoreResult<()> {
        if self.trees.is_empty() {
            return Err(CoreError::InvalidInput(
                "classifier has no trees".to_string(),
            ));
        }
        for tree in &self.trees {
            tree.validate(self.n_features)?;
        }
        Ok(())
    }
}

impl Classifier for TreeEnsemble {
    /// Probability of failure for one feature vector.
    fn predict_probability(&self, features: &[f64]) -> CoreResult<f64> {
        if features.len() != self.n_features {
            return Err(CoreError::InvalidInput(format!(
                "expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        let probability = match self.model_type {
            EnsembleKind::GradientBoosting => {
                let margin: f64 = self.base_score
                    + self.trees.iter().map(|t| t.score(features)).sum::<f64>();
                sigmoid(margin)
            }
            EnsembleKind::RandomForest => {
                let sum: f64 = self.trees.iter().map(|t| t.score(features)).sum();
                (sum / self.trees.len() as f64).clamp(0.0, 1.0)
            }
        };

        if !probability.is_finite() {
            return Err(CoreError::ComputationFault(
                "classifier produced a non-finite probability".to_string(),
            ));
        }

        Ok(probability)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

// ============================================================================
// CLASSIFIER ADAPTER
// ============================================================================

/// Adapter around the loaded model handle.
///
/// Construct `unloaded()` as a sentinel before the artifact is available;
/// every prediction then fails fast with `ModelUnavailable`.
#[derive(Debug, Clone)]
pub struct ClassifierAdapter {
    artifact: Option<Arc<ModelArtifact>>,
}

impl ClassifierAdapter {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self {
            artifact: Some(artifact),
        }
    }

    pub fn unloaded() -> Self {
        Self { artifact: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.artifact.is_some()
    }

    pub fn artifact(&self) -> CoreResult<&Arc<ModelArtifact>> {
        self.artifact.as_ref().ok_or_else(|| {
            CoreError::ModelUnavailable("model not loaded, load the artifact first".to_string())
        })
    }

    /// Binary label and failure probability for one feature vector.
    pub fn predict(&self, vector: &FeatureVector) -> CoreResult<(u8, f64)> {
        let artifact = self.artifact()?;

        let expected = columns_hash(&artifact.metadata.feature_columns);
        if vector.columns_hash != expected {
            return Err(CoreError::InvalidInput(format!(
                "feature vector layout {:08x} does not match model layout {:08x}",
                vector.columns_hash, expected
            )));
        }

        let probability = artifact.classifier.predict_probability(&vector.values)?;
        let label = if probability >= LABEL_CUTOFF { 1 } else { 0 };
        Ok((label, probability))
    }
}

// ============================================================================
// TESTS
// ============================================================================
