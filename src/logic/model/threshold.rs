//! Health Classification - Probability bands and the alert threshold
//!
//! Maps a failure probability to a discrete health-status band and,
//! independently, to a maintenance-alert flag. Bands and threshold are
//! configured once at startup.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FAILURE_THRESHOLD;

/// Named risk category derived from a failure probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Risk,
    MaintenanceRequired,
}

impl HealthStatus {
    /// Operator-facing label.
    pub fn display_label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Risk => "RISK",
            HealthStatus::MaintenanceRequired => "MAINTENANCE REQUIRED",
        }
    }
}

/// One half-open probability interval `[lower, upper)`. The last band of
/// a table is upper-inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthBand {
    pub status: HealthStatus,
    pub lower: f64,
    pub upper: f64,
}

/// Band plus alert flag for one probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: HealthStatus,
    pub alert: bool,
}

/// Maps failure probabilities to verdicts.
#[derive(Debug, Clone)]
pub struct HealthClassifier {
    bands: Vec<HealthBand>,
    failure_threshold: f64,
}

impl HealthClassifier {
    pub fn new(bands: Vec<HealthBand>, failure_threshold: f64) -> Self {
        Self {
            bands,
            failure_threshold,
        }
    }

    /// Default band table with a custom alert threshold.
    pub fn with_threshold(failure_threshold: f64) -> Self {
        Self {
            failure_threshold,
            ..Self::default()
        }
    }

    pub fn failure_threshold(&self) -> f64 {
        self.failure_threshold
    }

    /// Classify a failure probability. Total and deterministic: every
    /// probability maps to exactly one band, interior boundaries belong
    /// to the higher band.
    ///
    /// A probability that escapes the configured table falls back to
    /// maintenance-required. That is the fail-safe direction for an
    /// alerting system, and the warning below keeps a misconfigured
    /// table from staying invisible.
    pub fn classify(&self, probability: f64) -> Verdict {
        // Alert is evaluated against the threshold on its own, never
        // derived from the band walk.
        let alert = probability >= self.failure_threshold;

        let count = self.bands.len();
        for (i, band) in self.bands.iter().enumerate() {
            let last = i + 1 == count;
            let in_band = probability >= band.lower
                && (probability < band.upper || (last && probability <= band.upper));
            if in_band {
                return Verdict {
                    status: band.status,
                    alert,
                };
            }
        }

        log::warn!(
            "probability {:.4} outside configured health bands, defaulting to {}",
            probability,
            HealthStatus::MaintenanceRequired.display_label()
        );
        Verdict {
            status: HealthStatus::MaintenanceRequired,
            alert,
        }
    }
}

impl Default for HealthClassifier {
    fn default() -> Self {
        Self {
            bands: vec![
                HealthBand {
                    status: HealthStatus::Healthy,
                    lower: 0.0,
                    upper: 0.3,
                },
                HealthBand {
                    status: HealthStatus::Risk,
                    lower: 0.3,
                    upper: 0.6,
                },
                HealthBand {
                    status: HealthStatus::MaintenanceRequired,
                    lower: 0.6,
                    upper: 1.0,
                },
            ],
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_belong_to_higher_band() {
        let classifier = HealthClassifier::default();

        assert_eq!(classifier.classify(0.0).status, HealthStatus::Healthy);
        assert_eq!(classifier.classify(0.29).status, HealthStatus::Healthy);
        assert_eq!(classifier.classify(0.3).status, HealthStatus::Risk);
        assert_eq!(classifier.classify(0.59).status, HealthStatus::Risk);
        assert_eq!(
            classifier.classify(0.6).status,
            HealthStatus::MaintenanceRequired
        );
        assert_eq!(
            classifier.classify(1.0).status,
            HealthStatus::MaintenanceRequired
        );
    }

    #[test]
    fn test_alert_tracks_threshold_exactly() {
        let classifier = HealthClassifier::default();

        assert!(!classifier.classify(0.59).alert);
        assert!(classifier.classify(0.6).alert);
        assert!(classifier.classify(0.95).alert);
    }

    #[test]
    fn test_alert_independent_of_band() {
        // Lowered threshold: a probability can alert while still in the
        // risk band.
        let classifier = HealthClassifier::with_threshold(0.5);
        let verdict = classifier.classify(0.55);

        assert_eq!(verdict.status, HealthStatus::Risk);
        assert!(verdict.alert);
    }

    #[test]
    fn test_out_of_table_falls_back_to_maintenance() {
        let classifier = HealthClassifier::default();
        let verdict = classifier.classify(1.5);

        assert_eq!(verdict.status, HealthStatus::MaintenanceRequired);
        assert!(verdict.alert);
    }

    #[test]
    fn test_gap_in_table_falls_back_to_maintenance() {
        let classifier = HealthClassifier::new(
            vec![HealthBand {
                status: HealthStatus::Healthy,
                lower: 0.0,
                upper: 0.3,
            }],
            0.6,
        );

        let verdict = classifier.classify(0.45);
        assert_eq!(verdict.status, HealthStatus::MaintenanceRequired);
        assert!(!verdict.alert);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = HealthClassifier::default();
        for p in [0.0, 0.15, 0.3, 0.45, 0.6, 0.85, 1.0] {
            assert_eq!(classifier.classify(p), classifier.classify(p));
        }
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(HealthStatus::Healthy.display_label(), "HEALTHY");
        assert_eq!(
            HealthStatus::MaintenanceRequired.display_label(),
            "MAINTENANCE REQUIRED"
        );
    }
}
