//! Features Module - Reading normalization and model-input assembly

pub mod layout;
pub mod preprocess;
pub mod reading;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use preprocess::{FeaturePreprocessor, FeatureVector};
pub use reading::ExternalReading;
