//! Feature Layout - Centralized feature-column definition
//!
//! The classifier was trained on a fixed set of columns. This file is the
//! single source of truth for the known column names; the order actually
//! fed to the model comes from the artifact metadata and is hashed so a
//! mismatch is detected instead of silently scrambling predictions.

use crc32fast::Hasher;

use crate::logic::error::{CoreError, CoreResult};

/// Current feature layout version. Increment on any column change.
pub const FEATURE_VERSION: u8 = 1;

/// Every column the trained model knows, in canonical training order.
pub const FEATURE_LAYOUT: &[&str] = &[
    "Air_temperature_K",
    "Process_temperature_K",
    "Rotational_speed_rpm",
    "Torque_Nm",
    "Tool_wear_min",
    "Type_encoded",
    "Temp_diff",
    "Power",
];

/// Total number of features
pub const FEATURE_COUNT: usize = 8;

/// CRC32 hash of an arbitrary column order.
pub fn columns_hash<S: AsRef<str>>(columns: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in columns {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Hash of the canonical training order.
pub fn layout_hash() -> u32 {
    columns_hash(FEATURE_LAYOUT)
}

/// Get column index in the canonical layout.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Validate a metadata column list: every name known, no duplicates,
/// exactly the full set.
pub fn validate_columns(columns: &[String]) -> CoreResult<()> {
    if columns.len() != FEATURE_COUNT {
        return Err(CoreError::InvalidInput(format!(
            "expected {} feature columns, got {}",
            FEATURE_COUNT,
            columns.len()
        )));
    }

    for (i, name) in columns.iter().enumerate() {
        if feature_index(name).is_none() {
            return Err(CoreError::InvalidInput(format!(
                "unknown feature column `{}`",
                name
            )));
        }
        if columns[..i].iter().any(|seen| seen == name) {
            return Err(CoreError::InvalidInput(format!(
                "duplicate feature column `{}`",
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> Vec<String> {
        FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 8);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_columns_hash_sensitive_to_order() {
        let mut reordered = canonical();
        reordered.swap(0, 1);
        assert_ne!(columns_hash(&reordered), layout_hash());
    }

    #[test]
    fn test_validate_canonical_columns() {
        assert!(validate_columns(&canonical()).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_column() {
        let mut columns = canonical();
        columns[2] = "Vibration_mm_s".to_string();
        let err = validate_columns(&columns).unwrap_err();
        assert!(err.to_string().contains("Vibration_mm_s"));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_wrong_count() {
        let mut columns = canonical();
        columns[7] = columns[0].clone();
        assert!(validate_columns(&columns).is_err());

        let short = canonical()[..5].to_vec();
        assert!(validate_columns(&short).is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("Air_temperature_K"), Some(0));
        assert_eq!(feature_index("Power"), Some(7));
        assert_eq!(feature_index("nonexistent"), None);
    }
}
