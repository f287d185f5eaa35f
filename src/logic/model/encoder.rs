//! Categorical Type Encoder
//!
//! Closed-vocabulary encoder for the machine type column, matching the
//! encoder fitted at training time: classes are held in lexicographic
//! order and encode to their position.

use serde::{Deserialize, Serialize};

use crate::logic::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEncoder {
    classes: Vec<String>,
}

impl TypeEncoder {
    /// Fit-like constructor: sorts the vocabulary the way the training
    /// encoder does.
    pub fn new(mut classes: Vec<String>) -> Self {
        classes.sort();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encode a category value. Unseen values are invalid input, the
    /// vocabulary is fixed.
    pub fn encode(&self, value: &str) -> CoreResult<usize> {
        self.classes
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "machine type `{}` outside trained vocabulary {:?}",
                    value, self.classes
                ))
            })
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> TypeEncoder {
        TypeEncoder::new(vec!["L".to_string(), "M".to_string(), "H".to_string()])
    }

    #[test]
    fn test_classes_sorted_like_training_encoder() {
        assert_eq!(encoder().classes(), ["H", "L", "M"]);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let enc = encoder();
        for value in ["L", "M", "H"] {
            let code = enc.encode(value).unwrap();
            assert_eq!(enc.decode(code), Some(value));
        }
    }

    #[test]
    fn test_unseen_value_rejected() {
        let err = encoder().encode("X").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert!(err.to_string().contains('X'));
    }

    #[test]
    fn test_decode_out_of_range() {
        assert_eq!(encoder().decode(3), None);
    }
}
