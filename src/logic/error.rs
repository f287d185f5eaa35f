//! Error handling

use std::fmt;

pub type CoreResult<T> = Result<T, CoreError>;

/// Failure taxonomy of the monitoring core.
///
/// `NotFound` is an error on read paths only; maintenance on an unknown
/// machine id is an ordinary `false` result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Model artifact not loaded or failed to load.
    ModelUnavailable(String),

    /// Malformed or missing sensor field, or a categorical value outside
    /// the trained vocabulary. The message names the offending field.
    InvalidInput(String),

    /// Referenced machine id does not exist in the fleet.
    NotFound(String),

    /// Unexpected internal failure during preprocessing or classification.
    /// Fatal to the single request only.
    ComputationFault(String),
}

impl CoreError {
    /// Prefix a wrapping message while preserving the error kind.
    pub fn context(self, msg: impl AsRef<str>) -> Self {
        let msg = msg.as_ref();
        match self {
            CoreError::ModelUnavailable(m) => CoreError::ModelUnavailable(format!("{}: {}", msg, m)),
            CoreError::InvalidInput(m) => CoreError::InvalidInput(format!("{}: {}", msg, m)),
            CoreError::NotFound(m) => CoreError::NotFound(format!("{}: {}", msg, m)),
            CoreError::ComputationFault(m) => CoreError::ComputationFault(format!("{}: {}", msg, m)),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::ModelUnavailable(m) => write!(f, "model unavailable: {}", m),
            CoreError::InvalidInput(m) => write!(f, "invalid input: {}", m),
            CoreError::NotFound(m) => write!(f, "not found: {}", m),
            CoreError::ComputationFault(m) => write!(f, "computation fault: {}", m),
        }
    }
}

impl std::error::Error for CoreError {}
