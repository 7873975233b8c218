//! Error types.

use std::fmt;
use thiserror::Error;
use tmnl_common_config::ConfigError;

/// Which end of the z-index range was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lower => f.write_str("lower"),
            Self::Upper => f.write_str("upper"),
        }
    }
}

/// Rejected layer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid z-index {value}: {bound} bound violated, must be between {min} and {max}")]
    ZIndexOutOfRange {
        value: i32,
        min: i32,
        max: i32,
        bound: Bound,
    },

    #[error("invalid opacity {value}: must be between 0 and 1")]
    OpacityOutOfRange { value: f64 },

    #[error("layer name cannot be empty")]
    EmptyName,
}

/// Layer system errors.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, LayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_index_message_names_bound() {
        let err = ValidationError::ZIndexOutOfRange {
            value: 10001,
            min: -1000,
            max: 10000,
            bound: Bound::Upper,
        };
        let message = err.to_string();
        assert!(message.contains("10001"));
        assert!(message.contains("upper"));
    }

    #[test]
    fn test_validation_converts_into_layer_error() {
        let err: LayerError = ValidationError::EmptyName.into();
        assert!(matches!(err, LayerError::Validation(ValidationError::EmptyName)));
        assert_eq!(err.to_string(), "layer name cannot be empty");
    }
}
