//! Environment variable handling.

use crate::types::{IdStrategy, LayerSystemConfig};
use std::env;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Environment variable names.
pub mod vars {
    // Configuration
    pub const TMNL_LAYERS_CONFIG: &str = "TMNL_LAYERS_CONFIG";
    pub const TMNL_ID_STRATEGY: &str = "TMNL_ID_STRATEGY";
    pub const TMNL_RESORT_GAP: &str = "TMNL_RESORT_GAP";
    pub const TMNL_STOP_MACHINE_ON_REMOVE: &str = "TMNL_STOP_MACHINE_ON_REMOVE";
}

/// Environment accessors.
pub struct Environment;

impl Environment {
    /// Get an optional string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok()
    }

    /// Interpret a value as a boolean flag.
    pub fn parse_bool(value: &str) -> bool {
        matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
    }
}

fn parse_int<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, EnvError> {
    value.trim().parse().map_err(|_| EnvError::InvalidValue {
        var: var.to_string(),
        message: format!("expected integer, got {value:?}"),
    })
}

/// Apply `TMNL_*` overrides to a loaded configuration.
///
/// `lookup` resolves a variable name; production code passes
/// [`Environment::get`].
pub fn apply_overrides<F>(config: &mut LayerSystemConfig, lookup: F) -> Result<(), EnvError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(strategy) = lookup(vars::TMNL_ID_STRATEGY) {
        config.ids.strategy = IdStrategy::parse(&strategy);
    }

    if let Some(gap) = lookup(vars::TMNL_RESORT_GAP) {
        let gap: i32 = parse_int(vars::TMNL_RESORT_GAP, &gap)?;
        if gap <= 0 {
            return Err(EnvError::InvalidValue {
                var: vars::TMNL_RESORT_GAP.to_string(),
                message: "resort gap must be greater than 0".to_string(),
            });
        }
        config.z_index.resort_gap = gap;
    }

    if let Some(stop) = lookup(vars::TMNL_STOP_MACHINE_ON_REMOVE) {
        config.lifecycle.stop_machine_on_remove = Environment::parse_bool(&stop);
    }

    Ok(())
}
