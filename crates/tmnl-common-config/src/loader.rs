//! Configuration file loading and parsing.

use crate::env::{apply_overrides, vars, EnvError, Environment};
use crate::types::LayerSystemConfig;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Config file location relative to a project directory.
pub const CONFIG_FILE: &str = ".tmnl/layers.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is valid")
    })
}

/// Configuration loader.
pub struct ConfigLoader {
    config_path: PathBuf,
    required: bool,
}

impl ConfigLoader {
    /// Create a loader for `<project_dir>/.tmnl/layers.yaml`.
    ///
    /// A missing file yields the default configuration.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_dir.as_ref().join(CONFIG_FILE),
            required: false,
        }
    }

    /// Create a loader for an explicit file, which must exist.
    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    /// Create a loader honouring `TMNL_LAYERS_CONFIG`, falling back to the
    /// current directory.
    pub fn from_env() -> Self {
        match Environment::get(vars::TMNL_LAYERS_CONFIG) {
            Some(path) => Self::with_file(path),
            None => Self::default(),
        }
    }

    /// Path this loader reads from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration and apply `TMNL_*` environment overrides.
    pub fn load(&self) -> Result<LayerSystemConfig, ConfigError> {
        self.load_with(Environment::get)
    }

    /// Load configuration, resolving `${VAR}` references and overrides
    /// through `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<LayerSystemConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.read_file(&lookup)?;
        apply_overrides(&mut config, &lookup)?;
        self.validate(&config)?;
        Ok(config)
    }

    fn read_file<F>(&self, lookup: F) -> Result<LayerSystemConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.config_path.exists() {
            if self.required {
                return Err(ConfigError::NotFound {
                    path: self.config_path.clone(),
                });
            }
            return Ok(LayerSystemConfig::default());
        }

        let contents = std::fs::read_to_string(&self.config_path)?;
        let expanded = expand_env_vars(&contents, lookup)?;

        if expanded.trim().is_empty() {
            return Ok(LayerSystemConfig::default());
        }

        let config: Option<LayerSystemConfig> =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        Ok(config.unwrap_or_default())
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &LayerSystemConfig) -> Result<(), ConfigError> {
        if config.z_index.min >= config.z_index.max {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "z_index.min ({}) must be lower than z_index.max ({})",
                    config.z_index.min, config.z_index.max
                ),
            });
        }

        if config.z_index.resort_gap <= 0 {
            return Err(ConfigError::ValidationError {
                message: "z_index.resort_gap must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to the loader's path.
    pub fn save(&self, config: &LayerSystemConfig) -> Result<(), ConfigError> {
        if let Some(dir) = self.config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(&self.config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` references, resolving names
/// through `lookup`.
fn expand_env_vars<F>(content: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = content.to_string();

    for cap in env_var_pattern().captures_iter(content) {
        let var_name = &cap[1];
        let value = lookup(var_name)
            .or_else(|| cap.get(2).map(|m| m.as_str().to_string()))
            .ok_or_else(|| ConfigError::EnvVarNotFound {
                var: var_name.to_string(),
            })?;
        result = result.replace(&cap[0], &value);
    }

    Ok(result)
}
