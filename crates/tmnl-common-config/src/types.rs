//! Configuration types.

use serde::{Deserialize, Serialize};

/// Lowest z-index a layer may be created with.
pub const Z_INDEX_MIN: i32 = -1000;
/// Highest z-index a layer may be created with.
pub const Z_INDEX_MAX: i32 = 10000;
/// Spacing left between the extreme z-index and a resorted layer.
pub const DEFAULT_RESORT_GAP: i32 = 10;

/// Root configuration for a layer system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSystemConfig {
    /// Layer id generation.
    pub ids: IdConfig,
    /// Z-index bounds and resort spacing.
    pub z_index: ZIndexConfig,
    /// Layer lifecycle policies.
    pub lifecycle: LifecycleConfig,
}

/// Id generation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    /// Strategy used for new layer ids.
    pub strategy: IdStrategy,
}

/// How layer ids are produced.
///
/// Parsing never fails: any name that is not recognised becomes
/// [`IdStrategy::Unrecognized`], which generates random tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdStrategy {
    /// Fixed-length URL-safe random token.
    #[default]
    RandomToken,
    /// RFC-4122 v4 UUID.
    Uuid,
    /// Caller-supplied generator function.
    Custom,
    /// Unknown strategy name; behaves like `RandomToken`.
    Unrecognized,
}

impl IdStrategy {
    /// Parse a strategy name.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "random-token" | "random_token" | "nanoid" => Self::RandomToken,
            "uuid" => Self::Uuid,
            "custom" => Self::Custom,
            _ => Self::Unrecognized,
        }
    }

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomToken => "random-token",
            Self::Uuid => "uuid",
            Self::Custom => "custom",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl From<String> for IdStrategy {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<IdStrategy> for String {
    fn from(strategy: IdStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Z-index configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZIndexConfig {
    /// Inclusive lower bound checked at creation.
    pub min: i32,
    /// Inclusive upper bound checked at creation.
    pub max: i32,
    /// Gap added above the maximum (or below the minimum) on resort.
    pub resort_gap: i32,
}

impl Default for ZIndexConfig {
    fn default() -> Self {
        Self {
            min: Z_INDEX_MIN,
            max: Z_INDEX_MAX,
            resort_gap: DEFAULT_RESORT_GAP,
        }
    }
}

/// Lifecycle policies.
///
/// Both flags default to `false`, which keeps the historical behaviour:
/// removal leaves the state machine running and resorts are not bounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Stop a layer's state machine when the layer is removed.
    pub stop_machine_on_remove: bool,
    /// Clamp resorted z-indices into `[z_index.min, z_index.max]`.
    pub clamp_resort_to_bounds: bool,
    /// How resort callbacks are run.
    pub resort_dispatch: ResortDispatchMode,
}

/// Resort callback dispatch mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResortDispatchMode {
    /// Await the callback before the resort operation returns.
    #[default]
    Inline,
    /// Run the callback on a spawned task.
    Detached,
}
