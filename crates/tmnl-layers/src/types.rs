//! Layer configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tmnl_common_config::ZIndexConfig;

pub use tmnl_common_config::{DEFAULT_RESORT_GAP, Z_INDEX_MAX, Z_INDEX_MIN};

/// Free-form metadata attached to a layer.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Metadata key reserved for the resort callback.
///
/// The callback lives in a typed slot on the record, so a user value under
/// this key is dropped at creation.
pub const ON_RESORT_KEY: &str = "onResort";

/// Opaque layer identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

impl AsRef<str> for LayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for LayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// How a layer takes part in pointer input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerEvents {
    /// The layer captures all pointer input.
    #[default]
    Auto,
    /// The layer ignores all pointer input.
    None,
    /// The container ignores input; opted-in descendants capture it.
    PassThrough,
}

impl PointerEvents {
    /// Name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::PassThrough => "pass-through",
        }
    }
}

/// Coordinate system a layer wrapper is placed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionMode {
    /// Normal flow.
    #[default]
    Relative,
    /// Relative to the nearest positioned ancestor.
    Absolute,
    /// Relative to the viewport.
    Fixed,
    /// Relative until a scroll threshold, then fixed.
    Sticky,
}

impl PositionMode {
    /// Name as used in configuration and CSS.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
            Self::Sticky => "sticky",
        }
    }
}

/// Inclusive z-index range enforced at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZBounds {
    /// Lowest accepted z-index.
    pub min: i32,
    /// Highest accepted z-index.
    pub max: i32,
}

impl ZBounds {
    /// Whether `z` lies inside the range.
    pub fn contains(&self, z: i32) -> bool {
        (self.min..=self.max).contains(&z)
    }

    /// Clamp `z` into the range.
    pub fn clamp(&self, z: i32) -> i32 {
        z.clamp(self.min, self.max)
    }
}

impl Default for ZBounds {
    fn default() -> Self {
        Self {
            min: Z_INDEX_MIN,
            max: Z_INDEX_MAX,
        }
    }
}

impl From<&ZIndexConfig> for ZBounds {
    fn from(config: &ZIndexConfig) -> Self {
        Self {
            min: config.min,
            max: config.max,
        }
    }
}

/// Construction-time layer configuration.
///
/// Optional fields get their defaults from the factory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    /// Display label; must not be blank.
    pub name: String,
    /// Stacking value.
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_events: Option<PointerEvents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_mode: Option<PositionMode>,
    /// Only meaningful with `PointerEvents::PassThrough`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_clicks: Option<bool>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl LayerConfig {
    /// Config with a name and z-index; everything else defaulted.
    pub fn new(name: impl Into<String>, z_index: i32) -> Self {
        Self {
            name: name.into(),
            z_index,
            ..Self::default()
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn with_pointer_events(mut self, pointer_events: PointerEvents) -> Self {
        self.pointer_events = Some(pointer_events);
        self
    }

    pub fn with_position_mode(mut self, position_mode: PositionMode) -> Self {
        self.position_mode = Some(position_mode);
        self
    }

    pub fn with_capture_clicks(mut self, capture_clicks: bool) -> Self {
        self.capture_clicks = Some(capture_clicks);
        self
    }

    /// Add one metadata entry.
    pub fn with_meta(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
