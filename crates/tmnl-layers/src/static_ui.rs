//! Presets for fixed application chrome.
//!
//! Static UI sits above canvas content:
//!
//! - canvas content: 0..=999
//! - chrome (header, sidebars, toolbars): 1000..=1999
//! - overlays (drawers, modals): 2000..=2999
//! - system (command bar, toasts): 3000 and up

use crate::types::{LayerConfig, Metadata, PointerEvents, PositionMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic role of a chrome layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaticUiRole {
    Header,
    Footer,
    SidebarLeft,
    SidebarRight,
    Toolbar,
    Drawer,
    Overlay,
    Command,
    Toast,
}

impl StaticUiRole {
    pub const ALL: [StaticUiRole; 9] = [
        Self::Header,
        Self::Footer,
        Self::SidebarLeft,
        Self::SidebarRight,
        Self::Toolbar,
        Self::Drawer,
        Self::Overlay,
        Self::Command,
        Self::Toast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
            Self::SidebarLeft => "sidebar-left",
            Self::SidebarRight => "sidebar-right",
            Self::Toolbar => "toolbar",
            Self::Drawer => "drawer",
            Self::Overlay => "overlay",
            Self::Command => "command",
            Self::Toast => "toast",
        }
    }

    /// Base z-index for the role.
    pub fn z_index(&self) -> i32 {
        match self {
            Self::Header | Self::Footer => 1000,
            Self::SidebarLeft | Self::SidebarRight => 1100,
            Self::Toolbar => 1200,
            Self::Drawer => 2000,
            Self::Overlay => 2500,
            Self::Command => 3000,
            Self::Toast => 3500,
        }
    }

    pub fn position_mode(&self) -> PositionMode {
        PositionMode::Fixed
    }

    pub fn pointer_events(&self) -> PointerEvents {
        match self {
            Self::Toolbar | Self::Toast => PointerEvents::PassThrough,
            _ => PointerEvents::Auto,
        }
    }
}

impl fmt::Display for StaticUiRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration of one chrome layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticUiLayerConfig {
    pub role: StaticUiRole,
    /// Defaults to the role name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Added to the role's base z-index.
    #[serde(default)]
    pub z_index_offset: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl StaticUiLayerConfig {
    pub fn new(role: StaticUiRole) -> Self {
        Self {
            role,
            name: None,
            z_index_offset: 0,
            visible: None,
            locked: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.z_index_offset = offset;
        self
    }

    pub fn to_layer_config(&self) -> LayerConfig {
        LayerConfig {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| self.role.name().to_string()),
            z_index: self.role.z_index().saturating_add(self.z_index_offset),
            visible: self.visible,
            opacity: None,
            locked: self.locked,
            pointer_events: Some(self.role.pointer_events()),
            position_mode: Some(self.role.position_mode()),
            capture_clicks: None,
            metadata: self.metadata.clone(),
        }
    }
}

impl From<StaticUiRole> for StaticUiLayerConfig {
    fn from(role: StaticUiRole) -> Self {
        Self::new(role)
    }
}

impl From<&StaticUiLayerConfig> for LayerConfig {
    fn from(config: &StaticUiLayerConfig) -> Self {
        config.to_layer_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StaticUiRole::Header, 1000, PointerEvents::Auto ; "header")]
    #[test_case(StaticUiRole::SidebarRight, 1100, PointerEvents::Auto ; "sidebar right")]
    #[test_case(StaticUiRole::Toolbar, 1200, PointerEvents::PassThrough ; "toolbar")]
    #[test_case(StaticUiRole::Overlay, 2500, PointerEvents::Auto ; "overlay")]
    #[test_case(StaticUiRole::Toast, 3500, PointerEvents::PassThrough ; "toast")]
    fn test_role_presets(role: StaticUiRole, z: i32, pointer: PointerEvents) {
        let config = StaticUiLayerConfig::new(role).to_layer_config();
        assert_eq!(config.z_index, z);
        assert_eq!(config.pointer_events, Some(pointer));
        assert_eq!(config.position_mode, Some(PositionMode::Fixed));
        assert_eq!(config.name, role.name());
    }

    #[test]
    fn test_name_and_offset_overrides() {
        let config = StaticUiLayerConfig::new(StaticUiRole::Drawer)
            .with_name("settings-drawer")
            .with_offset(5)
            .to_layer_config();

        assert_eq!(config.name, "settings-drawer");
        assert_eq!(config.z_index, 2005);
    }

    #[test]
    fn test_roles_deserialize_kebab_case() {
        let config: StaticUiLayerConfig =
            serde_json::from_str(r#"{ "role": "sidebar-left", "zIndexOffset": -10 }"#).unwrap();
        assert_eq!(config.role, StaticUiRole::SidebarLeft);
        assert_eq!(LayerConfig::from(&config).z_index, 1090);
    }

    #[test]
    fn test_all_presets_valid() {
        for role in StaticUiRole::ALL {
            let config = LayerConfig::from(&StaticUiLayerConfig::from(role));
            assert!(crate::factory::validate_config(&config, Default::default()).is_ok());
        }
    }
}
