//! Wrap a component so that it is registered as a layer while mounted.
//!
//! [`with_layering`] pairs any component value with a static
//! [`LayerConfig`]. Mounting the result creates and registers a layer and
//! returns a guard that deregisters it when dropped. [`Presentation`]
//! derives the container styling a renderer should apply.

use crate::error::ValidationError;
use crate::layer::LayerRecord;
use crate::manager::LayerManager;
use crate::resort::resort_hook_sync;
use crate::system::LayerSystem;
use crate::types::{LayerConfig, LayerId, PointerEvents, PositionMode};
use std::fmt;
use tmnl_common_log::spans::layer_span;
use tracing::{debug, info};

/// Positioning of the layer container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStyle {
    Relative,
    Absolute,
    /// Pinned to the viewport, covering it by default.
    Fixed { inset: u32 },
    Sticky,
}

impl PositionStyle {
    pub fn from_mode(mode: PositionMode) -> Self {
        match mode {
            PositionMode::Relative => Self::Relative,
            PositionMode::Absolute => Self::Absolute,
            PositionMode::Fixed => Self::Fixed { inset: 0 },
            PositionMode::Sticky => Self::Sticky,
        }
    }

    pub fn mode(&self) -> PositionMode {
        match self {
            Self::Relative => PositionMode::Relative,
            Self::Absolute => PositionMode::Absolute,
            Self::Fixed { .. } => PositionMode::Fixed,
            Self::Sticky => PositionMode::Sticky,
        }
    }
}

/// CSS `pointer-events` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerStyle {
    Auto,
    None,
}

impl PointerStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
        }
    }
}

/// Container styling and data attributes for a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub layer_id: Option<LayerId>,
    pub name: String,
    pub z_index: i32,
    pub opacity: f64,
    pub position: PositionStyle,
    pub outer_pointer: PointerStyle,
    /// Set when children need their own capture wrapper.
    pub inner_pointer: Option<PointerStyle>,
}

impl Presentation {
    /// Presentation of a live layer.
    pub fn from_record(layer: &LayerRecord) -> Self {
        let (outer_pointer, inner_pointer) =
            pointer_styles(layer.pointer_events(), layer.capture_clicks());
        Self {
            layer_id: Some(layer.id().clone()),
            name: layer.name().to_string(),
            z_index: layer.z_index(),
            opacity: if layer.visible() { layer.opacity() } else { 0.0 },
            position: PositionStyle::from_mode(layer.position_mode()),
            outer_pointer,
            inner_pointer,
        }
    }

    /// Presentation from a static config, before a layer exists.
    pub fn from_config(config: &LayerConfig) -> Self {
        let (outer_pointer, inner_pointer) = pointer_styles(
            config.pointer_events.unwrap_or_default(),
            config.capture_clicks.unwrap_or(false),
        );
        let opacity = if config.visible == Some(false) {
            0.0
        } else {
            config.opacity.unwrap_or(1.0)
        };
        Self {
            layer_id: None,
            name: config.name.clone(),
            z_index: config.z_index,
            opacity,
            position: PositionStyle::from_mode(config.position_mode.unwrap_or_default()),
            outer_pointer,
            inner_pointer,
        }
    }

    /// Outer container declarations in render order.
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        let mut declarations = vec![("position", self.position.mode().as_str().to_string())];
        if let PositionStyle::Fixed { inset } = self.position {
            declarations.push(("inset", inset.to_string()));
        }
        declarations.push(("z-index", self.z_index.to_string()));
        declarations.push(("opacity", self.opacity.to_string()));
        declarations.push(("pointer-events", self.outer_pointer.as_str().to_string()));
        declarations
    }

    /// Outer container style string.
    pub fn css(&self) -> String {
        self.declarations()
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Inner wrapper style string, when one is needed.
    pub fn inner_css(&self) -> Option<String> {
        self.inner_pointer
            .map(|pointer| format!("pointer-events: {}", pointer.as_str()))
    }

    pub fn data_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = Vec::with_capacity(3);
        if let Some(id) = &self.layer_id {
            attributes.push(("data-layer-id", id.to_string()));
        }
        attributes.push(("data-layer-name", self.name.clone()));
        attributes.push(("data-layer-position", self.position.mode().as_str().to_string()));
        attributes
    }
}

fn pointer_styles(
    pointer_events: PointerEvents,
    capture_clicks: bool,
) -> (PointerStyle, Option<PointerStyle>) {
    match pointer_events {
        PointerEvents::Auto => (PointerStyle::Auto, None),
        PointerEvents::None => (PointerStyle::None, None),
        PointerEvents::PassThrough if capture_clicks => {
            (PointerStyle::None, Some(PointerStyle::Auto))
        }
        PointerEvents::PassThrough => (PointerStyle::None, None),
    }
}

/// A component paired with its layer configuration.
#[derive(Debug, Clone)]
pub struct Layered<C> {
    component: C,
    config: LayerConfig,
}

/// Pair `component` with `config`.
pub fn with_layering<C>(component: C, config: LayerConfig) -> Layered<C> {
    Layered { component, config }
}

impl<C> Layered<C> {
    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Create and register a layer in `system`.
    pub fn mount(&self, system: &LayerSystem) -> Result<MountedLayer<'_, C>, ValidationError> {
        let hook = resort_hook_sync(|layer| {
            layer_span(layer.id().as_str(), layer.name()).in_scope(|| {
                info!(z_index = layer.z_index(), "layer resorted");
            });
        });
        let layer = system.spawn_layer(&self.config, Some(hook))?;
        layer_span(layer.id().as_str(), layer.name()).in_scope(|| debug!("layer mounted"));

        Ok(MountedLayer {
            id: layer.id().clone(),
            layered: self,
            manager: system.manager().clone(),
            mounted: true,
        })
    }
}

/// A registered layer tied to a component.
///
/// The layer is removed from the manager when this guard is dropped.
pub struct MountedLayer<'a, C> {
    id: LayerId,
    layered: &'a Layered<C>,
    manager: LayerManager,
    mounted: bool,
}

impl<'a, C> MountedLayer<'a, C> {
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn component(&self) -> &'a C {
        &self.layered.component
    }

    /// Current record, `None` once the layer was removed elsewhere.
    pub fn record(&self) -> Option<LayerRecord> {
        self.manager.get_layer(&self.id)
    }

    /// Live presentation, or the static one if the layer is gone.
    pub fn presentation(&self) -> Presentation {
        match self.record() {
            Some(layer) => Presentation::from_record(&layer),
            None => Presentation {
                layer_id: Some(self.id.clone()),
                ..Presentation::from_config(&self.layered.config)
            },
        }
    }

    /// Deregister now, returning the removed record.
    pub fn unmount(mut self) -> Option<LayerRecord> {
        self.deregister()
    }

    fn deregister(&mut self) -> Option<LayerRecord> {
        if !self.mounted {
            return None;
        }
        self.mounted = false;
        debug!(layer_id = %self.id, "layer unmounted");
        self.manager.remove_layer(&self.id)
    }
}

impl<C> Drop for MountedLayer<'_, C> {
    fn drop(&mut self) {
        self.deregister();
    }
}

impl<C> fmt::Debug for MountedLayer<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedLayer")
            .field("id", &self.id)
            .field("name", &self.layered.config.name)
            .field("mounted", &self.mounted)
            .finish()
    }
}
