//! Layer construction and validation.

use crate::error::{Bound, ValidationError};
use crate::id_gen::IdGenerator;
use crate::layer::LayerRecord;
use crate::machine::{LayerMachine, LayerState};
use crate::resort::ResortHook;
use crate::types::{LayerConfig, ZBounds, ON_RESORT_KEY};
use std::sync::Arc;
use tracing::debug;

/// Default opacity for new layers.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Builds validated layer records.
#[derive(Debug, Clone, Default)]
pub struct LayerFactory {
    ids: IdGenerator,
    bounds: ZBounds,
}

impl LayerFactory {
    pub fn new(ids: IdGenerator, bounds: ZBounds) -> Self {
        Self { ids, bounds }
    }

    pub fn bounds(&self) -> ZBounds {
        self.bounds
    }

    pub fn id_generator(&self) -> &IdGenerator {
        &self.ids
    }

    /// Check `config` against the factory's bounds.
    pub fn validate(&self, config: &LayerConfig) -> Result<(), ValidationError> {
        validate_config(config, self.bounds)
    }

    /// Validate `config` and build a record with a fresh id and a running
    /// state machine.
    ///
    /// Nothing is allocated when validation fails.
    pub fn create_layer(
        &self,
        config: &LayerConfig,
        on_resort: Option<ResortHook>,
    ) -> Result<LayerRecord, ValidationError> {
        self.validate(config)?;

        let visible = config.visible.unwrap_or(true);
        let id = self.ids.generate();
        let machine = Arc::new(LayerMachine::start(LayerState::initial(visible)));

        let mut metadata = config.metadata.clone();
        if metadata.remove(ON_RESORT_KEY).is_some() {
            debug!(layer_id = %id, key = ON_RESORT_KEY, "dropped reserved metadata key");
        }

        debug!(layer_id = %id, name = %config.name, z_index = config.z_index, "layer created");

        Ok(LayerRecord {
            id,
            name: config.name.clone(),
            z_index: config.z_index,
            visible,
            opacity: config.opacity.unwrap_or(DEFAULT_OPACITY),
            locked: config.locked.unwrap_or(false),
            pointer_events: config.pointer_events.unwrap_or_default(),
            position_mode: config.position_mode.unwrap_or_default(),
            capture_clicks: config.capture_clicks.unwrap_or(false),
            metadata,
            machine,
            on_resort,
        })
    }
}

/// Validate a layer config against `bounds`.
pub fn validate_config(config: &LayerConfig, bounds: ZBounds) -> Result<(), ValidationError> {
    if config.z_index < bounds.min || config.z_index > bounds.max {
        return Err(ValidationError::ZIndexOutOfRange {
            value: config.z_index,
            min: bounds.min,
            max: bounds.max,
            bound: if config.z_index < bounds.min {
                Bound::Lower
            } else {
                Bound::Upper
            },
        });
    }

    if let Some(opacity) = config.opacity {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ValidationError::OpacityOutOfRange { value: opacity });
        }
    }

    if config.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    Ok(())
}
