//! Layer records.

use crate::machine::{LayerMachine, LayerState};
use crate::resort::ResortHook;
use crate::types::{LayerId, Metadata, PointerEvents, PositionMode};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A registered layer.
///
/// Records are immutable values. Every change made through the manager
/// replaces the record with a new one; the state machine is shared between
/// all records of the same layer.
#[derive(Clone)]
pub struct LayerRecord {
    pub(crate) id: LayerId,
    pub(crate) name: String,
    pub(crate) z_index: i32,
    pub(crate) visible: bool,
    pub(crate) opacity: f64,
    pub(crate) locked: bool,
    pub(crate) pointer_events: PointerEvents,
    pub(crate) position_mode: PositionMode,
    pub(crate) capture_clicks: bool,
    pub(crate) metadata: Metadata,
    pub(crate) machine: Arc<LayerMachine>,
    pub(crate) on_resort: Option<ResortHook>,
}

impl LayerRecord {
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn pointer_events(&self) -> PointerEvents {
        self.pointer_events
    }

    pub fn position_mode(&self) -> PositionMode {
        self.position_mode
    }

    pub fn capture_clicks(&self) -> bool {
        self.capture_clicks
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The layer's state machine.
    pub fn machine(&self) -> &Arc<LayerMachine> {
        &self.machine
    }

    /// Current machine state.
    pub fn state(&self) -> LayerState {
        self.machine.state()
    }

    /// Callback run after the layer is resorted.
    pub fn on_resort(&self) -> Option<&ResortHook> {
        self.on_resort.as_ref()
    }

    /// Serializable view of the record.
    pub fn snapshot(&self) -> LayerSnapshot {
        LayerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            z_index: self.z_index,
            visible: self.visible,
            opacity: self.opacity,
            locked: self.locked,
            pointer_events: self.pointer_events,
            position_mode: self.position_mode,
            capture_clicks: self.capture_clicks,
            metadata: self.metadata.clone(),
            state: self.state(),
        }
    }

    pub(crate) fn with_z_index(&self, z_index: i32) -> Self {
        Self {
            z_index,
            ..self.clone()
        }
    }

    pub(crate) fn with_visible(&self, visible: bool) -> Self {
        Self {
            visible,
            ..self.clone()
        }
    }

    pub(crate) fn with_opacity(&self, opacity: f64) -> Self {
        Self {
            opacity,
            ..self.clone()
        }
    }

    pub(crate) fn with_locked(&self, locked: bool) -> Self {
        Self {
            locked,
            ..self.clone()
        }
    }

    pub(crate) fn with_pointer_events(&self, pointer_events: PointerEvents) -> Self {
        Self {
            pointer_events,
            ..self.clone()
        }
    }
}

impl fmt::Debug for LayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("z_index", &self.z_index)
            .field("visible", &self.visible)
            .field("opacity", &self.opacity)
            .field("locked", &self.locked)
            .field("pointer_events", &self.pointer_events)
            .field("position_mode", &self.position_mode)
            .field("capture_clicks", &self.capture_clicks)
            .field("metadata", &self.metadata)
            .field("state", &self.state())
            .field("on_resort", &self.on_resort.is_some())
            .finish()
    }
}

/// Plain-data copy of a [`LayerRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSnapshot {
    pub id: LayerId,
    pub name: String,
    pub z_index: i32,
    pub visible: bool,
    pub opacity: f64,
    pub locked: bool,
    pub pointer_events: PointerEvents,
    pub position_mode: PositionMode,
    pub capture_clicks: bool,
    pub metadata: Metadata,
    pub state: LayerState,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LayerRecord {
        LayerRecord {
            id: LayerId::from("abc"),
            name: "canvas".to_string(),
            z_index: 10,
            visible: true,
            opacity: 1.0,
            locked: false,
            pointer_events: PointerEvents::Auto,
            position_mode: PositionMode::Relative,
            capture_clicks: false,
            metadata: Metadata::new(),
            machine: Arc::new(LayerMachine::start(LayerState::Visible)),
            on_resort: None,
        }
    }

    #[test]
    fn test_updates_share_machine() {
        let original = record();
        let moved = original.with_z_index(30);

        assert_eq!(original.z_index(), 10);
        assert_eq!(moved.z_index(), 30);
        assert!(Arc::ptr_eq(original.machine(), moved.machine()));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(record().with_locked(true).snapshot()).unwrap();

        assert_eq!(json["zIndex"], 10);
        assert_eq!(json["pointerEvents"], "auto");
        assert_eq!(json["positionMode"], "relative");
        assert_eq!(json["state"], "visible");
        assert_eq!(json["locked"], true);
        assert_eq!(json["captureClicks"], false);
    }

    #[test]
    fn test_debug_hides_callback() {
        let output = format!("{:?}", record());
        assert!(output.contains("on_resort: false"));
        assert!(output.contains("z_index: 10"));
    }
}
