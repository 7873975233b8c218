//! The canonical layer collection.
//!
//! [`LayerManager`] owns an ordered list of [`LayerRecord`]s behind a
//! `tokio::sync::watch` channel. Every mutation is a single atomic
//! read-modify-write of the whole list; readers always see a complete,
//! immutable list. Subscribers are notified only when the list actually
//! changes.

use crate::layer::LayerRecord;
use crate::machine::LayerEvent;
use crate::resort::{self, ResortDispatch};
use crate::types::{LayerId, PointerEvents, ZBounds, DEFAULT_RESORT_GAP};
use std::fmt;
use std::sync::Arc;
use tmnl_common_config::LayerSystemConfig;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

/// Immutable snapshot of the collection in insertion order.
pub type LayerList = Arc<[LayerRecord]>;

/// Manager behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagerPolicy {
    /// Distance kept from the current extreme on resort.
    pub resort_gap: i32,
    /// Range used when `clamp_resort_to_bounds` is set.
    pub bounds: ZBounds,
    pub clamp_resort_to_bounds: bool,
    pub stop_machine_on_remove: bool,
    pub dispatch: ResortDispatch,
}

impl Default for ManagerPolicy {
    fn default() -> Self {
        Self {
            resort_gap: DEFAULT_RESORT_GAP,
            bounds: ZBounds::default(),
            clamp_resort_to_bounds: false,
            stop_machine_on_remove: false,
            dispatch: ResortDispatch::Inline,
        }
    }
}

impl From<&LayerSystemConfig> for ManagerPolicy {
    fn from(config: &LayerSystemConfig) -> Self {
        Self {
            resort_gap: config.z_index.resort_gap,
            bounds: ZBounds::from(&config.z_index),
            clamp_resort_to_bounds: config.lifecycle.clamp_resort_to_bounds,
            stop_machine_on_remove: config.lifecycle.stop_machine_on_remove,
            dispatch: config.lifecycle.resort_dispatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Front,
    Back,
}

impl Direction {
    fn event(self) -> LayerEvent {
        match self {
            Self::Front => LayerEvent::BringToFront,
            Self::Back => LayerEvent::SendToBack,
        }
    }

    fn operation(self) -> &'static str {
        match self {
            Self::Front => "bring_to_front",
            Self::Back => "send_to_back",
        }
    }
}

struct Inner {
    layers: watch::Sender<LayerList>,
    policy: ManagerPolicy,
}

/// Shared handle to a layer collection.
///
/// Clones refer to the same collection.
#[derive(Clone)]
pub struct LayerManager {
    inner: Arc<Inner>,
}

impl LayerManager {
    /// Empty manager with the default policy.
    pub fn new() -> Self {
        Self::with_policy(ManagerPolicy::default())
    }

    pub fn with_policy(policy: ManagerPolicy) -> Self {
        let empty: LayerList = Arc::from(Vec::new());
        let (layers, _) = watch::channel(empty);
        Self {
            inner: Arc::new(Inner { layers, policy }),
        }
    }

    pub fn policy(&self) -> &ManagerPolicy {
        &self.inner.policy
    }

    /// All layers in insertion order.
    pub fn get_all_layers(&self) -> LayerList {
        self.inner.layers.borrow().clone()
    }

    /// All layers ordered by z-index ascending. Ties keep insertion order.
    pub fn get_layer_index(&self) -> Vec<LayerRecord> {
        sort_by_z(&self.get_all_layers())
    }

    /// The first layer with `id`.
    pub fn get_layer(&self, id: &LayerId) -> Option<LayerRecord> {
        self.inner
            .layers
            .borrow()
            .iter()
            .find(|layer| layer.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.layers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a layer.
    ///
    /// Ids are not checked for uniqueness; the factory guarantees them.
    pub fn add_layer(&self, layer: LayerRecord) {
        debug!(layer_id = %layer.id(), z_index = layer.z_index(), "layer added");
        self.update(|layers| {
            let mut next = layers.to_vec();
            next.push(layer);
            Some((next.into(), ()))
        });
    }

    /// Remove every layer with `id`, returning the first one removed.
    ///
    /// Removing an unknown id is a no-op and does not notify subscribers.
    pub fn remove_layer(&self, id: &LayerId) -> Option<LayerRecord> {
        let removed = self.update(|layers| {
            if !layers.iter().any(|layer| layer.id() == id) {
                return None;
            }
            let (removed, kept): (Vec<_>, Vec<_>) =
                layers.iter().cloned().partition(|layer| layer.id() == id);
            Some((kept.into(), removed))
        });

        let Some(removed) = removed else {
            trace!(layer_id = %id, "remove_layer: unknown id");
            return None;
        };

        if self.inner.policy.stop_machine_on_remove {
            for layer in &removed {
                layer.machine().stop();
            }
        }
        debug!(layer_id = %id, "layer removed");
        removed.into_iter().next()
    }

    /// Move a layer above every other layer.
    ///
    /// The layer's new z-index is the current maximum plus the resort gap.
    /// The resort hook, if any, runs after the change is committed.
    pub async fn bring_to_front(&self, id: &LayerId) {
        self.resort(id, Direction::Front).await;
    }

    /// Move a layer below every other layer.
    pub async fn send_to_back(&self, id: &LayerId) {
        self.resort(id, Direction::Back).await;
    }

    pub fn set_visible(&self, id: &LayerId, visible: bool) {
        let updated = self.replace_layer(id, |layer, _| {
            layer.machine().send(if visible {
                LayerEvent::Show
            } else {
                LayerEvent::Hide
            });
            layer.with_visible(visible)
        });
        if updated.is_some() {
            debug!(layer_id = %id, visible, "visibility changed");
        }
    }

    /// Set opacity, clamped into `[0, 1]`. NaN is ignored.
    pub fn set_opacity(&self, id: &LayerId, opacity: f64) {
        if opacity.is_nan() {
            warn!(layer_id = %id, "ignoring NaN opacity");
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);
        self.replace_layer(id, |layer, _| layer.with_opacity(opacity));
    }

    pub fn set_locked(&self, id: &LayerId, locked: bool) {
        let updated = self.replace_layer(id, |layer, _| {
            layer.machine().send(if locked {
                LayerEvent::Lock
            } else {
                LayerEvent::Unlock
            });
            layer.with_locked(locked)
        });
        if updated.is_some() {
            debug!(layer_id = %id, locked, "lock changed");
        }
    }

    pub fn set_pointer_events(&self, id: &LayerId, pointer_events: PointerEvents) {
        self.replace_layer(id, |layer, _| layer.with_pointer_events(pointer_events));
    }

    /// Watch the collection.
    pub fn subscribe(&self) -> watch::Receiver<LayerList> {
        self.inner.layers.subscribe()
    }

    async fn resort(&self, id: &LayerId, direction: Direction) {
        let policy = self.inner.policy;
        let updated = self.replace_layer(id, |layer, layers| {
            layer.with_z_index(policy.resort_target(layers, direction))
        });

        let Some(updated) = updated else {
            trace!(layer_id = %id, operation = direction.operation(), "resort: unknown id");
            return;
        };

        updated.machine().send(direction.event());
        debug!(
            layer_id = %id,
            z_index = updated.z_index(),
            operation = direction.operation(),
            "layer resorted"
        );

        if let Some(hook) = updated.on_resort().cloned() {
            resort::dispatch(hook, updated, direction.operation(), policy.dispatch).await;
        }
    }

    /// Replace the first layer with `id` by `f(layer, all_layers)`.
    fn replace_layer<F>(&self, id: &LayerId, f: F) -> Option<LayerRecord>
    where
        F: FnOnce(&LayerRecord, &[LayerRecord]) -> LayerRecord,
    {
        self.update(|layers| {
            let index = layers.iter().position(|layer| layer.id() == id)?;
            let updated = f(&layers[index], layers);
            let mut next = layers.to_vec();
            next[index] = updated.clone();
            Some((next.into(), updated))
        })
    }

    /// Atomically swap the list for the one returned by `f`.
    ///
    /// Returning `None` leaves the list untouched and wakes no one.
    fn update<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&LayerList) -> Option<(LayerList, R)>,
    {
        let mut result = None;
        self.inner.layers.send_if_modified(|layers| match f(layers) {
            Some((next, value)) => {
                *layers = next;
                result = Some(value);
                true
            }
            None => false,
        });
        result
    }
}

impl ManagerPolicy {
    fn resort_target(&self, layers: &[LayerRecord], direction: Direction) -> i32 {
        let z = match direction {
            Direction::Front => layers
                .iter()
                .map(LayerRecord::z_index)
                .max()
                .unwrap_or(0)
                .saturating_add(self.resort_gap),
            Direction::Back => layers
                .iter()
                .map(LayerRecord::z_index)
                .min()
                .unwrap_or(0)
                .saturating_sub(self.resort_gap),
        };

        if self.clamp_resort_to_bounds {
            self.bounds.clamp(z)
        } else {
            z
        }
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LayerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerManager")
            .field("layers", &self.len())
            .field("policy", &self.inner.policy)
            .finish()
    }
}

/// Stable sort by z-index ascending.
pub(crate) fn sort_by_z(layers: &[LayerRecord]) -> Vec<LayerRecord> {
    let mut sorted = layers.to_vec();
    sorted.sort_by_key(LayerRecord::z_index);
    sorted
}
