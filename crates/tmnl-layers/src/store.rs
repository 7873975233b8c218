//! Reactive views over a [`LayerManager`].
//!
//! Every view is a projection of the manager's watch channel, so all
//! views observe the same list and update together.

use crate::layer::LayerRecord;
use crate::manager::{sort_by_z, LayerList, LayerManager};
use crate::types::{LayerId, PointerEvents};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// A value that can be read now and watched for changes.
pub trait Observable<T> {
    /// Current value.
    fn get(&self) -> T;

    /// Stream of values following the current one.
    fn subscribe(&self) -> Subscription<T>;
}

type Projection<T> = Arc<dyn Fn(&LayerList) -> T + Send + Sync>;

/// A value derived from the layer list.
pub struct Derived<T> {
    source: watch::Receiver<LayerList>,
    project: Projection<T>,
}

impl<T> Derived<T> {
    pub(crate) fn new<F>(source: watch::Receiver<LayerList>, project: F) -> Self
    where
        F: Fn(&LayerList) -> T + Send + Sync + 'static,
    {
        Self {
            source,
            project: Arc::new(project),
        }
    }

    /// Derive a further value from this one.
    pub fn map<U, F>(&self, f: F) -> Derived<U>
    where
        T: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let project = Arc::clone(&self.project);
        Derived::new(self.source.clone(), move |layers| f(project(layers)))
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            project: Arc::clone(&self.project),
        }
    }
}

impl<T> Observable<T> for Derived<T> {
    fn get(&self) -> T {
        (self.project)(&*self.source.borrow())
    }

    fn subscribe(&self) -> Subscription<T> {
        let mut source = self.source.clone();
        let current = (self.project)(&*source.borrow_and_update());
        Subscription {
            source,
            project: Arc::clone(&self.project),
            current,
        }
    }
}

impl<T> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived").finish_non_exhaustive()
    }
}

/// Receives successive values of a [`Derived`].
pub struct Subscription<T> {
    source: watch::Receiver<LayerList>,
    project: Projection<T>,
    current: T,
}

impl<T: Clone> Subscription<T> {
    /// Last value seen.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Wait for the next change of the underlying list.
    ///
    /// Returns `None` once the manager is gone.
    pub async fn next(&mut self) -> Option<T> {
        self.source.changed().await.ok()?;
        let value = (self.project)(&*self.source.borrow_and_update());
        self.current = value.clone();
        Some(value)
    }
}

impl<T: Clone + PartialEq> Subscription<T> {
    /// Wait for a change that produces a different value.
    pub async fn next_distinct(&mut self) -> Option<T> {
        loop {
            self.source.changed().await.ok()?;
            let value = (self.project)(&*self.source.borrow_and_update());
            if value != self.current {
                self.current = value.clone();
                return Some(value);
            }
        }
    }
}

/// Layers sorted by z-index plus a digest of what is on screen.
#[derive(Debug, Clone)]
pub struct SortedLayers {
    pub layers: Vec<LayerRecord>,
    /// `id:z` pairs of visible layers joined with `|`, in z order.
    pub visual_hash: String,
}

impl SortedLayers {
    pub fn from_layers(layers: &[LayerRecord]) -> Self {
        let layers = sort_by_z(layers);
        let visual_hash = visual_hash(&layers);
        Self {
            layers,
            visual_hash,
        }
    }
}

/// Digest of the visible stacking order. `layers` must be sorted.
pub fn visual_hash(layers: &[LayerRecord]) -> String {
    layers
        .iter()
        .filter(|layer| layer.visible())
        .map(|layer| format!("{}:{}", layer.id(), layer.z_index()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Per-id views shared by a store and the ops and handles it hands out.
#[derive(Clone, Default)]
struct ViewCache(Arc<Mutex<HashMap<LayerId, Derived<Option<LayerRecord>>>>>);

impl ViewCache {
    fn lock(&self) -> MutexGuard<'_, HashMap<LayerId, Derived<Option<LayerRecord>>>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, id: &LayerId) -> bool {
        self.lock().remove(id).is_some()
    }

    /// Remove `id` from the manager and drop its view.
    fn remove_layer(&self, manager: &LayerManager, id: &LayerId) -> Option<LayerRecord> {
        let removed = manager.remove_layer(id);
        self.release(id);
        removed
    }
}

impl fmt::Debug for ViewCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewCache")
            .field("views", &self.lock().len())
            .finish()
    }
}

/// Reactive facade over a [`LayerManager`].
#[derive(Clone)]
pub struct LayerStore {
    manager: LayerManager,
    views: ViewCache,
}

impl LayerStore {
    pub fn new(manager: LayerManager) -> Self {
        Self {
            manager,
            views: ViewCache::default(),
        }
    }

    pub fn manager(&self) -> &LayerManager {
        &self.manager
    }

    /// All layers in insertion order.
    pub fn layers(&self) -> Derived<LayerList> {
        Derived::new(self.manager.subscribe(), |layers| layers.clone())
    }

    /// All layers sorted by z-index.
    pub fn layer_index(&self) -> Derived<Vec<LayerRecord>> {
        Derived::new(self.manager.subscribe(), |layers| sort_by_z(layers))
    }

    /// A single layer; `None` while no layer has `id`.
    ///
    /// Repeated calls with the same id return the same view.
    pub fn layer(&self, id: &LayerId) -> Derived<Option<LayerRecord>> {
        self.views
            .lock()
            .entry(id.clone())
            .or_insert_with(|| {
                let id = id.clone();
                Derived::new(self.manager.subscribe(), move |layers| {
                    layers.iter().find(|layer| layer.id() == &id).cloned()
                })
            })
            .clone()
    }

    /// Drop the cached view for `id`. Existing clones keep working.
    ///
    /// Removals made through [`LayerOps`] or [`LayerHandle`] release the
    /// view themselves.
    pub fn release(&self, id: &LayerId) -> bool {
        self.views.release(id)
    }

    pub fn sorted(&self) -> Derived<SortedLayers> {
        Derived::new(self.manager.subscribe(), |layers| {
            SortedLayers::from_layers(layers)
        })
    }

    /// The visual hash alone, for change detection.
    pub fn visual_hash(&self) -> Derived<String> {
        self.sorted().map(|sorted| sorted.visual_hash)
    }

    /// Write operations.
    pub fn ops(&self) -> LayerOps {
        LayerOps {
            manager: self.manager.clone(),
            views: self.views.clone(),
        }
    }

    /// Read and write access bound to one layer.
    pub fn handle(&self, id: LayerId) -> LayerHandle {
        LayerHandle {
            layer: self.layer(&id),
            manager: self.manager.clone(),
            views: self.views.clone(),
            id,
        }
    }
}

impl fmt::Debug for LayerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerStore")
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

/// Write operations forwarded to the manager.
#[derive(Debug, Clone)]
pub struct LayerOps {
    manager: LayerManager,
    views: ViewCache,
}

impl LayerOps {
    pub fn add_layer(&self, layer: LayerRecord) {
        self.manager.add_layer(layer);
    }

    pub fn remove_layer(&self, id: &LayerId) -> Option<LayerRecord> {
        self.views.remove_layer(&self.manager, id)
    }

    pub async fn bring_to_front(&self, id: &LayerId) {
        self.manager.bring_to_front(id).await;
    }

    pub async fn send_to_back(&self, id: &LayerId) {
        self.manager.send_to_back(id).await;
    }

    pub fn set_visible(&self, id: &LayerId, visible: bool) {
        self.manager.set_visible(id, visible);
    }

    pub fn set_opacity(&self, id: &LayerId, opacity: f64) {
        self.manager.set_opacity(id, opacity);
    }

    pub fn set_locked(&self, id: &LayerId, locked: bool) {
        self.manager.set_locked(id, locked);
    }

    pub fn set_pointer_events(&self, id: &LayerId, pointer_events: PointerEvents) {
        self.manager.set_pointer_events(id, pointer_events);
    }
}

/// One layer's current record plus its write operations.
#[derive(Debug, Clone)]
pub struct LayerHandle {
    id: LayerId,
    layer: Derived<Option<LayerRecord>>,
    manager: LayerManager,
    views: ViewCache,
}

impl LayerHandle {
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    /// Current record, if the layer is registered.
    pub fn layer(&self) -> Option<LayerRecord> {
        self.layer.get()
    }

    pub fn watch(&self) -> Subscription<Option<LayerRecord>> {
        self.layer.subscribe()
    }

    pub async fn bring_to_front(&self) {
        self.manager.bring_to_front(&self.id).await;
    }

    pub async fn send_to_back(&self) {
        self.manager.send_to_back(&self.id).await;
    }

    pub fn set_visible(&self, visible: bool) {
        self.manager.set_visible(&self.id, visible);
    }

    pub fn set_opacity(&self, opacity: f64) {
        self.manager.set_opacity(&self.id, opacity);
    }

    pub fn set_locked(&self, locked: bool) {
        self.manager.set_locked(&self.id, locked);
    }

    pub fn set_pointer_events(&self, pointer_events: PointerEvents) {
        self.manager.set_pointer_events(&self.id, pointer_events);
    }

    pub fn remove(&self) -> Option<LayerRecord> {
        self.views.remove_layer(&self.manager, &self.id)
    }
}
