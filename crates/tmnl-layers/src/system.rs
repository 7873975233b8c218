//! A complete layer system: ids, factory, manager and store.

use crate::error::{Result, ValidationError};
use crate::factory::LayerFactory;
use crate::id_gen::IdGenerator;
use crate::layer::LayerRecord;
use crate::manager::{LayerManager, ManagerPolicy};
use crate::resort::ResortHook;
use crate::store::LayerStore;
use crate::types::{LayerConfig, ZBounds};
use std::path::Path;
use tmnl_common_config::{ConfigLoader, LayerSystemConfig};
use tracing::info;

/// Services sharing one layer collection.
///
/// Separate systems share no state.
#[derive(Debug, Clone)]
pub struct LayerSystem {
    config: LayerSystemConfig,
    factory: LayerFactory,
    manager: LayerManager,
    store: LayerStore,
}

impl LayerSystem {
    pub fn new(config: &LayerSystemConfig) -> Self {
        Self::with_generator(config, IdGenerator::new(config.ids.strategy))
    }

    /// System whose ids come from `f`.
    pub fn with_custom_ids<F>(config: &LayerSystemConfig, f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::with_generator(config, IdGenerator::custom(f))
    }

    fn with_generator(config: &LayerSystemConfig, ids: IdGenerator) -> Self {
        let factory = LayerFactory::new(ids, ZBounds::from(&config.z_index));
        let manager = LayerManager::with_policy(ManagerPolicy::from(config));
        let store = LayerStore::new(manager.clone());
        Self {
            config: config.clone(),
            factory,
            manager,
            store,
        }
    }

    /// Load `.tmnl/layers.yaml` under `project_dir` and build a system.
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self> {
        let loader = ConfigLoader::new(project_dir);
        let config = loader.load()?;
        info!(path = %loader.path().display(), "layer system configured");
        Ok(Self::new(&config))
    }

    /// Build a system from the file named by `TMNL_LAYERS_CONFIG`, or the
    /// current directory's config.
    pub fn from_env() -> Result<Self> {
        let loader = ConfigLoader::from_env();
        let config = loader.load()?;
        info!(path = %loader.path().display(), "layer system configured");
        Ok(Self::new(&config))
    }

    pub fn config(&self) -> &LayerSystemConfig {
        &self.config
    }

    pub fn factory(&self) -> &LayerFactory {
        &self.factory
    }

    pub fn manager(&self) -> &LayerManager {
        &self.manager
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Create a layer and register it.
    pub fn spawn_layer(
        &self,
        config: &LayerConfig,
        on_resort: Option<ResortHook>,
    ) -> std::result::Result<LayerRecord, ValidationError> {
        let layer = self.factory.create_layer(config, on_resort)?;
        self.manager.add_layer(layer.clone());
        Ok(layer)
    }
}

impl Default for LayerSystem {
    fn default() -> Self {
        Self::new(&LayerSystemConfig::default())
    }
}
