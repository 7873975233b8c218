//! Layer z-index management for tmnl.
//!
//! Visual layers are registered with a [`LayerManager`], which keeps them
//! in insertion order and answers stacking queries sorted by z-index.
//! Each layer carries a small interaction state machine
//! (hidden / visible / locked) and an optional callback run after it is
//! brought to the front or sent to the back.
//!
//! ```rust,ignore
//! use tmnl_layers::{LayerConfig, LayerSystem};
//!
//! let system = LayerSystem::default();
//! let layer = system.spawn_layer(&LayerConfig::new("canvas", 10), None)?;
//! system.manager().bring_to_front(layer.id()).await;
//! ```

pub mod error;
pub mod factory;
pub mod id_gen;
pub mod layer;
pub mod machine;
pub mod manager;
pub mod resort;
pub mod static_ui;
pub mod store;
pub mod system;
pub mod types;
pub mod wrapper;

pub use error::{Bound, LayerError, Result, ValidationError};
pub use factory::{validate_config, LayerFactory, DEFAULT_OPACITY};
pub use id_gen::{CustomIdFn, IdGenerator, TOKEN_LENGTH};
pub use layer::{LayerRecord, LayerSnapshot};
pub use machine::{LayerEvent, LayerMachine, LayerState, MachineStatus};
pub use manager::{LayerList, LayerManager, ManagerPolicy};
pub use resort::{resort_hook, resort_hook_sync, ResortDispatch, ResortFuture, ResortHook};
pub use static_ui::{StaticUiLayerConfig, StaticUiRole};
pub use store::{
    visual_hash, Derived, LayerHandle, LayerOps, LayerStore, Observable, SortedLayers,
    Subscription,
};
pub use system::LayerSystem;
pub use types::*;
pub use wrapper::{
    with_layering, Layered, MountedLayer, PointerStyle, PositionStyle, Presentation,
};

pub use tmnl_common_config::{IdStrategy, LayerSystemConfig};
