use std::time::Duration;
use tmnl_layers::{
    with_layering, LayerConfig, LayerSystem, Observable, StaticUiLayerConfig, StaticUiRole,
};

const WAIT: Duration = Duration::from_secs(1);

#[tokio::test]
async fn test_views_follow_manager_changes() {
    let system = LayerSystem::default();
    let store = system.store();
    let layers = store.layers();
    let index = store.layer_index();
    let mut sub = index.subscribe();

    assert!(layers.get().is_empty());

    let a = system.spawn_layer(&LayerConfig::new("a", 30), None).unwrap();
    system.spawn_layer(&LayerConfig::new("b", 10), None).unwrap();

    let sorted = tokio::time::timeout(WAIT, sub.next()).await.unwrap().unwrap();
    assert_eq!(sorted.len(), 2);
    assert_eq!(sorted[0].name(), "b");

    store.ops().send_to_back(a.id()).await;
    let sorted = tokio::time::timeout(WAIT, sub.next()).await.unwrap().unwrap();
    assert_eq!(sorted[0].name(), "a");
    assert_eq!(sorted[0].z_index(), 0);
    assert_eq!(layers.get().len(), 2);
}

#[tokio::test]
async fn test_visual_hash_only_changes_with_stacking() {
    let system = LayerSystem::default();
    let store = system.store();
    let a = system.spawn_layer(&LayerConfig::new("a", 10), None).unwrap();
    let b = system.spawn_layer(&LayerConfig::new("b", 20), None).unwrap();

    let sorted = store.sorted();
    let before = sorted.get().visual_hash;
    assert_eq!(before, format!("{}:10|{}:20", a.id(), b.id()));

    store.ops().set_opacity(a.id(), 0.1);
    store.ops().set_locked(b.id(), true);
    assert_eq!(sorted.get().visual_hash, before);

    store.ops().bring_to_front(a.id()).await;
    assert_eq!(
        sorted.get().visual_hash,
        format!("{}:20|{}:30", b.id(), a.id())
    );
}

#[tokio::test]
async fn test_layer_view_tracks_removal() {
    let system = LayerSystem::default();
    let store = system.store();
    let a = system.spawn_layer(&LayerConfig::new("a", 10), None).unwrap();
    let view = store.layer(a.id());
    let mut sub = view.subscribe();

    assert!(sub.current().is_some());
    store.ops().remove_layer(a.id());

    let next = tokio::time::timeout(WAIT, sub.next()).await.unwrap().unwrap();
    assert!(next.is_none());
    assert!(view.get().is_none());
}

#[tokio::test]
async fn test_wrapped_component_lifecycle() {
    let system = LayerSystem::default();
    let toolbar = with_layering(
        "toolbar-widget",
        StaticUiLayerConfig::new(StaticUiRole::Toolbar).to_layer_config(),
    );
    let mut hash = system.store().visual_hash().subscribe();

    let mounted = toolbar.mount(&system).unwrap();
    let value = tokio::time::timeout(WAIT, hash.next_distinct()).await.unwrap().unwrap();
    assert_eq!(value, format!("{}:1200", mounted.id()));

    let presentation = mounted.presentation();
    assert_eq!(presentation.z_index, 1200);
    assert!(presentation.css().starts_with("position: fixed; inset: 0"));

    drop(mounted);
    let value = tokio::time::timeout(WAIT, hash.next_distinct()).await.unwrap().unwrap();
    assert!(value.is_empty());
}
