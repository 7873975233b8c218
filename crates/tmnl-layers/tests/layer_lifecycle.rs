use std::sync::Arc;
use test_case::test_case;
use tokio::sync::Barrier;
use tmnl_layers::{
    Bound, LayerConfig, LayerId, LayerState, LayerSystem, PointerEvents, ValidationError,
};
use tmnl_test_utils::{assert_err, assert_ok, init_test_logging};

fn names(layers: &[tmnl_layers::LayerRecord]) -> Vec<String> {
    layers.iter().map(|l| l.name().to_string()).collect()
}

fn z_indices(layers: &[tmnl_layers::LayerRecord]) -> Vec<i32> {
    layers.iter().map(|l| l.z_index()).collect()
}

#[test]
fn test_insertion_order_and_index_order() {
    let system = LayerSystem::default();
    for (name, z) in [("first", 50), ("second", 10), ("third", 30)] {
        assert_ok!(system.spawn_layer(&LayerConfig::new(name, z), None));
    }

    let manager = system.manager();
    assert_eq!(z_indices(&manager.get_all_layers()), vec![50, 10, 30]);
    assert_eq!(z_indices(&manager.get_layer_index()), vec![10, 30, 50]);
}

#[test]
fn test_equal_z_keeps_insertion_order() {
    let system = LayerSystem::default();
    system.spawn_layer(&LayerConfig::new("A", 10), None).unwrap();
    system.spawn_layer(&LayerConfig::new("B", 20), None).unwrap();
    system.spawn_layer(&LayerConfig::new("C", 10), None).unwrap();

    assert_eq!(names(&system.manager().get_layer_index()), vec!["A", "C", "B"]);
}

#[tokio::test]
async fn test_bring_to_front_uses_current_max() {
    init_test_logging();
    let system = LayerSystem::default();
    let a = system.spawn_layer(&LayerConfig::new("a", 10), None).unwrap();
    system.spawn_layer(&LayerConfig::new("b", 20), None).unwrap();

    system.manager().bring_to_front(a.id()).await;

    assert_eq!(system.manager().get_layer(a.id()).unwrap().z_index(), 30);
    assert_eq!(names(&system.manager().get_layer_index()), vec!["b", "a"]);
}

#[tokio::test]
async fn test_send_to_back_uses_current_min() {
    let system = LayerSystem::default();
    system.spawn_layer(&LayerConfig::new("a", 10), None).unwrap();
    let b = system.spawn_layer(&LayerConfig::new("b", 20), None).unwrap();

    system.manager().send_to_back(b.id()).await;

    assert_eq!(system.manager().get_layer(b.id()).unwrap().z_index(), 0);
}

#[tokio::test]
async fn test_repeated_resorts_keep_climbing() {
    let system = LayerSystem::default();
    let a = system.spawn_layer(&LayerConfig::new("a", 0), None).unwrap();
    let b = system.spawn_layer(&LayerConfig::new("b", 5), None).unwrap();

    system.manager().bring_to_front(a.id()).await;
    system.manager().bring_to_front(b.id()).await;
    system.manager().bring_to_front(a.id()).await;

    assert_eq!(system.manager().get_layer(a.id()).unwrap().z_index(), 35);
    assert_eq!(system.manager().get_layer(b.id()).unwrap().z_index(), 25);
}

#[tokio::test]
async fn test_unknown_ids_change_nothing() {
    let system = LayerSystem::default();
    system.spawn_layer(&LayerConfig::new("a", 10), None).unwrap();
    let before = system.manager().get_layer_index();
    let missing = LayerId::from("does-not-exist");

    system.manager().bring_to_front(&missing).await;
    system.manager().send_to_back(&missing).await;
    system.manager().set_visible(&missing, false);
    system.manager().set_locked(&missing, true);
    system.manager().set_opacity(&missing, 0.0);
    system.manager().set_pointer_events(&missing, PointerEvents::None);
    assert!(system.manager().remove_layer(&missing).is_none());

    let after = system.manager().get_layer_index();
    assert_eq!(z_indices(&before), z_indices(&after));
    assert_eq!(after[0].opacity(), 1.0);
    assert!(after[0].visible());
}

#[test]
fn test_remove_twice() {
    let system = LayerSystem::default();
    let a = system.spawn_layer(&LayerConfig::new("a", 10), None).unwrap();
    system.spawn_layer(&LayerConfig::new("b", 20), None).unwrap();

    let removed = system.manager().remove_layer(a.id()).unwrap();
    assert_eq!(removed.name(), "a");
    assert!(system.manager().remove_layer(a.id()).is_none());
    assert_eq!(names(&system.manager().get_all_layers()), vec!["b"]);
}

#[test]
fn test_lock_round_trip_restores_visible() {
    let system = LayerSystem::default();
    let a = system.spawn_layer(&LayerConfig::new("a", 0), None).unwrap();

    system.manager().set_locked(a.id(), true);
    system.manager().set_locked(a.id(), false);

    let layer = system.manager().get_layer(a.id()).unwrap();
    assert!(!layer.locked());
    assert_eq!(layer.state(), LayerState::Visible);
}

#[test]
fn test_hide_while_locked() {
    let system = LayerSystem::default();
    let a = system.spawn_layer(&LayerConfig::new("a", 0), None).unwrap();

    system.manager().set_locked(a.id(), true);
    system.manager().set_visible(a.id(), false);
    assert_eq!(a.state(), LayerState::Hidden);

    // Unlocking a hidden layer is not a valid transition; the flag still moves.
    system.manager().set_locked(a.id(), false);
    let layer = system.manager().get_layer(a.id()).unwrap();
    assert!(!layer.locked());
    assert_eq!(layer.state(), LayerState::Hidden);
}

#[test_case(-0.5, 0.0 ; "below zero")]
#[test_case(1.5, 1.0 ; "above one")]
#[test_case(0.4, 0.4 ; "in range")]
fn test_opacity_clamp(input: f64, expected: f64) {
    let system = LayerSystem::default();
    let a = system.spawn_layer(&LayerConfig::new("a", 0), None).unwrap();

    system.manager().set_opacity(a.id(), input);

    assert_eq!(system.manager().get_layer(a.id()).unwrap().opacity(), expected);
}

#[test_case(-1000 ; "minimum")]
#[test_case(10000 ; "maximum")]
fn test_boundary_z_accepted(z: i32) {
    let system = LayerSystem::default();
    assert_ok!(system.spawn_layer(&LayerConfig::new("edge", z), None));
}

#[test_case(-1001, Bound::Lower ; "under minimum")]
#[test_case(10001, Bound::Upper ; "over maximum")]
fn test_boundary_z_rejected(z: i32, expected: Bound) {
    let system = LayerSystem::default();
    let err = assert_err!(system.spawn_layer(&LayerConfig::new("edge", z), None));
    assert!(matches!(
        err,
        ValidationError::ZIndexOutOfRange { bound, .. } if bound == expected
    ));
}

#[test_case(-0.1 ; "negative")]
#[test_case(1.1 ; "over one")]
fn test_boundary_opacity_rejected(opacity: f64) {
    let system = LayerSystem::default();
    let config = LayerConfig::new("a", 0).with_opacity(opacity);
    let err = assert_err!(system.spawn_layer(&config, None));
    assert_eq!(err, ValidationError::OpacityOutOfRange { value: opacity });
}

#[test]
fn test_boundary_opacity_accepted() {
    let system = LayerSystem::default();
    assert_ok!(system.spawn_layer(&LayerConfig::new("a", 0).with_opacity(0.0), None));
    assert_ok!(system.spawn_layer(&LayerConfig::new("b", 0).with_opacity(1.0), None));
}

#[test]
fn test_empty_name_rejected() {
    let system = LayerSystem::default();
    let err = assert_err!(system.spawn_layer(&LayerConfig::new("", 0), None));
    assert_eq!(err, ValidationError::EmptyName);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_updates_are_not_lost() {
    const LAYERS: i32 = 64;
    const ROUNDS: i32 = 20;

    let system = LayerSystem::default();
    let ids: Vec<_> = (0..LAYERS)
        .map(|i| {
            system
                .spawn_layer(&LayerConfig::new(format!("layer-{i}"), i), None)
                .unwrap()
                .id()
                .clone()
        })
        .collect();

    let start = Arc::new(Barrier::new(ids.len()));
    let mut tasks = Vec::new();
    for id in ids {
        let manager = system.manager().clone();
        let start = Arc::clone(&start);
        tasks.push(tokio::spawn(async move {
            start.wait().await;
            manager.set_opacity(&id, 0.5);
            for _ in 0..ROUNDS {
                manager.bring_to_front(&id).await;
                tokio::task::yield_now().await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let layers = system.manager().get_layer_index();
    assert_eq!(layers.len(), LAYERS as usize);
    assert!(layers.iter().all(|l| l.opacity() == 0.5));

    let mut z = z_indices(&layers);
    z.dedup();
    assert_eq!(z.len(), LAYERS as usize, "every resort must observe the previous one");

    // Each resort raises the maximum by exactly one gap.
    let top = layers.last().unwrap().z_index();
    assert_eq!(top, (LAYERS - 1) + LAYERS * ROUNDS * 10);
}
