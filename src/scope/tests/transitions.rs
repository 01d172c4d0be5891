use std::time::Duration;

use super::{order_config, scope};
use crate::direction::Direction;
use crate::history::MemorySessionStorage;
use crate::transition::{Phase, TimingProps, TransitionToken, ViewRole};

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[test]
fn single_view_definition_never_gets_direction_classes() {
    let storage = MemorySessionStorage::new();
    let mut routes = scope(&order_config(), &["/:page"], &storage);

    for path in ["/a", "/b", "/c", "/a"] {
        let state = routes.render(path).expect("render");
        assert_eq!(state.phase, Phase::Steady);
        assert_eq!(state.views.len(), 1);
        assert!(state.views[0].classes.is_empty());
        assert_eq!(state.transition_key, TransitionToken::new("/:page"));
    }
}

#[test]
fn retained_views_stay_mounted_without_destroy() {
    let storage = MemorySessionStorage::new();
    let mut routes = scope(&order_config(), &["/", "/a", "/b"], &storage);

    routes.render("/").expect("render");
    routes.render("/a").expect("render");
    let state = routes.render("/b").expect("render");

    assert_eq!(state.timing_props, TimingProps::NoopEndListener);
    assert_eq!(state.views.len(), 3);
    assert!(
        state.views[1..]
            .iter()
            .all(|view| view.role == ViewRole::Retained)
    );
    assert!(routes.poll().is_empty());
    assert_eq!(
        state.container_classes,
        vec!["slide-routes".to_string(), "slide".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn destroyed_view_disappears_after_duration() {
    let storage = MemorySessionStorage::new();
    let mut config = order_config();
    config.transition.destroy_on_exit = true;
    config.transition.duration_ms = 300;
    let mut routes = scope(&config, &["/", "/a"], &storage);

    routes.render("/").expect("render");
    let state = routes.render("/a").expect("render");
    assert_eq!(
        state.timing_props,
        TimingProps::Timeout(Duration::from_millis(300))
    );
    assert_eq!(state.phase, Phase::Transitioning);
    assert_eq!(state.views[0].classes, vec!["forward-enter", "forward-enter-active"]);
    assert_eq!(state.views[1].classes, vec!["forward-exit", "forward-exit-active"]);

    tokio::time::sleep(Duration::from_millis(150)).await;
    settle().await;
    assert!(routes.poll().is_empty());

    tokio::time::sleep(Duration::from_millis(150)).await;
    settle().await;
    assert_eq!(routes.poll(), vec![TransitionToken::new("/")]);

    let state = routes.state().expect("mounted");
    assert_eq!(state.phase, Phase::Steady);
    assert_eq!(state.views.len(), 1);
    assert!(state.views[0].classes.is_empty());
}

#[tokio::test(start_paused = true)]
async fn rapid_navigation_keeps_earlier_exit_direction() {
    let storage = MemorySessionStorage::new();
    let mut config = order_config();
    config.transition.destroy_on_exit = true;
    let mut routes = scope(&config, &["/", "/a", "/b"], &storage);

    routes.render("/a").expect("render");
    routes.render("/b").expect("render");
    tokio::time::sleep(Duration::from_millis(50)).await;
    let state = routes.render("/").expect("render");
    assert_eq!(state.direction, Direction::Back);

    let a = state
        .views
        .iter()
        .find(|view| view.token == TransitionToken::new("/a"))
        .expect("/a still exiting");
    assert_eq!(a.direction, Direction::Forward);
    assert_eq!(a.classes, vec!["forward-exit", "forward-exit-active"]);

    assert_eq!(routes.next_exit().await, Some(TransitionToken::new("/a")));
    assert_eq!(routes.next_exit().await, Some(TransitionToken::new("/b")));
    assert_eq!(routes.next_exit().await, None);
    assert_eq!(routes.state().expect("mounted").views.len(), 1);
}

#[test]
fn stylesheet_follows_current_direction() {
    let storage = MemorySessionStorage::new();
    let mut routes = scope(&order_config(), &["/", "/a"], &storage);

    routes.render("/a").expect("render");
    assert!(routes.stylesheet().forward.transition.is_none());
    assert!(routes.stylesheet().back.transition.is_none());

    routes.render("/").expect("render");
    let sheet = routes.stylesheet();
    assert_eq!(sheet.active, Direction::Back);
    assert_eq!(sheet.back.transition.as_deref(), Some("transform 200ms ease"));
    assert!(sheet.forward.transition.is_none());
}

#[test]
fn scope_started_outside_a_runtime_can_be_dropped_inside_one() {
    let storage = MemorySessionStorage::new();
    let mut config = order_config();
    config.transition.destroy_on_exit = true;
    config.transition.duration_ms = 10;

    let mut waited = scope(&config, &["/", "/a"], &storage);
    waited.render("/").expect("render");
    waited.render("/a").expect("render");
    let mut torn_down = scope(&config, &["/", "/a"], &storage);
    torn_down.render("/").expect("render");
    torn_down.render("/a").expect("render");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("test runtime");
    runtime.block_on(async move {
        assert_eq!(waited.next_exit().await, Some(TransitionToken::new("/")));
        drop(waited);
        torn_down.teardown();
    });
}
