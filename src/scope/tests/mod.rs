mod transitions;

use std::sync::Arc;

use crate::config::Config;
use crate::direction::DirectionStrategy;
use crate::history::MemorySessionStorage;
use crate::route::{RouteRegistry, View};

use super::SlideRoutes;

fn registry(patterns: &[&str]) -> RouteRegistry {
    RouteRegistry::builder()
        .views(patterns.iter().map(|pattern| {
            let name = pattern.to_string();
            View::concrete(*pattern, move |_| format!("<{name}>"))
        }))
        .build()
        .expect("registry should build")
}

fn history_config() -> Config {
    let mut config = Config::default();
    config.direction.strategy = DirectionStrategy::History;
    config.transition.destroy_on_exit = false;
    config
}

fn order_config() -> Config {
    let mut config = Config::default();
    config.transition.destroy_on_exit = false;
    config
}

fn scope(config: &Config, patterns: &[&str], storage: &MemorySessionStorage) -> SlideRoutes {
    SlideRoutes::new(config, registry(patterns), Arc::new(storage.clone()))
        .expect("scope should build")
}

fn stored_stack(storage: &MemorySessionStorage, config: &Config) -> Option<Vec<String>> {
    use crate::history::SessionStorage;

    storage
        .get(&config.history.key)
        .expect("storage read")
        .map(|raw| serde_json::from_str(&raw).expect("stored history is json"))
}
