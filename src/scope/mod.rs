use std::sync::Arc;

use crate::config::{Config, TransitionConfig};
use crate::direction::{self, Direction, DirectionStrategy};
use crate::error::{SlideError, SlideResult};
use crate::history::{HistoryStore, SessionStorage};
use crate::route::{Position, Resolution, RouteOrder, RouteRegistry};
use crate::style::{StyleSheet, style_rules};
use crate::transition::{
    MountedView, Phase, TimingProps, TransitionCoordinator, TransitionToken,
};

#[cfg(test)]
mod tests;

/// Class carried by every transition container.
pub const SCOPE_CLASS: &str = "slide-routes";

const MAX_REDIRECTS: usize = 8;

/// Everything the rendering layer needs after one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    /// Identifier actually displayed, after redirects.
    pub path: String,
    pub direction: Direction,
    pub transition_key: TransitionToken,
    pub timing_props: TimingProps,
    pub container_classes: Vec<String>,
    pub views: Vec<MountedView>,
    pub phase: Phase,
    pub rendered: Option<String>,
}

enum Tracking {
    RouteOrder,
    History(HistoryStore),
}

/// One mounted instance: resolves direction for each navigation and drives the
/// transition between the previous and the next view.
pub struct SlideRoutes {
    transition: TransitionConfig,
    order: RouteOrder,
    tracking: Tracking,
    coordinator: TransitionCoordinator,
    requested: Option<String>,
    previous: Option<(String, Position)>,
    direction: Direction,
    rendered: Option<String>,
}

impl SlideRoutes {
    /// Builds the scope from config; a configured `view_order` switches the
    /// registry to explicit ordering.
    pub fn new(
        config: &Config,
        registry: RouteRegistry,
        storage: Arc<dyn SessionStorage>,
    ) -> SlideResult<Self> {
        let order = match &config.direction.view_order {
            Some(view_order) => RouteOrder::explicit(registry, view_order)?,
            None => RouteOrder::implicit(registry),
        };
        Ok(Self::with_order(config, order, storage))
    }

    /// Explicit ordering always wins over stack tracking.
    pub fn with_order(config: &Config, order: RouteOrder, storage: Arc<dyn SessionStorage>) -> Self {
        let tracking = if order.is_explicit()
            || config.direction.strategy == DirectionStrategy::RouteOrder
        {
            Tracking::RouteOrder
        } else {
            Tracking::History(HistoryStore::with_capacity(
                storage,
                config.history.key.clone(),
                config.history.capacity,
            ))
        };

        Self {
            transition: config.transition.clone(),
            coordinator: TransitionCoordinator::new(config.transition.timing()),
            order,
            tracking,
            requested: None,
            previous: None,
            direction: Direction::Undirected,
            rendered: None,
        }
    }

    /// Renders `path`. Rendering the identifier already shown resolves nothing
    /// and writes nothing.
    pub fn render(&mut self, path: &str) -> SlideResult<RenderState> {
        if self.requested.as_deref() == Some(path) {
            return self.current_state();
        }

        let (target, resolution) = self.follow_redirects(path)?;
        if self
            .previous
            .as_ref()
            .is_some_and(|(previous, _)| *previous == target)
        {
            self.requested = Some(path.to_string());
            return self.current_state();
        }

        let (direction, step) = match (&self.tracking, &self.previous) {
            (Tracking::History(store), None) => {
                (Direction::Undirected, Some(store.landing(&target)))
            }
            (Tracking::History(store), Some((previous, _))) => {
                let step = store.step(Some(previous.as_str()), &target);
                (direction::resolve(step.previous, step.next), Some(step))
            }
            (Tracking::RouteOrder, previous) => (
                direction::resolve(previous.as_ref().map(|(_, pos)| *pos), resolution.position),
                None,
            ),
        };

        let token = TransitionToken::new(resolution.key.clone());
        self.coordinator.begin(token, direction)?;
        if let (Tracking::History(store), Some(step)) = (&self.tracking, &step) {
            store.commit(step);
        }
        tracing::debug!(
            from = self.previous.as_ref().map(|(previous, _)| previous.as_str()),
            to = %target,
            direction = direction.id(),
            key = %resolution.key,
            "navigation resolved"
        );

        self.requested = Some(path.to_string());
        self.direction = direction;
        self.rendered = resolution.rendered;
        self.previous = Some((target, resolution.position));
        self.current_state()
    }

    pub fn state(&self) -> Option<RenderState> {
        let (path, _) = self.previous.as_ref()?;
        let transition_key = self.coordinator.current_token()?.clone();
        Some(RenderState {
            path: path.clone(),
            direction: self.direction,
            transition_key,
            timing_props: self.coordinator.timing_props(),
            container_classes: self.container_classes(),
            views: self.coordinator.mounted(),
            phase: self.coordinator.phase(),
            rendered: self.rendered.clone(),
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn container_classes(&self) -> Vec<String> {
        vec![
            SCOPE_CLASS.to_string(),
            self.transition.animation.id().to_string(),
        ]
    }

    pub fn stylesheet(&self) -> StyleSheet {
        style_rules(
            self.transition.animation,
            self.transition.duration(),
            self.transition.timing,
            self.direction,
        )
    }

    pub fn order(&self) -> &RouteOrder {
        &self.order
    }

    pub fn history(&self) -> Option<&HistoryStore> {
        match &self.tracking {
            Tracking::History(store) => Some(store),
            Tracking::RouteOrder => None,
        }
    }

    /// Unmounts views whose exit duration elapsed.
    pub fn poll(&mut self) -> Vec<TransitionToken> {
        self.coordinator.poll_exits()
    }

    pub async fn next_exit(&mut self) -> Option<TransitionToken> {
        self.coordinator.next_exit().await
    }

    /// Ends the scope: cancels exit timers and drops the persisted history.
    pub fn teardown(mut self) {
        self.coordinator.teardown();
        if let Tracking::History(store) = &self.tracking
            && let Err(err) = store.clear()
        {
            tracing::warn!(key = store.key(), error = %err, "failed to clear history");
        }
        tracing::info!("slide routes scope torn down");
    }

    fn current_state(&self) -> SlideResult<RenderState> {
        self.state()
            .ok_or_else(|| SlideError::invalid_argument("scope has no mounted view"))
    }

    fn follow_redirects(&self, path: &str) -> SlideResult<(String, Resolution)> {
        let mut target = path.to_string();
        for _ in 0..=MAX_REDIRECTS {
            let resolution = self.order.resolve(&target)?;
            match &resolution.redirect {
                Some(to) => target = to.clone(),
                None => return Ok((target, resolution)),
            }
        }
        Err(SlideError::redirect_loop(path))
    }
}
