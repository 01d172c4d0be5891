use crate::error::{SlideError, SlideResult};

use super::Position;
use super::pattern::{RouteParams, RoutePattern};
use super::registry::RouteRegistry;

/// Outcome of resolving one identifier against a [`RouteOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Rank used for direction: explicit-order index, or registry position.
    pub position: Position,
    /// Position of the matched definition in the registry.
    pub route_position: Position,
    pub key: String,
    pub params: RouteParams,
    pub redirect: Option<String>,
    pub rendered: Option<String>,
}

/// Registry plus the ordering mode used to rank its views.
#[derive(Debug, Clone, Default)]
pub struct RouteOrder {
    registry: RouteRegistry,
    explicit: Option<Vec<RoutePattern>>,
}

impl RouteOrder {
    pub fn implicit(registry: RouteRegistry) -> Self {
        Self {
            registry,
            explicit: None,
        }
    }

    pub fn explicit<I, S>(registry: RouteRegistry, order: I) -> SlideResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = order
            .into_iter()
            .map(|entry| RoutePattern::parse(entry.as_ref()))
            .collect::<SlideResult<Vec<_>>>()?;
        Ok(Self {
            registry,
            explicit: Some(entries),
        })
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit.is_some()
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn resolve_position(&self, view_id: &str) -> SlideResult<Position> {
        self.resolve(view_id).map(|resolution| resolution.position)
    }

    pub fn resolve(&self, view_id: &str) -> SlideResult<Resolution> {
        let matched = self.registry.match_path(view_id)?;
        let position = match &self.explicit {
            Some(entries) => entries
                .iter()
                .position(|entry| entry.matches(view_id).is_some())
                .ok_or_else(|| SlideError::no_match(view_id, "view order"))?,
            None => matched.position,
        };

        Ok(Resolution {
            position,
            route_position: matched.position,
            key: matched.key(),
            redirect: matched.route.redirect_target().map(str::to_string),
            rendered: matched.render(),
            params: matched.params,
        })
    }
}
