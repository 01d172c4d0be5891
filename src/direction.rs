use serde::Deserialize;

use crate::route::Position;

/// Semantic animation direction of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Forward,
    Back,
    /// Initial value, and the result for equally ranked views.
    #[default]
    Undirected,
}

impl Direction {
    /// Class prefix consumed by the transition-class convention (`forward-enter`, ...).
    pub fn id(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Back => "back",
            Self::Undirected => "undirected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "forward" => Some(Self::Forward),
            "back" => Some(Self::Back),
            "undirected" => Some(Self::Undirected),
            _ => None,
        }
    }
}

/// Where positions fed to [`resolve`] come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DirectionStrategy {
    /// Rank in the route registry (or an explicit view order).
    #[default]
    RouteOrder,
    /// Index in the persisted visit stack.
    History,
}

/// Signed comparison of two positions. `prev` is `None` only for the first
/// navigation of a scope.
pub fn resolve(prev: Option<Position>, next: Position) -> Direction {
    let Some(prev) = prev else {
        return Direction::Undirected;
    };

    match next.cmp(&prev) {
        std::cmp::Ordering::Greater => Direction::Forward,
        std::cmp::Ordering::Less => Direction::Back,
        std::cmp::Ordering::Equal => Direction::Undirected,
    }
}
