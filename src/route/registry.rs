use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{SlideError, SlideResult};

use super::Position;
use super::pattern::{RouteParams, RoutePattern};

pub type ViewRender = Arc<dyn Fn(&RouteParams) -> String + Send + Sync>;
pub type RouteComparator = Arc<dyn Fn(&RouteDef, &RouteDef) -> Ordering + Send + Sync>;

/// A declared view: either something that renders, or a redirect to another path.
#[derive(Clone)]
pub enum View {
    Concrete { pattern: String, render: ViewRender },
    Redirect { pattern: String, to: String },
}

impl View {
    pub fn concrete<F>(pattern: impl Into<String>, render: F) -> Self
    where
        F: Fn(&RouteParams) -> String + Send + Sync + 'static,
    {
        Self::Concrete {
            pattern: pattern.into(),
            render: Arc::new(render),
        }
    }

    pub fn redirect(pattern: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Redirect {
            pattern: pattern.into(),
            to: to.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Self::Concrete { pattern, .. } | Self::Redirect { pattern, .. } => pattern,
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete { pattern, .. } => {
                f.debug_struct("Concrete").field("pattern", pattern).finish()
            }
            Self::Redirect { pattern, to } => f
                .debug_struct("Redirect")
                .field("pattern", pattern)
                .field("to", to)
                .finish(),
        }
    }
}

#[derive(Clone)]
pub enum RouteTarget {
    Render(ViewRender),
    Redirect(String),
}

/// A registered view with its parsed pattern and declaration index.
#[derive(Clone)]
pub struct RouteDef {
    declared: Position,
    pattern: RoutePattern,
    target: RouteTarget,
}

impl RouteDef {
    /// Index among the views as they were declared, before any comparator sort.
    pub fn declared(&self) -> Position {
        self.declared
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match &self.target {
            RouteTarget::Redirect(to) => Some(to),
            RouteTarget::Render(_) => None,
        }
    }
}

impl fmt::Debug for RouteDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDef")
            .field("declared", &self.declared)
            .field("pattern", &self.pattern.as_str())
            .field("redirect", &self.redirect_target())
            .finish()
    }
}

#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub position: Position,
    pub route: &'a RouteDef,
    pub params: RouteParams,
}

impl RouteMatch<'_> {
    /// Key identifying the transition of this match: the pattern text, or the
    /// position for routes without one.
    pub fn key(&self) -> String {
        if self.route.pattern.is_index() {
            format!("#{}", self.position)
        } else {
            self.route.pattern.as_str().to_string()
        }
    }

    pub fn render(&self) -> Option<String> {
        match &self.route.target {
            RouteTarget::Render(render) => Some(render(&self.params)),
            RouteTarget::Redirect(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: Vec<RouteDef>,
}

#[derive(Default)]
pub struct RouteRegistryBuilder {
    views: Vec<View>,
    compare: Option<RouteComparator>,
}

impl RouteRegistryBuilder {
    pub fn view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    pub fn views(mut self, views: impl IntoIterator<Item = View>) -> Self {
        self.views.extend(views);
        self
    }

    /// Re-orders the definitions before positions are assigned.
    pub fn compare<F>(mut self, compare: F) -> Self
    where
        F: Fn(&RouteDef, &RouteDef) -> Ordering + Send + Sync + 'static,
    {
        self.compare = Some(Arc::new(compare));
        self
    }

    pub fn build(self) -> SlideResult<RouteRegistry> {
        let mut routes = Vec::with_capacity(self.views.len());
        for (declared, view) in self.views.into_iter().enumerate() {
            let (pattern, target) = match view {
                View::Concrete { pattern, render } => (pattern, RouteTarget::Render(render)),
                View::Redirect { pattern, to } => (pattern, RouteTarget::Redirect(to)),
            };
            routes.push(RouteDef {
                declared,
                pattern: RoutePattern::parse(&pattern)?,
                target,
            });
        }

        if let Some(compare) = self.compare {
            routes.sort_by(|a, b| compare(a, b));
        }
        Ok(RouteRegistry { routes })
    }
}

impl RouteRegistry {
    pub fn builder() -> RouteRegistryBuilder {
        RouteRegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// Best-ranked definition matching `path`; ties go to the lower position.
    pub fn match_path(&self, path: &str) -> SlideResult<RouteMatch<'_>> {
        let mut best: Option<RouteMatch<'_>> = None;
        for (position, route) in self.routes.iter().enumerate() {
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };
            let better = best
                .as_ref()
                .is_none_or(|current| route.pattern.score() > current.route.pattern.score());
            if better {
                best = Some(RouteMatch {
                    position,
                    route,
                    params,
                });
            }
        }

        best.ok_or_else(|| SlideError::no_match(path, "registered views"))
    }
}
