mod order;
mod pattern;
mod registry;

pub use order::{Resolution, RouteOrder};
pub use pattern::{RouteParams, RoutePattern, SPLAT_PARAM};
pub use registry::{
    RouteComparator, RouteDef, RouteMatch, RouteRegistry, RouteRegistryBuilder, RouteTarget, View,
    ViewRender,
};

/// Integer rank of a view within a declared or registered order.
pub type Position = usize;

/// Strips an already-resolved parent prefix so nested views resolve the same
/// way wherever they are mounted. `parent_base` of `/` leaves the path alone.
pub fn relative_path(parent_base: &str, pathname: &str) -> String {
    if parent_base.is_empty() || parent_base == "/" {
        return pathname.to_string();
    }

    let base = parent_base.trim_end_matches('/');
    let rest = match (pathname.get(..base.len()), pathname.get(base.len()..)) {
        (Some(head), Some(tail))
            if head.eq_ignore_ascii_case(base) && (tail.is_empty() || tail.starts_with('/')) =>
        {
            tail
        }
        _ => pathname,
    };
    if rest.is_empty() {
        "/".to_string()
    } else {
        rest.to_string()
    }
}
