pub mod config;
pub mod direction;
pub mod error;
pub mod history;
pub mod logging;
pub mod route;
pub mod scope;
pub mod style;
pub mod transition;

pub use scope::{RenderState, SCOPE_CLASS, SlideRoutes};
