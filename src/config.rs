use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::direction::DirectionStrategy;
use crate::error::{SlideError, SlideResult};
use crate::history::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_KEY};
use crate::style::{AnimationKind, TimingCurve};
use crate::transition::Timing;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub transition: TransitionConfig,
    pub history: HistoryConfig,
    pub direction: DirectionConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransitionConfig {
    pub animation: AnimationKind,
    pub duration_ms: u64,
    pub timing: TimingCurve,
    pub destroy_on_exit: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            animation: AnimationKind::Slide,
            duration_ms: 200,
            timing: TimingCurve::Ease,
            destroy_on_exit: true,
        }
    }
}

impl TransitionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn timing(&self) -> Timing {
        Timing {
            duration: self.duration(),
            curve: self.timing,
            destroy_on_exit: self.destroy_on_exit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    pub key: String,
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_HISTORY_KEY.to_string(),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DirectionConfig {
    pub strategy: DirectionStrategy,
    /// Declared conceptual order; when present it replaces `strategy`.
    pub view_order: Option<Vec<String>>,
}

impl Config {
    pub fn load() -> SlideResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(SlideError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            SlideError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        Self::from_toml(&raw).map_err(|err| match err {
            SlideError::InvalidArgument(message) => SlideError::invalid_argument(format!(
                "failed to parse config {}: {message}",
                path.display()
            )),
            other => other,
        })
    }

    pub fn from_toml(raw: &str) -> SlideResult<Self> {
        let parsed = toml::from_str::<Self>(raw)
            .map_err(|source| SlideError::invalid_argument(source.to_string()))?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.history.capacity = self.history.capacity.max(1);
        if self.history.key.trim().is_empty() {
            self.history.key = HistoryConfig::default().key;
        }
        if self
            .direction
            .view_order
            .as_ref()
            .is_some_and(|order| order.is_empty())
        {
            self.direction.view_order = None;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("SLIDE_ROUTES_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("slide-routes").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("slide-routes")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("slide-routes").join("config.toml"));
    }
    None
}
