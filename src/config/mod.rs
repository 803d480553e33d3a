use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::animation::SpringConfig;
use crate::error::{Error, Result};
use crate::interpolate::PageInterpolation;

const DEFAULT_CONFIG: &str = include_str!("../../assets/default_config.toml");

/// Drag bound used when a clamp side is left unset.
pub const UNBOUNDED_DRAG: f32 = 1.0e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// Size of a page along this axis for a container of `width` x `height`.
    pub fn dimension(self, width: f32, height: f32) -> f32 {
        match self {
            Axis::Horizontal => width,
            Axis::Vertical => height,
        }
    }

    /// Component of a 2D translation that lies along this axis.
    pub fn component(self, x: f32, y: f32) -> f32 {
        match self {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }
}

/// Asymmetric bound pair, in pages. `prev` limits movement toward lower
/// indices, `next` toward higher ones. Unset sides fall back to a
/// context-specific default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClampBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<f32>,
}

impl ClampBounds {
    pub fn new(prev: f32, next: f32) -> Self {
        Self { prev: Some(prev), next: Some(next) }
    }

    pub fn resolve(&self, fallback: f32) -> (f32, f32) {
        (self.prev.unwrap_or(fallback), self.next.unwrap_or(fallback))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerConfig {
    #[serde(default)]
    pub axis: Axis,
    /// Fraction of the container one page occupies along the axis.
    #[serde(default = "default_page_size")]
    pub page_size: f32,
    /// Fraction of a page a drag must cross before the index changes.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_index: Option<usize>,
    /// Pages kept materialized on each side of the active one.
    #[serde(default = "default_adjacent_offset")]
    pub adjacent_offset: usize,
    /// Wrap around from the last page to the first instead of stopping.
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub initial_index: usize,
}

fn default_page_size() -> f32 { 1.0 }
fn default_threshold() -> f32 { 0.1 }
fn default_adjacent_offset() -> usize { 10 }

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            axis: Axis::default(),
            page_size: default_page_size(),
            threshold: default_threshold(),
            min_index: None,
            max_index: None,
            adjacent_offset: default_adjacent_offset(),
            looping: false,
            initial_index: 0,
        }
    }
}

impl PagerConfig {
    /// Index bounds in effect for `page_count` pages. Bounded pagers default to
    /// `[0, ceil((page_count - 1) / page_size)]`; looping pagers only clamp when
    /// a bound was set explicitly.
    pub fn index_bounds(&self, page_count: usize) -> Option<(usize, usize)> {
        if self.looping && self.min_index.is_none() && self.max_index.is_none() {
            return None;
        }
        let page_size = if self.page_size > f32::EPSILON { self.page_size } else { 1.0 };
        let last = page_count.saturating_sub(1) as f32;
        let default_max = (last / page_size).ceil() as usize;
        Some((self.min_index.unwrap_or(0), self.max_index.unwrap_or(default_max)))
    }
}

/// Settings for the bundled demo window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    pub page_count: usize,
    pub target_fps: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { width: 480, height: 320, page_count: 8, target_fps: 120 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pager: PagerConfig,
    #[serde(default)]
    pub spring: SpringConfig,
    /// How far pages may translate past the focused position, in pages.
    #[serde(default)]
    pub clamp: ClampBounds,
    /// How far a single drag may move the pager, in pages.
    #[serde(default)]
    pub clamp_drag: ClampBounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<PageInterpolation>,
    #[serde(default)]
    pub demo: DemoConfig,
}

impl Config {
    pub fn config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("~/.config"));
        base.join("swipe_pager").join("config.toml")
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(Error::from)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Configuration bundled with the crate.
    pub fn bundled() -> Self {
        Self::parse(DEFAULT_CONFIG).unwrap_or_default()
    }

    pub fn load_or_default() -> Self {
        let path = Self::config_path();
        if path.exists() {
            match Self::load_from(&path) {
                Ok(cfg) => return cfg,
                Err(e) => log::warn!("{e}; using bundled defaults"),
            }
        } else {
            // Write default config
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(&path, DEFAULT_CONFIG);
        }
        Self::bundled()
    }
}
