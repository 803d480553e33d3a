//! Headless swipe pager: gesture samples in, page positions and per-page
//! styles out. Hosts own rendering and feed [`Pager::frame`] once per frame.

pub mod animation;
pub mod config;
pub mod context;
pub mod error;
pub mod indicators;
pub mod input;
pub mod interpolate;
pub mod pager;

pub use config::{Axis, ClampBounds, Config, PagerConfig};
pub use context::{FocusWatcher, PagerProvider, PagerReader, PagerSnapshot, Scope};
pub use error::{Error, Result};
pub use input::{GestureSample, GestureState};
pub use interpolate::{Interpolation, PageInterpolation, Style, StyleValue};
pub use pager::{Frame, PageFrame, Pager, Phase};
