//! Gesture-to-index state machine.
//!
//! The pager turns drag samples into one continuous position, decides on
//! release which page to land on, and springs there. Hosts call
//! [`Pager::frame`] once per display frame and lay pages out from
//! [`Pager::pages`].

pub mod window;

use std::fmt;

use crate::animation::{SnapAnimation, SnapStatus};
use crate::config::{ClampBounds, Config, PagerConfig};
use crate::context::{shortest_offset, wrap_position, PagerProvider, PagerReader, PagerSnapshot};
use crate::input::{DragMapper, GestureSample};
use crate::interpolate::{interpolate_with_config, PageInterpolation, Style, Z_INDEX};

pub use window::visible_pages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No container size yet; nothing is rendered and drags are ignored.
    AwaitingLayout,
    Resting,
    Dragging,
    Settling,
}

/// What happened during one call to [`Pager::frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: f32,
    pub active_index: usize,
    pub next_index: usize,
    pub phase: Phase,
    /// Index committed by a release on this frame that crossed the threshold,
    /// even when bounds bring it back to the previous index.
    pub changed: Option<usize>,
    /// Index the spring came to rest on during this frame.
    pub settled: Option<usize>,
}

/// Layout and style for one materialized page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFrame {
    pub index: usize,
    /// Pages between this page and the current position.
    pub offset: f32,
    /// Page origin along the axis inside the pager container, in pixels.
    pub translation: f32,
    pub z_index: f32,
    pub style: Style,
}

type ChangeCallback = Box<dyn FnMut(usize) + Send>;

pub struct Pager {
    options: PagerConfig,
    clamp: ClampBounds,
    interpolation: Option<PageInterpolation>,
    mapper: DragMapper,
    snap: SnapAnimation,
    provider: PagerProvider,
    page_count: usize,
    layout: Option<(f32, f32)>,
    gesture: GestureSample,
    swiping: bool,
    drag_start: f32,
    /// Unwrapped position. May leave `[0, page_count)` while looping until
    /// the next settle re-anchors it.
    position: f32,
    /// Unwrapped index the pager is resting on or springing toward.
    target: f32,
    active: usize,
    next: usize,
    settling: bool,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for Pager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("page_count", &self.page_count)
            .field("position", &self.position)
            .field("target", &self.target)
            .field("active", &self.active)
            .field("next", &self.next)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl Pager {
    pub fn new(config: &Config, page_count: usize) -> Self {
        let provider = PagerProvider::new(config.pager.initial_index);
        Self::with_provider(config, page_count, provider)
    }

    /// Drive an existing provider, starting from its active index. The pager
    /// becomes the provider's only writer.
    pub fn with_provider(config: &Config, page_count: usize, provider: PagerProvider) -> Self {
        let initial = provider.snapshot().active_index;
        let mut pager = Self {
            options: config.pager.clone(),
            clamp: config.clamp,
            interpolation: config.interpolation.clone(),
            mapper: DragMapper::new(config.pager.axis, config.clamp_drag),
            snap: SnapAnimation::new(config.spring),
            provider,
            page_count,
            layout: None,
            gesture: GestureSample::default(),
            swiping: false,
            drag_start: 0.0,
            position: 0.0,
            target: 0.0,
            active: 0,
            next: 0,
            settling: false,
            on_change: None,
        };
        pager.place(initial);
        pager.publish();
        pager
    }

    /// Register the callback fired once per release that crosses the
    /// threshold, with the resolved index.
    pub fn on_change(&mut self, callback: impl FnMut(usize) + Send + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn reader(&self) -> PagerReader {
        self.provider.reader()
    }

    /// Swap in new options without resetting position or index.
    pub fn apply_config(&mut self, config: &Config) {
        self.options = config.pager.clone();
        self.clamp = config.clamp;
        self.interpolation = config.interpolation.clone();
        self.mapper = DragMapper::new(config.pager.axis, config.clamp_drag);
        self.snap.set_config(config.spring);
        if !self.swiping {
            let resolved = self.resolve_target(self.target);
            if resolved != self.target {
                self.retarget(resolved);
            }
        }
        self.publish();
    }

    /// Container size as measured by the host.
    pub fn set_layout(&mut self, width: f32, height: f32) {
        let first = self.layout.is_none();
        self.layout = Some((width, height));
        if first && self.dimension().is_some() {
            log::debug!("pager laid out at {}x{}", width, height);
        }
    }

    pub fn set_page_count(&mut self, page_count: usize) {
        if page_count == self.page_count {
            return;
        }
        self.page_count = page_count;
        if page_count == 0 {
            self.place(0);
            return;
        }
        let resolved = self.resolve_target(self.target);
        let out_of_range = self.options.looping && self.active >= page_count;
        if resolved != self.target || out_of_range {
            if self.swiping {
                self.target = resolved;
            } else {
                let index = self.wrap_index(resolved);
                self.place(index);
            }
        }
        self.publish();
    }

    /// Advance one frame: apply the gesture sample, make the release decision
    /// if the gesture just ended, then step the spring.
    pub fn frame(&mut self, sample: Option<GestureSample>, dt: f32) -> Frame {
        if let Some(sample) = sample {
            self.gesture = sample;
        }
        let mut changed = None;
        let mut settled = None;

        if self.gesture.state.is_active() {
            if let Some(dimension) = self.dimension() {
                self.snap.stop();
                if !self.swiping {
                    self.drag_start = self.position;
                    self.swiping = true;
                    self.settling = false;
                }
                if let Some(delta) = self.mapper.delta(&self.gesture, dimension) {
                    self.position = self.drag_start - delta;
                }
            }
        } else {
            if self.swiping {
                self.swiping = false;
                changed = self.release();
            }
            match self.snap.step(dt) {
                SnapStatus::Running => self.position = self.snap.position(),
                SnapStatus::Settled => settled = self.finish_settle(),
                SnapStatus::Idle => {}
            }
        }

        log::trace!("pager position {:.4} target {}", self.position, self.target);
        self.publish();
        Frame {
            position: self.position(),
            active_index: self.active,
            next_index: self.next,
            phase: self.phase(),
            changed,
            settled,
        }
    }

    /// Animate to `index`. Refused while a drag is in progress. Does not fire
    /// the change callback.
    pub fn scroll_to(&mut self, index: usize) -> bool {
        if self.swiping || self.page_count == 0 {
            return false;
        }
        let wanted = if self.options.looping {
            let index = (index % self.page_count) as f32;
            self.position + shortest_offset(index - self.position, self.page_count)
        } else {
            index as f32
        };
        let target = self.resolve_target(wanted.round());
        self.retarget(target);
        self.publish();
        true
    }

    /// Move to `index` without animating. Refused while a drag is in progress.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if self.swiping {
            return false;
        }
        self.place(index);
        self.publish();
        true
    }

    pub fn phase(&self) -> Phase {
        if self.dimension().is_none() {
            Phase::AwaitingLayout
        } else if self.swiping {
            Phase::Dragging
        } else if self.settling {
            Phase::Settling
        } else {
            Phase::Resting
        }
    }

    /// Current position, normalized into `[0, page_count)` when looping.
    pub fn position(&self) -> f32 {
        if self.options.looping {
            wrap_position(self.position, self.page_count)
        } else {
            self.position
        }
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn next_index(&self) -> usize {
        self.next
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Page size in pixels along the pager axis, once measured.
    pub fn dimension(&self) -> Option<f32> {
        let (width, height) = self.layout?;
        let dimension = self.options.axis.dimension(width, height);
        (dimension > f32::EPSILON).then_some(dimension)
    }

    /// Translation applied to the container holding every page, in pixels.
    pub fn container_translation(&self) -> f32 {
        match self.dimension() {
            Some(dimension) => -self.position * dimension * self.options.page_size,
            None => 0.0,
        }
    }

    /// Pages to materialize this frame, in render order.
    pub fn visible_indices(&self) -> Vec<usize> {
        if self.dimension().is_none() {
            return Vec::new();
        }
        visible_pages(self.page_count, self.active, self.options.adjacent_offset, self.options.looping)
    }

    pub fn page_offset(&self, index: usize) -> f32 {
        let raw = index as f32 - self.position;
        if self.options.looping {
            shortest_offset(raw, self.page_count)
        } else {
            raw
        }
    }

    pub fn pages(&self) -> Vec<PageFrame> {
        let Some(dimension) = self.dimension() else {
            return Vec::new();
        };
        let (clamp_prev, clamp_next) = self.clamp.resolve(self.page_count as f32);
        let lowest = (self.position - clamp_prev) * dimension;
        let highest = (self.position + clamp_next) * dimension;

        self.visible_indices()
            .into_iter()
            .map(|index| {
                let offset = self.page_offset(index);
                let translation = ((self.position + offset) * dimension).max(lowest).min(highest);
                let mut style = match &self.interpolation {
                    Some(config) => interpolate_with_config(offset, config),
                    None => Style::new(),
                };
                let z_index = style
                    .remove(Z_INDEX)
                    .and_then(|v| v.as_number())
                    .unwrap_or(0.0);
                PageFrame { index, offset, translation, z_index, style }
            })
            .collect()
    }

    fn release(&mut self) -> Option<usize> {
        if self.page_count == 0 {
            return None;
        }
        let previous = self.active;
        let change = self.target - self.position;
        let abs_change = change.abs();

        let crossed = abs_change > self.options.threshold;
        let mut wanted = self.target;
        if crossed {
            let steps = abs_change.ceil();
            wanted = if change > 0.0 { self.target - steps } else { self.target + steps };
        }
        let target = self.resolve_target(wanted);
        let next = self.wrap_index(target);

        self.target = target;
        self.next = next;
        self.active = next;
        self.settling = true;
        self.snap.start(self.position, target);

        log::debug!(
            "released at {:.3} (change {:.3}): page {} -> {}",
            self.position,
            change,
            previous,
            next
        );

        if !crossed {
            return None;
        }
        if let Some(callback) = self.on_change.as_mut() {
            callback(next);
        }
        Some(next)
    }

    /// Commit the settle the spring just reported. A second call for the same
    /// settle is a no-op.
    fn finish_settle(&mut self) -> Option<usize> {
        if !self.settling {
            return None;
        }
        self.settling = false;
        self.position = self.target;
        if self.options.looping {
            self.position = wrap_position(self.position, self.page_count);
            self.target = self.position;
        }
        self.active = self.next;
        log::debug!("settled on page {}", self.active);
        Some(self.active)
    }

    fn retarget(&mut self, target: f32) {
        let next = self.wrap_index(target);
        self.target = target;
        self.next = next;
        self.active = next;
        self.settling = true;
        self.snap.retarget(self.position, target);
    }

    /// Rest on `index` immediately.
    fn place(&mut self, index: usize) {
        let index = if self.options.looping && self.page_count > 0 {
            index % self.page_count
        } else {
            index
        };
        let target = self.resolve_target(index as f32);
        let next = self.wrap_index(target);
        self.snap.stop();
        self.settling = false;
        self.position = next as f32;
        self.target = next as f32;
        self.active = next;
        self.next = next;
    }

    /// Apply index bounds when they are in effect. `max` then `min`, so an
    /// inverted pair resolves to `max_index`.
    fn resolve_target(&self, target: f32) -> f32 {
        match self.options.index_bounds(self.page_count) {
            Some((min, max)) => target.max(min as f32).min(max as f32),
            None => target,
        }
    }

    fn wrap_index(&self, target: f32) -> usize {
        if self.options.looping && self.page_count > 0 {
            (target.round() as i64).rem_euclid(self.page_count as i64) as usize
        } else {
            target.round().max(0.0) as usize
        }
    }

    fn publish(&self) {
        self.provider.publish(PagerSnapshot {
            position: self.position(),
            active_index: self.active,
            next_index: self.next,
            page_count: self.page_count,
            looping: self.options.looping,
        });
    }
}
