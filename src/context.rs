//! Shared pager state.
//!
//! A [`PagerProvider`] owns the position/index triple and is handed to the
//! [`Pager`](crate::pager::Pager) that drives it, which becomes its only
//! writer. Everything else (page content, indicators, other views that follow
//! the same index) holds a [`PagerReader`].

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::interpolate::{interpolate_with_config, PageInterpolation, Style};

/// Values a pager publishes once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagerSnapshot {
    /// Continuous position; normalized into `[0, page_count)` when looping.
    pub position: f32,
    pub active_index: usize,
    pub next_index: usize,
    pub page_count: usize,
    pub looping: bool,
}

impl PagerSnapshot {
    fn new(initial_index: usize) -> Self {
        Self {
            position: initial_index as f32,
            active_index: initial_index,
            next_index: initial_index,
            page_count: 0,
            looping: false,
        }
    }

    /// Signed distance of page `index` from the current position. When
    /// looping this is the shorter way round.
    pub fn offset(&self, index: usize) -> f32 {
        let raw = index as f32 - self.position;
        if self.looping {
            shortest_offset(raw, self.page_count)
        } else {
            raw
        }
    }
}

/// Wrap `delta` into `[-count / 2, count / 2]`.
pub fn shortest_offset(delta: f32, count: usize) -> f32 {
    if count == 0 {
        return delta;
    }
    let n = count as f32;
    let wrapped = delta.rem_euclid(n);
    if wrapped > n / 2.0 {
        wrapped - n
    } else {
        wrapped
    }
}

/// Wrap `position` into `[0, count)`. `rem_euclid` rounds tiny negative
/// inputs up to exactly `count`, which is folded back to 0.
pub fn wrap_position(position: f32, count: usize) -> f32 {
    if count == 0 {
        return position;
    }
    let n = count as f32;
    let wrapped = position.rem_euclid(n);
    if wrapped >= n {
        0.0
    } else {
        wrapped
    }
}

/// Owning, writable handle. Not `Clone`: there is exactly one writer.
#[derive(Debug)]
pub struct PagerProvider {
    state: Arc<RwLock<PagerSnapshot>>,
}

impl PagerProvider {
    pub fn new(initial_index: usize) -> Self {
        Self { state: Arc::new(RwLock::new(PagerSnapshot::new(initial_index))) }
    }

    pub fn reader(&self) -> PagerReader {
        PagerReader { state: Arc::clone(&self.state) }
    }

    pub fn snapshot(&self) -> PagerSnapshot {
        *self.state.read()
    }

    pub(crate) fn publish(&self, snapshot: PagerSnapshot) {
        *self.state.write() = snapshot;
    }
}

impl Default for PagerProvider {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Read-only view of a provider's state.
#[derive(Debug, Clone)]
pub struct PagerReader {
    state: Arc<RwLock<PagerSnapshot>>,
}

impl PagerReader {
    pub fn snapshot(&self) -> PagerSnapshot {
        *self.state.read()
    }

    pub fn position(&self) -> f32 {
        self.state.read().position
    }

    pub fn active_index(&self) -> usize {
        self.state.read().active_index
    }

    pub fn next_index(&self) -> usize {
        self.state.read().next_index
    }

    pub fn offset(&self, index: usize) -> f32 {
        self.state.read().offset(index)
    }

    pub fn is_focused(&self, index: usize) -> bool {
        self.state.read().active_index == index
    }

    pub fn interpolation(&self, index: usize, config: &PageInterpolation) -> Style {
        interpolate_with_config(self.offset(index), config)
    }
}

/// Context visible to one node of the host's view tree. Scopes nest by value:
/// a pager scope wraps the page scopes beneath it.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pager: Option<PagerReader>,
    index: Option<usize>,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn with_pager(&self, reader: PagerReader) -> Self {
        Self { pager: Some(reader), index: self.index }
    }

    pub fn with_index(&self, index: usize) -> Self {
        Self { pager: self.pager.clone(), index: Some(index) }
    }

    pub fn pager(&self) -> Result<&PagerReader> {
        self.pager.as_ref().ok_or(Error::MissingProvider)
    }

    pub fn index(&self) -> Result<usize> {
        self.index.ok_or(Error::MissingIndex)
    }

    /// Offset of this scope's page from the pager position.
    pub fn offset(&self) -> Result<f32> {
        let index = self.index()?;
        Ok(self.pager()?.offset(index))
    }

    pub fn is_focused(&self) -> Result<bool> {
        let index = self.index()?;
        Ok(self.pager()?.is_focused(index))
    }

    pub fn interpolation(&self, config: &PageInterpolation) -> Result<Style> {
        Ok(interpolate_with_config(self.offset()?, config))
    }
}

/// Reports a page gaining focus, once per transition.
#[derive(Debug, Clone)]
pub struct FocusWatcher {
    index: usize,
    focused: bool,
}

impl FocusWatcher {
    pub fn new(index: usize) -> Self {
        Self { index, focused: false }
    }

    /// True on the first poll after the page became the active one.
    pub fn poll(&mut self, reader: &PagerReader) -> bool {
        let now = reader.is_focused(self.index);
        let gained = now && !self.focused;
        self.focused = now;
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::Interpolation;

    fn publish(provider: &PagerProvider, position: f32, active: usize, count: usize, looping: bool) {
        provider.publish(PagerSnapshot {
            position,
            active_index: active,
            next_index: active,
            page_count: count,
            looping,
        });
    }

    // ── shortest_offset ─────────────────────────────────────────────────

    #[test]
    fn shortest_offset_wraps_both_ways() {
        assert!((shortest_offset(4.0, 5) + 1.0).abs() < 1e-6);
        assert!((shortest_offset(-4.0, 5) - 1.0).abs() < 1e-6);
        assert!((shortest_offset(1.5, 5) - 1.5).abs() < 1e-6);
        assert!((shortest_offset(-0.15, 5) + 0.15).abs() < 1e-5);
        assert_eq!(shortest_offset(7.0, 0), 7.0);
    }

    #[test]
    fn wrapped_position_stays_below_count() {
        assert_eq!(wrap_position(-1.0e-7, 5), 0.0);
        assert_eq!(wrap_position(5.0, 5), 0.0);
        assert_eq!(wrap_position(-1.0, 5), 4.0);
        assert!((wrap_position(7.25, 5) - 2.25).abs() < 1e-6);
        assert_eq!(wrap_position(-3.5, 0), -3.5);
    }

    // ── Provider / reader ───────────────────────────────────────────────

    #[test]
    fn readers_see_published_state() {
        let provider = PagerProvider::new(2);
        let reader = provider.reader();
        assert_eq!(reader.active_index(), 2);
        assert_eq!(reader.position(), 2.0);
        publish(&provider, 2.5, 3, 5, false);
        assert_eq!(reader.position(), 2.5);
        assert_eq!(reader.active_index(), 3);
        assert!(reader.is_focused(3));
    }

    #[test]
    fn offsets_follow_position() {
        let provider = PagerProvider::new(0);
        publish(&provider, 1.25, 1, 5, false);
        let reader = provider.reader();
        assert!((reader.offset(1) + 0.25).abs() < 1e-6);
        assert!((reader.offset(3) - 1.75).abs() < 1e-6);
    }

    #[test]
    fn looping_offsets_take_short_way() {
        let provider = PagerProvider::new(0);
        publish(&provider, 0.0, 0, 5, true);
        assert!((provider.reader().offset(4) + 1.0).abs() < 1e-6);
    }

    // ── Scope ───────────────────────────────────────────────────────────

    #[test]
    fn scope_without_provider_fails() {
        let scope = Scope::root().with_index(1);
        assert!(matches!(scope.pager(), Err(Error::MissingProvider)));
        assert!(matches!(scope.offset(), Err(Error::MissingProvider)));
    }

    #[test]
    fn scope_without_index_fails() {
        let provider = PagerProvider::new(0);
        let scope = Scope::root().with_pager(provider.reader());
        assert!(matches!(scope.index(), Err(Error::MissingIndex)));
        assert!(matches!(scope.is_focused(), Err(Error::MissingIndex)));
    }

    #[test]
    fn page_scope_interpolates_its_offset() {
        let provider = PagerProvider::new(0);
        publish(&provider, 0.5, 0, 3, false);
        let scope = Scope::root().with_pager(provider.reader()).with_index(1);
        let cfg = PageInterpolation::new().with("opacity", Interpolation::range([-1.0, 0.0, 1.0], [0.0, 1.0, 0.0]));
        let style = scope.interpolation(&cfg).unwrap();
        assert!((style["opacity"].as_number().unwrap() - 0.5).abs() < 1e-6);
        assert!(!scope.is_focused().unwrap());
    }

    // ── FocusWatcher ────────────────────────────────────────────────────

    #[test]
    fn focus_fires_once_per_transition() {
        let provider = PagerProvider::new(0);
        let reader = provider.reader();
        let mut watcher = FocusWatcher::new(1);
        assert!(!watcher.poll(&reader));
        publish(&provider, 1.0, 1, 3, false);
        assert!(watcher.poll(&reader));
        assert!(!watcher.poll(&reader));
        publish(&provider, 2.0, 2, 3, false);
        assert!(!watcher.poll(&reader));
        publish(&provider, 1.0, 1, 3, false);
        assert!(watcher.poll(&reader));
    }
}
