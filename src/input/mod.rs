use crate::config::{Axis, ClampBounds, UNBOUNDED_DRAG};

/// Lifecycle of the host's drag recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Active,
    Ended,
    /// Treated exactly like `Ended`.
    Cancelled,
}

impl GestureState {
    pub fn is_active(self) -> bool {
        self == GestureState::Active
    }
}

/// One frame's worth of drag input: translation since the gesture began.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    pub translation_x: f32,
    pub translation_y: f32,
    pub state: GestureState,
}

impl GestureSample {
    pub fn active(translation_x: f32, translation_y: f32) -> Self {
        Self { translation_x, translation_y, state: GestureState::Active }
    }

    pub fn ended(translation_x: f32, translation_y: f32) -> Self {
        Self { translation_x, translation_y, state: GestureState::Ended }
    }
}

/// Turns translation samples into a page-normalized delta along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMapper {
    pub axis: Axis,
    clamp_prev: f32,
    clamp_next: f32,
}

impl DragMapper {
    pub fn new(axis: Axis, clamp: ClampBounds) -> Self {
        let (clamp_prev, clamp_next) = clamp.resolve(UNBOUNDED_DRAG);
        Self { axis, clamp_prev, clamp_next }
    }

    /// Delta in pages, clamped into `[-clamp_next, clamp_prev]`. Positive
    /// deltas move toward lower indices. `None` unless the gesture is active
    /// and the page has a size.
    pub fn delta(&self, sample: &GestureSample, dimension: f32) -> Option<f32> {
        if !sample.state.is_active() || dimension <= f32::EPSILON {
            return None;
        }
        let raw = self.axis.component(sample.translation_x, sample.translation_y) / dimension;
        // max before min: `next` bounds negative translations
        Some(raw.max(-self.clamp_next).min(self.clamp_prev))
    }
}

/// Pointer bookkeeping for hosts that deliver raw press/move/release events
/// rather than recognizer translations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerDrag {
    origin: Option<(f32, f32)>,
    last: (f32, f32),
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    pub fn press(&mut self, x: f32, y: f32) -> GestureSample {
        self.origin = Some((x, y));
        self.last = (x, y);
        GestureSample::active(0.0, 0.0)
    }

    /// `None` while no button is held.
    pub fn moved(&mut self, x: f32, y: f32) -> Option<GestureSample> {
        let (ox, oy) = self.origin?;
        self.last = (x, y);
        Some(GestureSample::active(x - ox, y - oy))
    }

    pub fn release(&mut self) -> Option<GestureSample> {
        self.finish(GestureState::Ended)
    }

    /// Pointer left the surface or focus was lost mid-drag.
    pub fn cancel(&mut self) -> Option<GestureSample> {
        self.finish(GestureState::Cancelled)
    }

    fn finish(&mut self, state: GestureState) -> Option<GestureSample> {
        let (ox, oy) = self.origin.take()?;
        Some(GestureSample {
            translation_x: self.last.0 - ox,
            translation_y: self.last.1 - oy,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── DragMapper ──────────────────────────────────────────────────────

    #[test]
    fn horizontal_uses_x_and_normalizes() {
        let mapper = DragMapper::new(Axis::Horizontal, ClampBounds::default());
        let d = mapper.delta(&GestureSample::active(-150.0, 40.0), 300.0).unwrap();
        assert!((d + 0.5).abs() < 1e-6);
    }

    #[test]
    fn vertical_uses_y() {
        let mapper = DragMapper::new(Axis::Vertical, ClampBounds::default());
        let d = mapper.delta(&GestureSample::active(-150.0, 40.0), 200.0).unwrap();
        assert!((d - 0.2).abs() < 1e-6);
    }

    #[test]
    fn inactive_samples_are_ignored() {
        let mapper = DragMapper::new(Axis::Horizontal, ClampBounds::default());
        assert_eq!(mapper.delta(&GestureSample::ended(50.0, 0.0), 100.0), None);
        assert_eq!(mapper.delta(&GestureSample::default(), 100.0), None);
    }

    #[test]
    fn unmeasured_page_is_ignored() {
        let mapper = DragMapper::new(Axis::Horizontal, ClampBounds::default());
        assert_eq!(mapper.delta(&GestureSample::active(50.0, 0.0), 0.0), None);
    }

    #[test]
    fn clamps_are_asymmetric() {
        let mapper = DragMapper::new(Axis::Horizontal, ClampBounds::new(0.25, 0.5));
        assert_eq!(mapper.delta(&GestureSample::active(100.0, 0.0), 100.0), Some(0.25));
        assert_eq!(mapper.delta(&GestureSample::active(-100.0, 0.0), 100.0), Some(-0.5));
    }

    #[test]
    fn unset_clamp_is_effectively_unbounded() {
        let mapper = DragMapper::new(Axis::Horizontal, ClampBounds { prev: Some(0.0), next: None });
        assert_eq!(mapper.delta(&GestureSample::active(700.0, 0.0), 100.0), Some(0.0));
        assert_eq!(mapper.delta(&GestureSample::active(-700.0, 0.0), 100.0), Some(-7.0));
    }

    // ── PointerDrag ─────────────────────────────────────────────────────

    #[test]
    fn pointer_translation_is_relative_to_press() {
        let mut drag = PointerDrag::new();
        assert_eq!(drag.moved(5.0, 5.0), None);
        drag.press(100.0, 50.0);
        let s = drag.moved(70.0, 55.0).unwrap();
        assert_eq!((s.translation_x, s.translation_y), (-30.0, 5.0));
        assert_eq!(s.state, GestureState::Active);
        let s = drag.release().unwrap();
        assert_eq!(s.state, GestureState::Ended);
        assert_eq!(s.translation_x, -30.0);
        assert!(!drag.is_dragging());
        assert_eq!(drag.release(), None);
    }

    #[test]
    fn cancel_reports_cancelled() {
        let mut drag = PointerDrag::new();
        drag.press(0.0, 0.0);
        drag.moved(10.0, 0.0);
        assert_eq!(drag.cancel().unwrap().state, GestureState::Cancelled);
    }
}
