//! Page indicators driven by a pager's published position.

use crate::context::PagerReader;
use crate::interpolate::{PageInterpolation, Style};

/// One style per indicator item, each interpolated at that item's offset from
/// the current position. Looping pagers wrap the offsets.
pub fn pagination_styles(reader: &PagerReader, count: usize, config: &PageInterpolation) -> Vec<Style> {
    (0..count).map(|index| reader.interpolation(index, config)).collect()
}

/// A bar one page wide that slides across the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderGeometry {
    pub width: f32,
    pub translate_x: f32,
}

pub fn slider(position: f32, count: usize, track_width: f32) -> SliderGeometry {
    if count == 0 {
        return SliderGeometry { width: 0.0, translate_x: 0.0 };
    }
    let width = track_width / count as f32;
    SliderGeometry { width, translate_x: position * width }
}

/// Width of a bar that fills the track as the pager nears its last page.
pub fn progress_width(position: f32, count: usize, track_width: f32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    track_width * (position + 1.0) / count as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::interpolate::Interpolation;
    use crate::pager::Pager;

    fn dots() -> PageInterpolation {
        PageInterpolation::new().with("opacity", Interpolation::range([-1.0, 0.0, 1.0], [0.5, 1.0, 0.5]))
    }

    #[test]
    fn pagination_highlights_the_active_dot() {
        let mut pager = Pager::new(&Config::default(), 4);
        pager.jump_to(2);
        let styles = pagination_styles(&pager.reader(), 4, &dots());
        assert_eq!(styles.len(), 4);
        assert_eq!(styles[2]["opacity"].as_number(), Some(1.0));
        assert_eq!(styles[1]["opacity"].as_number(), Some(0.5));
        // default extrapolation keeps the slope going
        assert_eq!(styles[0]["opacity"].as_number(), Some(0.0));
    }

    #[test]
    fn looping_pagination_wraps() {
        let mut cfg = Config::default();
        cfg.pager.looping = true;
        let pager = Pager::new(&cfg, 5);
        let styles = pagination_styles(&pager.reader(), 5, &dots());
        assert_eq!(styles[4]["opacity"].as_number(), Some(0.5));
    }

    #[test]
    fn slider_moves_one_segment_per_page() {
        let g = slider(1.5, 4, 200.0);
        assert_eq!(g.width, 50.0);
        assert_eq!(g.translate_x, 75.0);
        assert_eq!(slider(0.0, 0, 200.0), SliderGeometry { width: 0.0, translate_x: 0.0 });
    }

    #[test]
    fn progress_fills_at_last_page() {
        assert_eq!(progress_width(0.0, 4, 200.0), 50.0);
        assert_eq!(progress_width(3.0, 4, 200.0), 200.0);
        assert_eq!(progress_width(1.0, 0, 200.0), 0.0);
    }
}
