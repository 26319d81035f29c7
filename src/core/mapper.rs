//! Time ↔ pixel mapping for the timeline track.
//!
//! Pure functions, no state. The viewport is a 1-D pixel span; the time range
//! it represents is chosen by the caller (full video range, or the labeling
//! interval when the view is snapped).
//!
//! `time_to_pixel` rounds half-up so that the range endpoints land exactly on
//! the first and last viewport pixels. `pixel_to_time` is the exact inverse of
//! the linear (unrounded) part and deliberately does NOT round or clamp - time
//! values keep sub-pixel precision for later clamping against model bounds.

/// 1-D pixel span of the timeline track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub origin_px: i32,
    pub length_px: i32,
}

impl Viewport {
    /// Viewport length is always at least one pixel.
    pub fn new(origin_px: i32, length_px: i32) -> Self {
        Self {
            origin_px,
            length_px: length_px.max(1),
        }
    }

    /// Last addressable pixel (inclusive).
    pub fn last_px(&self) -> i32 {
        self.origin_px + self.length_px - 1
    }

    /// Inclusive pixel containment check.
    pub fn contains(&self, px: i32) -> bool {
        px >= self.origin_px && px <= self.last_px()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

/// Map a time value into viewport pixel space.
///
/// Clamps the result to `[origin_px, last_px]`. A degenerate range
/// (`range_start == range_end`) maps everything to the origin pixel.
pub fn time_to_pixel(t: f64, range_start: f64, range_end: f64, viewport: &Viewport) -> i32 {
    let span = range_end - range_start;
    if span <= 0.0 {
        return viewport.origin_px;
    }

    let norm = (t - range_start) / span;
    let scaled = norm * (viewport.length_px - 1) as f64;
    // Round half-up: floor(x + 0.5). f64::round() rounds half away from zero,
    // which differs for negative midpoints.
    let px = (scaled + 0.5).floor() as i32 + viewport.origin_px;
    px.clamp(viewport.origin_px, viewport.last_px())
}

/// Map a viewport pixel back to a time value.
///
/// Exact inverse of the linear part of [`time_to_pixel`]; unrounded and
/// unclamped so callers can apply their own (narrower) bounds.
pub fn pixel_to_time(px: i32, range_start: f64, range_end: f64, viewport: &Viewport) -> f64 {
    let span = range_end - range_start;
    if span <= 0.0 || viewport.length_px <= 1 {
        return range_start;
    }

    let norm = (px - viewport.origin_px) as f64 / (viewport.length_px - 1) as f64;
    range_start + norm * span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_map_exactly() {
        let vp = Viewport::new(10, 100);
        assert_eq!(time_to_pixel(0.0, 0.0, 50.0, &vp), 10);
        assert_eq!(time_to_pixel(50.0, 0.0, 50.0, &vp), 109);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let vp = Viewport::new(0, 100);
        assert_eq!(time_to_pixel(-10.0, 0.0, 50.0, &vp), 0);
        assert_eq!(time_to_pixel(999.0, 0.0, 50.0, &vp), 99);
    }

    #[test]
    fn test_degenerate_range() {
        let vp = Viewport::new(7, 100);
        assert_eq!(time_to_pixel(42.0, 5.0, 5.0, &vp), 7);
        assert_eq!(pixel_to_time(50, 5.0, 5.0, &vp), 5.0);
    }

    #[test]
    fn test_round_half_up() {
        // 3 pixels over [0,2]: t=0.25 -> 0.25px -> 0; t=0.5 -> 0.5px -> 1
        let vp = Viewport::new(0, 3);
        assert_eq!(time_to_pixel(0.25, 0.0, 2.0, &vp), 0);
        assert_eq!(time_to_pixel(0.5, 0.0, 2.0, &vp), 1);
    }

    #[test]
    fn test_pixel_to_time_keeps_precision() {
        let vp = Viewport::new(0, 101);
        let t = pixel_to_time(33, 0.0, 10.0, &vp);
        assert!((t - 3.3).abs() < 1e-12);
    }

    #[test]
    fn test_roundtrip_within_one_pixel_resolution() {
        let vp = Viewport::new(20, 640);
        let (start, end) = (1.5, 97.25);
        let time_per_px = (end - start) / (vp.length_px - 1) as f64;
        for i in 0..=100 {
            let t = start + (end - start) * (i as f64 / 100.0);
            let px = time_to_pixel(t, start, end, &vp);
            let back = pixel_to_time(px, start, end, &vp);
            assert!(
                (back - t).abs() <= time_per_px * 0.5 + 1e-12,
                "t={t} px={px} back={back}"
            );
        }
    }

    #[test]
    fn test_min_length_viewport() {
        let vp = Viewport::new(4, 1);
        assert_eq!(time_to_pixel(3.0, 0.0, 10.0, &vp), 4);
        assert_eq!(pixel_to_time(4, 0.0, 10.0, &vp), 0.0);
    }
}
