//! Timeline model: video bounds, frame timestamps, current time and the
//! labeling interval.
//!
//! Invariant, held after every mutation:
//!
//! ```text
//! video_start <= interval_start <= current_time <= interval_end <= video_end
//! ```
//!
//! Every mutator enforces this by clamping, never by rejecting. Out-of-range
//! requests are silently pulled to the nearest legal value, matching how the
//! rest of the control treats bad input.
//!
//! The model is replaced wholesale when the host swaps in a new frame
//! sequence; interval bounds then reset to the full video range.

use log::debug;

/// Tolerance for "same instant" comparisons between committed time values.
/// Committed values are produced by clamping, so bound comparisons are exact;
/// the epsilon only matters for frame-timestamp searches.
const TIME_EPS: f64 = 1e-9;

#[derive(Clone, Debug)]
pub struct TimelineModel {
    video_start: f64,
    video_end: f64,
    frame_times: Vec<f64>,
    current_time: f64,
    interval_start: f64,
    interval_end: f64,
}

impl TimelineModel {
    /// Build a model for a new frame sequence.
    ///
    /// Sanitizes input rather than rejecting it: a reversed video range is
    /// collapsed to its start, non-finite timestamps are dropped, and the
    /// timestamp list is clamped into the video range and sorted
    /// non-decreasing. Interval resets to the full range, current time to the
    /// start.
    pub fn new(video_start: f64, video_end: f64, frame_times: Vec<f64>) -> Self {
        let video_end = video_end.max(video_start);
        let mut frame_times: Vec<f64> = frame_times
            .into_iter()
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(video_start, video_end))
            .collect();
        frame_times.sort_by(|a, b| a.total_cmp(b));

        debug!(
            "TimelineModel: range [{video_start}, {video_end}], {} frames",
            frame_times.len()
        );

        Self {
            video_start,
            video_end,
            frame_times,
            current_time: video_start,
            interval_start: video_start,
            interval_end: video_end,
        }
    }

    // === Accessors ===

    pub fn video_start(&self) -> f64 {
        self.video_start
    }

    pub fn video_end(&self) -> f64 {
        self.video_end
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn interval_start(&self) -> f64 {
        self.interval_start
    }

    pub fn interval_end(&self) -> f64 {
        self.interval_end
    }

    pub fn interval(&self) -> (f64, f64) {
        (self.interval_start, self.interval_end)
    }

    pub fn video_range(&self) -> (f64, f64) {
        (self.video_start, self.video_end)
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }

    pub fn frame_times(&self) -> &[f64] {
        &self.frame_times
    }

    /// True when the interval spans the whole video range. Nothing to zoom
    /// into in that case.
    pub fn is_full_interval(&self) -> bool {
        self.interval_start == self.video_start && self.interval_end == self.video_end
    }

    pub fn is_at_interval_start(&self) -> bool {
        self.current_time == self.interval_start
    }

    pub fn is_at_interval_end(&self) -> bool {
        self.current_time == self.interval_end
    }

    // === Mutators (all clamping) ===

    /// Move the current time. Clamped to the interval, never the full video
    /// range - the scrubber lives inside the labeling interval.
    pub fn set_current_time(&mut self, t: f64) -> f64 {
        let t = if t.is_finite() { t } else { self.current_time };
        self.current_time = t.clamp(self.interval_start, self.interval_end);
        self.current_time
    }

    /// Move the left interval marker. A marker may never cross the scrubber,
    /// so the legal range is `[video_start, current_time]`.
    pub fn set_interval_start(&mut self, t: f64) -> f64 {
        let t = if t.is_finite() { t } else { self.interval_start };
        self.interval_start = t.clamp(self.video_start, self.current_time);
        self.interval_start
    }

    /// Move the right interval marker. Legal range `[current_time, video_end]`.
    pub fn set_interval_end(&mut self, t: f64) -> f64 {
        let t = if t.is_finite() { t } else { self.interval_end };
        self.interval_end = t.clamp(self.current_time, self.video_end);
        self.interval_end
    }

    /// Replace the whole interval, as if both markers moved at once.
    ///
    /// Clamps both ends into the video range, swaps them if reversed, then
    /// pulls the current time into the new interval. Used by host interval
    /// requests (dialogs, session restore) where the interval wins over the
    /// scrubber position.
    pub fn set_interval(&mut self, a: f64, b: f64) -> (f64, f64) {
        let a = if a.is_finite() { a } else { self.interval_start };
        let b = if b.is_finite() { b } else { self.interval_end };
        let a = a.clamp(self.video_start, self.video_end);
        let b = b.clamp(self.video_start, self.video_end);
        let (start, end) = if b < a { (b, a) } else { (a, b) };

        self.interval_start = start;
        self.interval_end = end;
        self.current_time = self.current_time.clamp(start, end);
        (start, end)
    }

    // === Frame timestamp queries ===

    /// First frame timestamp strictly after `t`.
    pub fn next_frame_time(&self, t: f64) -> Option<f64> {
        self.frame_times.iter().copied().find(|&ft| ft > t + TIME_EPS)
    }

    /// Last frame timestamp strictly before `t`.
    pub fn prev_frame_time(&self, t: f64) -> Option<f64> {
        self.frame_times
            .iter()
            .rev()
            .copied()
            .find(|&ft| ft < t - TIME_EPS)
    }

    /// Frame timestamp closest to `t`, or None for an empty sequence.
    pub fn nearest_frame_time(&self, t: f64) -> Option<f64> {
        self.frame_times
            .iter()
            .copied()
            .min_by(|a, b| (a - t).abs().total_cmp(&(b - t).abs()))
    }
}

impl Default for TimelineModel {
    fn default() -> Self {
        Self::new(0.0, 0.0, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TimelineModel {
        TimelineModel::new(0.0, 100.0, (0..=100).map(|i| i as f64).collect())
    }

    fn invariant_holds(m: &TimelineModel) -> bool {
        m.video_start() <= m.interval_start()
            && m.interval_start() <= m.current_time()
            && m.current_time() <= m.interval_end()
            && m.interval_end() <= m.video_end()
    }

    #[test]
    fn test_new_resets_interval_to_full_range() {
        let m = model();
        assert_eq!(m.interval(), (0.0, 100.0));
        assert_eq!(m.current_time(), 0.0);
        assert!(m.is_full_interval());
        assert!(invariant_holds(&m));
    }

    #[test]
    fn test_set_current_time_clamps_to_interval() {
        let mut m = model();
        m.set_current_time(50.0);
        m.set_interval(20.0, 80.0);
        assert_eq!(m.set_current_time(5.0), 20.0);
        assert_eq!(m.set_current_time(95.0), 80.0);
        assert_eq!(m.set_current_time(42.7), 42.7);
        assert!(invariant_holds(&m));
    }

    #[test]
    fn test_marker_cannot_cross_scrubber() {
        let mut m = model();
        m.set_current_time(5.0);
        // Left marker dragged toward t=10 stops at the scrubber.
        assert_eq!(m.set_interval_start(10.0), 5.0);
        // Right marker dragged toward t=2 stops at the scrubber.
        assert_eq!(m.set_interval_end(2.0), 5.0);
        assert!(invariant_holds(&m));
    }

    #[test]
    fn test_set_interval_swaps_and_pulls_current() {
        let mut m = model();
        m.set_current_time(10.0);
        let (a, b) = m.set_interval(80.0, 20.0);
        assert_eq!((a, b), (20.0, 80.0));
        assert_eq!(m.current_time(), 20.0);
        assert!(invariant_holds(&m));
    }

    #[test]
    fn test_set_interval_clamps_to_video_range() {
        let mut m = model();
        let (a, b) = m.set_interval(-50.0, 500.0);
        assert_eq!((a, b), (0.0, 100.0));
        assert!(m.is_full_interval());
    }

    #[test]
    fn test_degenerate_interval() {
        let mut m = model();
        m.set_current_time(30.0);
        m.set_interval(30.0, 30.0);
        assert!(m.is_at_interval_start());
        assert!(m.is_at_interval_end());
        assert_eq!(m.set_current_time(99.0), 30.0);
    }

    #[test]
    fn test_sanitizes_bad_input() {
        let m = TimelineModel::new(10.0, 5.0, vec![f64::NAN, 3.0, 1.0, 99.0]);
        assert_eq!(m.video_range(), (10.0, 10.0));
        // NaN dropped, rest clamped into the (collapsed) range.
        assert_eq!(m.frame_count(), 3);
        assert!(m.frame_times().iter().all(|&t| t == 10.0));
    }

    #[test]
    fn test_frame_time_queries() {
        let m = TimelineModel::new(0.0, 10.0, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(m.next_frame_time(2.5), Some(5.0));
        assert_eq!(m.next_frame_time(9.99), Some(10.0));
        assert_eq!(m.next_frame_time(10.0), None);
        assert_eq!(m.prev_frame_time(2.5), Some(0.0));
        assert_eq!(m.prev_frame_time(0.0), None);
        assert_eq!(m.nearest_frame_time(3.6), Some(2.5));
        assert_eq!(m.nearest_frame_time(3.8), Some(5.0));
    }

    #[test]
    fn test_invariant_after_random_walk() {
        let mut m = model();
        // Deterministic pseudo-random drag sequence.
        let mut x: u64 = 0x9e3779b97f4a7c15;
        for i in 0..500 {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let t = (x >> 11) as f64 / (1u64 << 53) as f64 * 140.0 - 20.0;
            match i % 3 {
                0 => {
                    m.set_current_time(t);
                }
                1 => {
                    m.set_interval_start(t);
                }
                _ => {
                    m.set_interval_end(t);
                }
            }
            assert!(invariant_holds(&m), "step {i}: t={t} model={m:?}");
        }
    }
}
