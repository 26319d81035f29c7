//! Snap (zoom-to-interval) mode.
//!
//! Snapping rewires which time range the viewport represents - nothing else.
//! Model times are untouched by either transition, so snap then unsnap always
//! round-trips. While snapped the markers render pinned at the viewport
//! extremes and marker dragging is disabled; the scrubber keeps working,
//! re-mapped into the narrower range.

use log::debug;

use super::model::TimelineModel;

/// View state of the timeline track. Closed enum, checked exhaustively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapMode {
    #[default]
    Unsnapped,
    Snapped,
}

#[derive(Debug, Default)]
pub struct ModeController {
    mode: SnapMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SnapMode {
        self.mode
    }

    pub fn is_snapped(&self) -> bool {
        self.mode == SnapMode::Snapped
    }

    /// Snapping is only meaningful when the interval differs from the full
    /// video range.
    pub fn can_snap(model: &TimelineModel) -> bool {
        !model.is_full_interval()
    }

    /// Enter snap mode. Refused (returns false) when the interval spans the
    /// whole video, or when already snapped.
    pub fn enter_snap(&mut self, model: &TimelineModel) -> bool {
        if self.is_snapped() || !Self::can_snap(model) {
            return false;
        }
        debug!("snap: viewport -> interval {:?}", model.interval());
        self.mode = SnapMode::Snapped;
        true
    }

    /// Leave snap mode. Returns false when already unsnapped.
    pub fn exit_snap(&mut self) -> bool {
        if !self.is_snapped() {
            return false;
        }
        debug!("unsnap: viewport -> full video range");
        self.mode = SnapMode::Unsnapped;
        true
    }

    /// Reset to unsnapped (model replacement).
    pub fn reset(&mut self) {
        self.mode = SnapMode::Unsnapped;
    }

    /// Time range the viewport currently represents.
    pub fn view_range(&self, model: &TimelineModel) -> (f64, f64) {
        match self.mode {
            SnapMode::Unsnapped => model.video_range(),
            SnapMode::Snapped => model.interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cannot_snap_full_interval() {
        let model = TimelineModel::new(0.0, 100.0, Vec::new());
        let mut mode = ModeController::new();
        assert!(!mode.enter_snap(&model));
        assert!(!mode.is_snapped());
    }

    #[test]
    fn test_snap_rewires_view_range_only() {
        let mut model = TimelineModel::new(0.0, 100.0, Vec::new());
        model.set_current_time(50.0);
        model.set_interval(20.0, 80.0);

        let mut mode = ModeController::new();
        assert_eq!(mode.view_range(&model), (0.0, 100.0));

        assert!(mode.enter_snap(&model));
        assert_eq!(mode.view_range(&model), (20.0, 80.0));
        // Model untouched.
        assert_eq!(model.interval(), (20.0, 80.0));
        assert_eq!(model.current_time(), 50.0);
    }

    #[test]
    fn test_snap_unsnap_roundtrip() {
        let mut model = TimelineModel::new(0.0, 100.0, Vec::new());
        model.set_current_time(33.0);
        model.set_interval(10.0, 90.0);
        let before = (model.current_time(), model.interval());

        let mut mode = ModeController::new();
        assert!(mode.enter_snap(&model));
        assert!(mode.exit_snap());
        assert_eq!((model.current_time(), model.interval()), before);
        assert_eq!(mode.view_range(&model), (0.0, 100.0));
    }

    #[test]
    fn test_transitions_are_guarded() {
        let mut model = TimelineModel::new(0.0, 100.0, Vec::new());
        model.set_interval(0.0, 50.0);
        let mut mode = ModeController::new();

        assert!(!mode.exit_snap());
        assert!(mode.enter_snap(&model));
        assert!(!mode.enter_snap(&model)); // already snapped
        assert!(mode.exit_snap());
    }
}
