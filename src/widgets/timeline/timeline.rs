//! Timeline widget - state and configuration.
//! Shared by the renderer in `timeline_ui.rs`. Data flow: egui input →
//! `TimelineControl` methods → model mutation + channel events; the renderer
//! reads `TimelineConfig`/`TimelineState` plus the control's derived
//! enablement and pixel accessors to draw.

/// Configuration for the timeline widget (geometry and thresholds)
#[derive(Clone, Debug)]
pub struct TimelineConfig {
    pub track_height: f32,
    pub ruler_height: f32,
    /// Half-width of the hit zone around the scrubber line and each marker.
    pub grab_threshold: f32,
    pub marker_width: f32,
    pub show_time_fields: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            track_height: 26.0,
            ruler_height: 18.0,
            grab_threshold: 6.0,
            marker_width: 7.0,
            show_time_fields: true,
        }
    }
}

/// Widget state (persistent between frames)
#[derive(Clone, Debug, Default)]
pub struct TimelineState {
    /// Edit buffers for the three time fields; None when not being edited so
    /// the field tracks the live value.
    pub interval_start_text: Option<String>,
    pub current_time_text: Option<String>,
    pub interval_end_text: Option<String>,
}

impl TimelineState {
    /// Drop all edit buffers (configure, focus loss).
    pub fn clear_edits(&mut self) {
        self.interval_start_text = None;
        self.current_time_text = None;
        self.interval_end_text = None;
    }
}
