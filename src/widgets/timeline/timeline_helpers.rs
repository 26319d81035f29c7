//! Timeline UI helpers: hit testing, time formatting and ruler math.
use eframe::egui;

use crate::core::DragTarget;

/// Decide which draggable element a press at `x` lands on.
///
/// Candidates within the threshold compete by distance; the scrubber wins
/// ties since it is the most common drag. Markers disabled (snap mode,
/// freeze) are excluded by passing `markers_enabled = false`.
pub(super) fn pick_target(
    x: f32,
    scrubber_x: f32,
    left_marker_x: f32,
    right_marker_x: f32,
    threshold: f32,
    scrubber_enabled: bool,
    markers_enabled: bool,
) -> Option<DragTarget> {
    let mut best: Option<(DragTarget, f32)> = None;
    let mut consider = |target: DragTarget, dist: f32, enabled: bool| {
        if !enabled || dist > threshold {
            return;
        }
        match best {
            Some((_, d)) if d <= dist => {}
            _ => best = Some((target, dist)),
        }
    };

    // Scrubber first so equal distances resolve in its favor.
    consider(DragTarget::Scrubber, (x - scrubber_x).abs(), scrubber_enabled);
    consider(
        DragTarget::LeftMarker,
        (x - left_marker_x).abs(),
        markers_enabled,
    );
    consider(
        DragTarget::RightMarker,
        (x - right_marker_x).abs(),
        markers_enabled,
    );
    best.map(|(t, _)| t)
}

pub(super) fn cursor_for(target: DragTarget) -> egui::CursorIcon {
    match target {
        DragTarget::Scrubber => egui::CursorIcon::Grab,
        DragTarget::LeftMarker | DragTarget::RightMarker => egui::CursorIcon::ResizeHorizontal,
    }
}

/// Format seconds as `m:ss.mmm` (or `h:mm:ss.mmm` past an hour).
pub(super) fn format_time(t: f64) -> String {
    let t = t.max(0.0);
    let total_ms = (t * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}.{ms:03}")
    } else {
        format!("{mins}:{secs:02}.{ms:03}")
    }
}

/// Parse a time field: plain seconds, `m:ss`, or `h:mm:ss`, fractions
/// allowed on the last component, minute/second components below 60. None
/// for anything malformed.
pub(super) fn parse_time(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let value: f64 = part.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        // Only the last component may be fractional.
        if i + 1 < parts.len() && value.fract() != 0.0 {
            return None;
        }
        // Components after a colon carry over at 60, so "1:99" is malformed.
        if i > 0 && value >= 60.0 {
            return None;
        }
        total = total * 60.0 + value;
    }
    Some(total)
}

/// Pick a ruler label step so labels sit roughly `min_label_px` apart.
/// Steps follow the usual 1/2/5 ladder in seconds.
pub(super) fn ruler_step(view_span: f64, track_width_px: f32, min_label_px: f32) -> f64 {
    if view_span <= 0.0 || track_width_px <= 0.0 {
        return 1.0;
    }
    let target = view_span * (min_label_px / track_width_px) as f64;
    let magnitude = 10f64.powf(target.log10().floor());
    for mult in [1.0, 2.0, 5.0] {
        let step = magnitude * mult;
        if step >= target {
            return step;
        }
    }
    magnitude * 10.0
}
