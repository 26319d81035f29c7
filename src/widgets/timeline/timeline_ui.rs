//! Timeline widget - UI rendering
//!
//! One horizontal strip: transport toolbar, time ruler, scrubber track with
//! the two interval markers, and editable time fields.
//!
//! # Interactions
//!
//! - **Drag scrubber line**: move the current time inside the interval
//! - **Drag a marker**: move an interval bound (blocked while snapped)
//! - **Click track/ruler**: jump the scrubber to that pixel
//! - **Space / arrows / Home / End**: transport shortcuts
//!
//! All input funnels into `TimelineControl`; this module never mutates the
//! model directly. Enablement comes back out through the control's derived
//! accessors, applied with `add_enabled`.

use std::time::Instant;

use eframe::egui::{self, Color32, Pos2, Rect, Sense, Ui, Vec2};

use super::timeline_helpers::{cursor_for, format_time, parse_time, pick_target, ruler_step};
use super::{TimelineConfig, TimelineState};
use crate::core::{DragTarget, PlaybackRequest, TimelineControl, Viewport};

const RULER_BG: Color32 = Color32::from_gray(25);
const TRACK_BG: Color32 = Color32::from_gray(40);
const OUTSIDE_INTERVAL: Color32 = Color32::from_black_alpha(110);
const SCRUBBER_COLOR: Color32 = Color32::from_rgb(255, 220, 100);
const MARKER_COLOR: Color32 = Color32::from_rgb(100, 220, 255);
const MARKER_DISABLED: Color32 = Color32::from_gray(90);
const TICK_COLOR: Color32 = Color32::from_gray(100);
const LABEL_COLOR: Color32 = Color32::from_gray(150);

/// Render the whole timeline strip and route its input.
pub fn render_timeline(
    ui: &mut Ui,
    control: &mut TimelineControl,
    config: &TimelineConfig,
    state: &mut TimelineState,
) {
    control.tick(Instant::now());
    if control.is_playing() {
        ui.ctx().request_repaint();
    }

    render_toolbar(ui, control);
    render_track(ui, control, config);
    if config.show_time_fields {
        render_time_fields(ui, control, state);
    }
    handle_shortcuts(ui, control);
}

/// Transport buttons plus the snap toggle.
fn render_toolbar(ui: &mut Ui, control: &mut TimelineControl) {
    ui.horizontal(|ui| {
        let buttons = control.transport_buttons();

        if ui
            .add_enabled(buttons.first, egui::Button::new("⏮"))
            .on_hover_text("First frame")
            .clicked()
        {
            control.transport(PlaybackRequest::First);
        }
        if ui
            .add_enabled(buttons.previous, egui::Button::new("◀"))
            .on_hover_text("Previous frame")
            .clicked()
        {
            control.transport(PlaybackRequest::Previous);
        }

        let play_icon = if control.is_playing() { "⏸" } else { "▶" };
        if ui
            .add_enabled(buttons.play, egui::Button::new(play_icon))
            .on_hover_text("Play/Pause")
            .clicked()
        {
            control.transport(PlaybackRequest::PlayToggle);
        }

        if ui
            .add_enabled(buttons.next, egui::Button::new("▶|"))
            .on_hover_text("Next frame")
            .clicked()
        {
            control.transport(PlaybackRequest::Next);
        }
        if ui
            .add_enabled(buttons.last, egui::Button::new("⏭"))
            .on_hover_text("Last frame")
            .clicked()
        {
            control.transport(PlaybackRequest::Last);
        }

        ui.separator();

        let snap_label = if control.is_snapped() {
            "Unsnap"
        } else {
            "Snap to interval"
        };
        if ui
            .add_enabled(control.snap_toggle_enabled(), egui::Button::new(snap_label))
            .on_hover_text("Zoom the track to the labeling interval")
            .clicked()
        {
            control.toggle_snap();
        }
    });
}

/// Ruler + scrubber track. Owns all pointer routing.
fn render_track(ui: &mut Ui, control: &mut TimelineControl, config: &TimelineConfig) {
    let width = ui.available_width().max(1.0);
    let height = config.ruler_height + config.track_height;
    let (rect, response) = ui.allocate_exact_size(Vec2::new(width, height), Sense::click_and_drag());

    // The core works in whole viewport pixels.
    control.set_viewport(Viewport::new(
        rect.min.x.round() as i32,
        rect.width().round() as i32,
    ));

    let ruler_rect = Rect::from_min_max(rect.min, Pos2::new(rect.max.x, rect.min.y + config.ruler_height));
    let track_rect = Rect::from_min_max(Pos2::new(rect.min.x, ruler_rect.max.y), rect.max);

    if ui.is_rect_visible(rect) {
        draw_ruler(ui, control, ruler_rect);
        draw_track(ui, control, config, track_rect);
    }

    route_pointer(ui, control, config, &response, track_rect);
}

fn draw_ruler(ui: &Ui, control: &TimelineControl, rect: Rect) {
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, RULER_BG);

    let (view_start, view_end) = control.view_range();
    let span = view_end - view_start;
    if span <= 0.0 {
        return;
    }

    let label_step = ruler_step(span, rect.width(), 80.0);
    let tick_step = label_step / 5.0;

    let mut t = (view_start / tick_step).ceil() * tick_step;
    let mut i = 0;
    while t <= view_end + tick_step * 1e-6 && i < 10_000 {
        let x = control.time_to_pixel(t) as f32;
        // Labels on label-step multiples, short ticks in between.
        let on_label = (t / label_step - (t / label_step).round()).abs() < 1e-6;
        let tick_h = if on_label { 8.0 } else { 4.0 };
        painter.line_segment(
            [Pos2::new(x, rect.max.y - tick_h), Pos2::new(x, rect.max.y)],
            (1.0, TICK_COLOR),
        );
        if on_label {
            painter.text(
                Pos2::new(x + 2.0, rect.min.y),
                egui::Align2::LEFT_TOP,
                format_time(t),
                egui::FontId::monospace(9.0),
                LABEL_COLOR,
            );
        }
        t += tick_step;
        i += 1;
    }
}

fn draw_track(ui: &Ui, control: &TimelineControl, config: &TimelineConfig, rect: Rect) {
    let painter = ui.painter();
    painter.rect_filled(rect, 2.0, TRACK_BG);

    let (left_px, right_px) = control.marker_pixels();
    let (left_x, right_x) = (left_px as f32, right_px as f32);

    // Darken the stretches outside the interval (invisible while snapped,
    // where the markers sit at the track edges anyway).
    if left_x > rect.min.x {
        painter.rect_filled(
            Rect::from_min_max(rect.min, Pos2::new(left_x, rect.max.y)),
            0.0,
            OUTSIDE_INTERVAL,
        );
    }
    if right_x < rect.max.x {
        painter.rect_filled(
            Rect::from_min_max(Pos2::new(right_x, rect.min.y), rect.max),
            0.0,
            OUTSIDE_INTERVAL,
        );
    }

    let marker_color = if control.markers_enabled() {
        MARKER_COLOR
    } else {
        MARKER_DISABLED
    };
    let half = config.marker_width / 2.0;
    for x in [left_x, right_x] {
        painter.rect_filled(
            Rect::from_min_max(
                Pos2::new(x - half, rect.min.y),
                Pos2::new(x + half, rect.max.y),
            ),
            2.0,
            marker_color,
        );
    }

    let scrubber_x = control.scrubber_pixel() as f32;
    painter.line_segment(
        [
            Pos2::new(scrubber_x, rect.min.y),
            Pos2::new(scrubber_x, rect.max.y),
        ],
        (2.0, SCRUBBER_COLOR),
    );
}

fn route_pointer(
    ui: &Ui,
    control: &mut TimelineControl,
    config: &TimelineConfig,
    response: &egui::Response,
    track_rect: Rect,
) {
    let pick_at = |control: &TimelineControl, x: f32| {
        let (left_px, right_px) = control.marker_pixels();
        pick_target(
            x,
            control.scrubber_pixel() as f32,
            left_px as f32,
            right_px as f32,
            config.grab_threshold,
            control.scrubber_enabled(),
            control.markers_enabled(),
        )
    };

    if let Some(pos) = response.hover_pos() {
        if track_rect.contains(pos) && !control.is_dragging() {
            if let Some(target) = pick_at(control, pos.x) {
                ui.ctx().set_cursor_icon(cursor_for(target));
            }
        }
    }

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            // A grab off any handle scrubs from wherever the press landed.
            let target = pick_at(control, pos.x).unwrap_or(DragTarget::Scrubber);
            if control.press(target) {
                control.drag_to_pixel(pos.x.round() as i32);
            }
        }
    } else if response.dragged() && control.is_dragging() {
        if let Some(pos) = response.interact_pointer_pos() {
            control.drag_to_pixel(pos.x.round() as i32);
        }
    }

    if response.drag_stopped() {
        control.release_drag();
    }

    // A plain click is a jump: press, move, release in one frame.
    if response.clicked() && !control.is_dragging() {
        if let Some(pos) = response.interact_pointer_pos() {
            let target = pick_at(control, pos.x).unwrap_or(DragTarget::Scrubber);
            if control.press(target) {
                control.drag_to_pixel(pos.x.round() as i32);
                control.release_drag();
            }
        }
    }
}

/// Interval start / current / interval end edit fields.
///
/// Each field shows the live value until focused, then edits a buffer that
/// commits on Enter or focus loss. An unparsable buffer reverts to the live
/// value, it never writes the model.
fn render_time_fields(ui: &mut Ui, control: &mut TimelineControl, state: &mut TimelineState) {
    let current_enabled = control.time_inputs_enabled();
    let interval_enabled = control.interval_inputs_enabled();
    let (start, end) = control.interval();
    let current = control.current_time();

    let mut new_start = None;
    let mut new_current = None;
    let mut new_end = None;

    ui.horizontal(|ui| {
        ui.label("Start:");
        new_start = time_field(
            ui,
            "interval_start",
            &mut state.interval_start_text,
            start,
            interval_enabled,
        );
        ui.label("Current:");
        new_current = time_field(
            ui,
            "current_time",
            &mut state.current_time_text,
            current,
            current_enabled,
        );
        ui.label("End:");
        new_end = time_field(
            ui,
            "interval_end",
            &mut state.interval_end_text,
            end,
            interval_enabled,
        );
    });

    if let Some(t) = new_start {
        control.request_interval_change(t, end);
    }
    if let Some(t) = new_end {
        control.request_interval_change(start, t);
    }
    if let Some(t) = new_current {
        control.request_time_change(t);
    }
}

fn time_field(
    ui: &mut Ui,
    id: &str,
    buffer: &mut Option<String>,
    live_value: f64,
    enabled: bool,
) -> Option<f64> {
    let mut text = buffer.clone().unwrap_or_else(|| format_time(live_value));
    let response = ui.add_enabled(
        enabled,
        egui::TextEdit::singleline(&mut text)
            .id_salt(id)
            .desired_width(80.0)
            .font(egui::TextStyle::Monospace),
    );

    if response.has_focus() {
        *buffer = Some(text);
        return None;
    }

    if response.lost_focus() {
        let committed = buffer.take().as_deref().and_then(parse_time);
        return committed;
    }

    None
}

fn handle_shortcuts(ui: &Ui, control: &mut TimelineControl) {
    // Text fields get the keyboard first.
    if ui.ctx().wants_keyboard_input() {
        return;
    }
    let (space, left, right, home, end) = ui.input(|i| {
        (
            i.key_pressed(egui::Key::Space),
            i.key_pressed(egui::Key::ArrowLeft),
            i.key_pressed(egui::Key::ArrowRight),
            i.key_pressed(egui::Key::Home),
            i.key_pressed(egui::Key::End),
        )
    });
    if space {
        control.transport(PlaybackRequest::PlayToggle);
    }
    if left {
        control.transport(PlaybackRequest::Previous);
    }
    if right {
        control.transport(PlaybackRequest::Next);
    }
    if home {
        control.transport(PlaybackRequest::First);
    }
    if end {
        control.transport(PlaybackRequest::Last);
    }
}
