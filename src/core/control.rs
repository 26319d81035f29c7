//! The timeline control facade.
//!
//! [`TimelineControl`] owns the model and all the small state machines and is
//! the only type the widget and the host talk to. The widget calls the
//! pointer/transport methods and reads the derived enablement and pixel
//! accessors every frame; the host calls the `request_*`/`notify_*` methods
//! and drains the event channel.
//!
//! Enablement is layered: [`ControlToggles`] is the *stored* state; freeze
//! contexts and mode rules (markers dark while snapped, snap toggle dark for
//! a full-range interval, transport gated by at-start/at-end) are overlays
//! derived in the accessors. Restoring a freeze snapshot therefore can never
//! re-enable something the current mode or the other context forbids, and
//! overlapping freezes release independently.

use std::time::Instant;

use log::{debug, info, warn};

use super::drag::{DragContact, DragController, DragTarget};
use super::events::{ControlEvent, ControlEventSender, PlaybackRequest};
use super::freeze::{ControlToggles, FreezeContext, FreezeStack};
use super::mapper::{self, Viewport};
use super::mode::{ModeController, SnapMode};
use super::model::TimelineModel;
use super::playback::{
    PlaybackController, PlaybackState, Tick, TransportEnablement, transport_enablement,
};

/// Everything needed to (re)configure the control for a frame sequence.
#[derive(Clone, Debug, Default)]
pub struct ControlOptions {
    pub video_start: f64,
    pub video_end: f64,
    pub frame_times: Vec<f64>,
}

pub struct TimelineControl {
    model: TimelineModel,
    viewport: Viewport,
    drag: DragController,
    mode: ModeController,
    freeze: FreezeStack,
    playback: PlaybackController,
    toggles: ControlToggles,
    events: ControlEventSender,
    /// Snap the scrubber to the nearest frame timestamp while dragging.
    frame_snapping: bool,
}

impl TimelineControl {
    pub fn new(options: ControlOptions, events: ControlEventSender) -> Self {
        let model = TimelineModel::new(options.video_start, options.video_end, options.frame_times);
        Self {
            model,
            viewport: Viewport::default(),
            drag: DragController::new(),
            mode: ModeController::new(),
            freeze: FreezeStack::new(),
            playback: PlaybackController::new(),
            toggles: ControlToggles::default(),
            events,
            frame_snapping: false,
        }
    }

    /// Scrubber drags land on the nearest frame timestamp when on (and the
    /// sequence has timestamps at all). Markers always stay continuous.
    pub fn set_frame_snapping(&mut self, on: bool) {
        self.frame_snapping = on;
    }

    pub fn frame_snapping(&self) -> bool {
        self.frame_snapping
    }

    /// Replace the frame sequence. Resets everything transient: active drag,
    /// playback, both freeze slots, enablement and snap mode.
    pub fn configure(&mut self, options: ControlOptions) {
        info!(
            "configure: range [{}, {}], {} frames",
            options.video_start,
            options.video_end,
            options.frame_times.len()
        );
        self.drag.abort();
        self.playback.stop();
        self.freeze.clear();
        self.toggles = ControlToggles::default();
        self.mode.reset();
        self.model = TimelineModel::new(options.video_start, options.video_end, options.frame_times);

        let (start, end) = self.model.interval();
        self.events.emit(ControlEvent::IntervalChanged { start, end });
        self.events.emit(ControlEvent::CurrentTimeChanged {
            time: self.model.current_time(),
        });
    }

    /// Pixel span the widget laid out for the track this frame.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // === Model reads ===

    pub fn model(&self) -> &TimelineModel {
        &self.model
    }

    pub fn current_time(&self) -> f64 {
        self.model.current_time()
    }

    pub fn interval(&self) -> (f64, f64) {
        self.model.interval()
    }

    pub fn video_range(&self) -> (f64, f64) {
        self.model.video_range()
    }

    /// Time range the viewport shows (full range, or the interval when
    /// snapped).
    pub fn view_range(&self) -> (f64, f64) {
        self.mode.view_range(&self.model)
    }

    pub fn snap_mode(&self) -> SnapMode {
        self.mode.mode()
    }

    pub fn is_snapped(&self) -> bool {
        self.mode.is_snapped()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn active_drag_target(&self) -> Option<DragTarget> {
        self.drag.active_target()
    }

    // === Derived enablement ===

    /// True while any frozen context locks out direct interaction.
    fn frozen_out(&self) -> bool {
        self.freeze.is_frozen(FreezeContext::Playback) || self.freeze.is_frozen(FreezeContext::Other)
    }

    pub fn scrubber_enabled(&self) -> bool {
        self.toggles.scrubber && !self.frozen_out()
    }

    /// Markers are stored-enabled AND not hidden by snap mode or a freeze.
    pub fn markers_enabled(&self) -> bool {
        self.toggles.markers && !self.mode.is_snapped() && !self.frozen_out()
    }

    pub fn time_inputs_enabled(&self) -> bool {
        self.toggles.time_inputs && !self.frozen_out()
    }

    /// The interval start/end fields additionally go dark while snapped; the
    /// current-time field does not.
    pub fn interval_inputs_enabled(&self) -> bool {
        self.time_inputs_enabled() && !self.mode.is_snapped()
    }

    /// Snap toggle stays live while snapped so the user can always get back
    /// out, even if the interval has since grown to the full range.
    pub fn snap_toggle_enabled(&self) -> bool {
        self.toggles.snap_toggle
            && !self.frozen_out()
            && (ModeController::can_snap(&self.model) || self.mode.is_snapped())
    }

    /// Transport buttons, position rules applied on top of the stored toggle.
    /// While playing only the play button (acting as pause) is live; an
    /// automation freeze darkens the transport entirely.
    pub fn transport_buttons(&self) -> TransportEnablement {
        if !self.toggles.transport || self.freeze.is_frozen(FreezeContext::Other) {
            return transport_enablement(true, true);
        }
        if self.playback.is_playing() || self.freeze.is_frozen(FreezeContext::Playback) {
            return TransportEnablement {
                first: false,
                previous: false,
                play: true,
                next: false,
                last: false,
            };
        }
        transport_enablement(
            self.model.is_at_interval_start(),
            self.model.is_at_interval_end(),
        )
    }

    // === Pixel mapping ===

    pub fn time_to_pixel(&self, t: f64) -> i32 {
        let (start, end) = self.view_range();
        mapper::time_to_pixel(t, start, end, &self.viewport)
    }

    pub fn pixel_to_time(&self, px: i32) -> f64 {
        let (start, end) = self.view_range();
        mapper::pixel_to_time(px, start, end, &self.viewport)
    }

    pub fn scrubber_pixel(&self) -> i32 {
        self.time_to_pixel(self.model.current_time())
    }

    /// Marker pixel positions. Snapped markers sit pinned at the viewport
    /// extremes regardless of their time values.
    pub fn marker_pixels(&self) -> (i32, i32) {
        if self.mode.is_snapped() {
            return (self.viewport.origin_px, self.viewport.last_px());
        }
        let (start, end) = self.model.interval();
        (self.time_to_pixel(start), self.time_to_pixel(end))
    }

    // === Pointer interaction (widget side) ===

    /// Press on a draggable element. Refused when that element is disabled or
    /// another session is active.
    pub fn press(&mut self, target: DragTarget) -> bool {
        let allowed = match target {
            DragTarget::Scrubber => self.scrubber_enabled(),
            DragTarget::LeftMarker | DragTarget::RightMarker => self.markers_enabled(),
        };
        if !allowed {
            debug!("press on {target:?} refused, element disabled");
            return false;
        }
        self.drag.press(target, &self.model)
    }

    /// Pointer moved to `px` during a drag. Resolves the pixel through the
    /// current view range, optionally snaps the scrubber to the nearest frame
    /// timestamp, clamps per target, writes the model. No events are emitted
    /// until release.
    pub fn drag_to_pixel(&mut self, px: i32) -> Option<(f64, DragContact)> {
        let mut t = self.pixel_to_time(px);
        if self.frame_snapping && self.drag.active_target() == Some(DragTarget::Scrubber) {
            if let Some(ft) = self.model.nearest_frame_time(t) {
                t = ft;
            }
        }
        self.drag.move_to(t, &mut self.model)
    }

    /// Same as [`drag_to_pixel`](Self::drag_to_pixel) with a time value
    /// already in hand (keyboard stepping during a drag, tests).
    pub fn drag_to_time(&mut self, t: f64) -> Option<(f64, DragContact)> {
        self.drag.move_to(t, &mut self.model)
    }

    /// Normal end of a drag; the committed value is announced here.
    pub fn release_drag(&mut self) {
        let Some(session) = self.drag.release() else {
            return;
        };
        match session.target {
            DragTarget::Scrubber => self.events.emit(ControlEvent::CurrentTimeChanged {
                time: self.model.current_time(),
            }),
            DragTarget::LeftMarker | DragTarget::RightMarker => {
                let (start, end) = self.model.interval();
                self.events.emit(ControlEvent::IntervalChanged { start, end });
            }
        }
    }

    /// Forced end of a drag without the release notification. The model keeps
    /// whatever was last committed mid-drag.
    pub fn abort_drag(&mut self) {
        self.drag.abort();
    }

    // === Snap mode ===

    /// Flip the snap view. Returns the new snapped state, or None when the
    /// toggle was refused (disabled, or nothing to zoom into).
    pub fn toggle_snap(&mut self) -> Option<bool> {
        if !self.snap_toggle_enabled() {
            return None;
        }
        let changed = if self.mode.is_snapped() {
            self.mode.exit_snap()
        } else {
            self.mode.enter_snap(&self.model)
        };
        if !changed {
            return None;
        }
        let snapped = self.mode.is_snapped();
        self.events.emit(ControlEvent::SnapChanged { snapped });
        Some(snapped)
    }

    // === Transport (widget side) ===

    /// A transport button or its keyboard shortcut.
    pub fn transport(&mut self, kind: PlaybackRequest) {
        let buttons = self.transport_buttons();
        let allowed = match kind {
            PlaybackRequest::First => buttons.first,
            PlaybackRequest::Previous => buttons.previous,
            PlaybackRequest::PlayToggle => buttons.play,
            PlaybackRequest::Next => buttons.next,
            PlaybackRequest::Last => buttons.last,
        };
        if !allowed {
            return;
        }

        if kind == PlaybackRequest::PlayToggle {
            self.toggle_play();
            return;
        }

        let (start, end) = self.model.interval();
        let current = self.model.current_time();
        // With no frame timestamps the steps degrade to interval jumps.
        let target = match kind {
            PlaybackRequest::First => start,
            PlaybackRequest::Last => end,
            PlaybackRequest::Next => self
                .model
                .next_frame_time(current)
                .filter(|&t| t <= end)
                .unwrap_or(end),
            PlaybackRequest::Previous => self
                .model
                .prev_frame_time(current)
                .filter(|&t| t >= start)
                .unwrap_or(start),
            PlaybackRequest::PlayToggle => unreachable!(),
        };

        if self.playback.propose(target) {
            self.events
                .emit(ControlEvent::PlaybackRequested { kind, time: target });
        }
    }

    fn toggle_play(&mut self) {
        if self.playback.is_playing() {
            self.playback.pause();
            self.unfreeze(FreezeContext::Playback);
        } else {
            self.freeze(FreezeContext::Playback);
            self.playback.begin(Instant::now());
        }
        self.events.emit(ControlEvent::PlaybackRequested {
            kind: PlaybackRequest::PlayToggle,
            time: self.model.current_time(),
        });
    }

    /// Drive the play loop. Call once per frame from the widget or host loop.
    pub fn tick(&mut self, now: Instant) {
        match self.playback.tick(&self.model, now) {
            Tick::Idle => {}
            Tick::Advance(time) => self.events.emit(ControlEvent::PlaybackRequested {
                kind: PlaybackRequest::Next,
                time,
            }),
            Tick::Finished => self.finish_playback(),
        }
    }

    fn finish_playback(&mut self) {
        debug!("playback finished at interval end");
        self.playback.pause();
        self.unfreeze(FreezeContext::Playback);
    }

    // === Host API ===

    /// Programmatic scrubber move. Commits (clamped to the interval) and
    /// announces immediately; the ack protocol only covers transport steps.
    pub fn request_time_change(&mut self, t: f64) -> f64 {
        let committed = self.model.set_current_time(t);
        self.events
            .emit(ControlEvent::CurrentTimeChanged { time: committed });
        committed
    }

    /// Programmatic interval change. Unlike a marker drag, the interval wins
    /// here: the current time is pulled inside the new bounds if needed.
    pub fn request_interval_change(&mut self, a: f64, b: f64) -> (f64, f64) {
        let before = self.model.current_time();
        let (start, end) = self.model.set_interval(a, b);
        self.events.emit(ControlEvent::IntervalChanged { start, end });
        if self.model.current_time() != before {
            self.events.emit(ControlEvent::CurrentTimeChanged {
                time: self.model.current_time(),
            });
        }
        (start, end)
    }

    /// Host produced the frame for the outstanding proposal; commit it.
    pub fn notify_frame_ready(&mut self) {
        let Some(t) = self.playback.acknowledge() else {
            return;
        };
        let committed = self.model.set_current_time(t);
        self.events
            .emit(ControlEvent::CurrentTimeChanged { time: committed });
        if self.playback.is_playing() && self.model.is_at_interval_end() {
            self.finish_playback();
        }
    }

    /// Host failed mid-interaction. Ends any drag without its release
    /// notification, drops any pending proposal and leaves playback paused at
    /// the last committed time.
    pub fn notify_exception(&mut self) {
        warn!("host exception, aborting active interaction");
        self.drag.abort();
        let was_playing = self.playback.is_playing();
        self.playback.abort();
        if was_playing {
            self.unfreeze(FreezeContext::Playback);
        }
    }

    // === Freeze ===

    /// Disable interaction for a context, snapshotting the stored toggles.
    /// Any drag in flight is force-released (no release event); the model
    /// keeps its last mid-drag commit. The frozen context acts as an overlay
    /// in the enablement accessors: a playback freeze keeps the transport
    /// live (pause must stay reachable) while an external automation freeze
    /// darkens everything and forces the snapped view so the automation works
    /// against the interval it was given.
    pub fn freeze(&mut self, context: FreezeContext) -> bool {
        self.drag.abort();
        if !self.freeze.freeze(context, self.toggles) {
            return false;
        }
        if context == FreezeContext::Other && self.mode.enter_snap(&self.model) {
            self.events.emit(ControlEvent::SnapChanged { snapped: true });
        }
        true
    }

    /// Restore the toggles the context's freeze recorded. No-op when that
    /// context is not frozen.
    pub fn unfreeze(&mut self, context: FreezeContext) -> bool {
        match self.freeze.unfreeze(context) {
            Some(restored) => {
                self.toggles = restored;
                true
            }
            None => false,
        }
    }

    pub fn is_frozen(&self, context: FreezeContext) -> bool {
        self.freeze.is_frozen(context)
    }
}
