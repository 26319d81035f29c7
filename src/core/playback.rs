//! Playback: transport enablement and the paced play loop.
//!
//! Enablement is a pure function of where the current time sits relative to
//! the interval bounds; it is recomputed after every committed time change.
//!
//! # Play loop
//!
//! The loop is cooperative: `tick()` is called from the host's frame loop and
//! proposes at most one advance per call, then waits for the host's explicit
//! frame-ready acknowledgment before the next one. Pacing follows the frame
//! timestamps themselves (one timeline second per wall-clock second), the
//! same advance-when-due pattern as a fixed-fps player update loop.
//!
//! A host exception aborts the loop; the control stays paused at the last
//! successfully committed time.

use std::time::Instant;

use log::trace;

use super::model::TimelineModel;

/// Playback state of the control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Per-button enablement of the transport bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportEnablement {
    pub first: bool,
    pub previous: bool,
    pub play: bool,
    pub next: bool,
    pub last: bool,
}

impl Default for TransportEnablement {
    fn default() -> Self {
        transport_enablement(true, true)
    }
}

/// Derive transport enablement from the time-equality flags.
///
/// Zero-length interval disables everything; at the end the forward buttons
/// (and play) go dark; at the start the backward buttons do.
pub fn transport_enablement(at_start: bool, at_end: bool) -> TransportEnablement {
    if at_start && at_end {
        TransportEnablement {
            first: false,
            previous: false,
            play: false,
            next: false,
            last: false,
        }
    } else if at_end {
        TransportEnablement {
            first: true,
            previous: true,
            play: false,
            next: false,
            last: false,
        }
    } else if at_start {
        TransportEnablement {
            first: false,
            previous: false,
            play: true,
            next: true,
            last: true,
        }
    } else {
        TransportEnablement {
            first: true,
            previous: true,
            play: true,
            next: true,
            last: true,
        }
    }
}

/// Outcome of one play-loop tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// Nothing due yet (not playing, awaiting ack, or between frames).
    Idle,
    /// A new frame time was proposed; commit it once the host acknowledges.
    Advance(f64),
    /// No frames left inside the interval - playback is done.
    Finished,
}

/// Play-loop driver. Also owns the pending-commit slot shared with the
/// single-step transport path, so a step and the loop can never race on one
/// acknowledgment.
#[derive(Debug, Default)]
pub struct PlaybackController {
    state: PlaybackState,
    pending_time: Option<f64>,
    last_advance: Option<Instant>,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// True while a proposed time waits for the host's frame-ready signal.
    pub fn awaiting_ack(&self) -> bool {
        self.pending_time.is_some()
    }

    /// Enter the play loop.
    pub fn begin(&mut self, now: Instant) {
        trace!("playback begin");
        self.state = PlaybackState::Playing;
        self.last_advance = Some(now);
    }

    /// Leave the play loop; current time stays wherever it was last
    /// committed. Any un-acknowledged proposal is dropped.
    pub fn pause(&mut self) {
        trace!("playback pause");
        self.state = PlaybackState::Paused;
        self.pending_time = None;
        self.last_advance = None;
    }

    /// Host exception: same shape as pause, reached from the failure path.
    pub fn abort(&mut self) {
        trace!("playback aborted by host exception");
        self.pause();
    }

    /// Full reset (model replacement).
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.pending_time = None;
        self.last_advance = None;
    }

    /// Propose a time for commit-after-ack. Refused while an earlier proposal
    /// is still outstanding (re-entrant guard for both steps and the loop).
    pub fn propose(&mut self, t: f64) -> bool {
        if self.pending_time.is_some() {
            trace!("proposal for {t} ignored, still awaiting ack");
            return false;
        }
        self.pending_time = Some(t);
        true
    }

    /// Host frame-ready: take the proposal for the caller to commit.
    pub fn acknowledge(&mut self) -> Option<f64> {
        self.pending_time.take()
    }

    /// Advance the play loop if a frame is due.
    pub fn tick(&mut self, model: &TimelineModel, now: Instant) -> Tick {
        if self.state != PlaybackState::Playing || self.pending_time.is_some() {
            return Tick::Idle;
        }

        let current = model.current_time();
        let interval_end = model.interval_end();

        let next = model
            .next_frame_time(current)
            .filter(|&t| t <= interval_end);

        let Some(next) = next else {
            // Past the last frame: one final hop to the interval end, then done.
            if current < interval_end {
                self.pending_time = Some(interval_end);
                self.last_advance = Some(now);
                return Tick::Advance(interval_end);
            }
            return Tick::Finished;
        };

        let due = next - current;
        let elapsed = self
            .last_advance
            .map(|t0| now.duration_since(t0).as_secs_f64())
            .unwrap_or(f64::MAX);

        if elapsed >= due {
            self.pending_time = Some(next);
            self.last_advance = Some(now);
            Tick::Advance(next)
        } else {
            Tick::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn model() -> TimelineModel {
        TimelineModel::new(0.0, 4.0, vec![0.0, 1.0, 2.0, 3.0, 4.0])
    }

    #[test]
    fn test_enablement_table() {
        // Degenerate zero-length interval: everything dark.
        let e = transport_enablement(true, true);
        assert!(!e.first && !e.previous && !e.play && !e.next && !e.last);

        // At end: forward buttons and play dark.
        let e = transport_enablement(false, true);
        assert!(e.first && e.previous);
        assert!(!e.play && !e.next && !e.last);

        // At start: backward buttons dark.
        let e = transport_enablement(true, false);
        assert!(!e.first && !e.previous);
        assert!(e.play && e.next && e.last);

        // Mid-interval: everything live.
        let e = transport_enablement(false, false);
        assert!(e.first && e.previous && e.play && e.next && e.last);
    }

    #[test]
    fn test_tick_waits_for_frame_duration() {
        let mut pb = PlaybackController::new();
        let m = model();
        let t0 = Instant::now();
        pb.begin(t0);

        // One frame is a full second here; nothing due after 10ms.
        assert_eq!(pb.tick(&m, t0 + Duration::from_millis(10)), Tick::Idle);
        assert_eq!(
            pb.tick(&m, t0 + Duration::from_millis(1100)),
            Tick::Advance(1.0)
        );
    }

    #[test]
    fn test_tick_idles_until_ack() {
        let mut pb = PlaybackController::new();
        let mut m = model();
        let t0 = Instant::now();
        pb.begin(t0);

        let later = t0 + Duration::from_secs(2);
        assert_eq!(pb.tick(&m, later), Tick::Advance(1.0));
        assert!(pb.awaiting_ack());
        // No second proposal while the first is outstanding.
        assert_eq!(pb.tick(&m, later + Duration::from_secs(5)), Tick::Idle);

        let committed = pb.acknowledge().unwrap();
        m.set_current_time(committed);
        assert_eq!(
            pb.tick(&m, later + Duration::from_secs(5)),
            Tick::Advance(2.0)
        );
    }

    #[test]
    fn test_finishes_at_interval_end() {
        let mut pb = PlaybackController::new();
        let mut m = model();
        m.set_current_time(4.0);
        let t0 = Instant::now();
        pb.begin(t0);
        assert_eq!(pb.tick(&m, t0 + Duration::from_secs(10)), Tick::Finished);
    }

    #[test]
    fn test_final_hop_when_last_frame_short_of_end() {
        // Frames stop at 3.0 but the interval runs to 3.5.
        let mut m = TimelineModel::new(0.0, 10.0, vec![0.0, 1.0, 2.0, 3.0]);
        m.set_interval(0.0, 3.5);
        m.set_current_time(3.0);

        let mut pb = PlaybackController::new();
        let t0 = Instant::now();
        pb.begin(t0);
        assert_eq!(
            pb.tick(&m, t0 + Duration::from_secs(10)),
            Tick::Advance(3.5)
        );
        let committed = pb.acknowledge().unwrap();
        m.set_current_time(committed);
        assert_eq!(pb.tick(&m, t0 + Duration::from_secs(20)), Tick::Finished);
    }

    #[test]
    fn test_pause_drops_pending_proposal() {
        let mut pb = PlaybackController::new();
        let m = model();
        let t0 = Instant::now();
        pb.begin(t0);
        assert!(matches!(
            pb.tick(&m, t0 + Duration::from_secs(2)),
            Tick::Advance(_)
        ));
        pb.pause();
        assert!(!pb.awaiting_ack());
        assert_eq!(pb.acknowledge(), None);
        assert_eq!(pb.state(), PlaybackState::Paused);
    }
}
