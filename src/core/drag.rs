//! Drag session state machine for the three draggable elements.
//!
//! One session at a time: a press on a second target while another session is
//! active is ignored, modeling single-pointer input. A session exists only
//! between press and release; it captures the pre-drag value so an aborted
//! session (host failure mid-drag) can report what it started from without
//! mutating anything further.
//!
//! Target-specific clamping happens here, before the model is written:
//!
//! - Scrubber: `[interval_start, interval_end]`
//! - Left marker: `[video_start, current_time]` (never crosses the scrubber)
//! - Right marker: `[current_time, video_end]`
//!
//! Each move reports a [`DragContact`] classification so the widget can
//! special-case "snapped to boundary" visuals. Contact is informational only;
//! it is never an error.

use log::{debug, trace};

use super::model::TimelineModel;

/// Which element a drag session is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Scrubber,
    LeftMarker,
    RightMarker,
}

/// Where the clamped value landed relative to the target's legal range.
///
/// The bounds mean different things per target: for the scrubber they are the
/// interval ends; for a marker the lower/upper bound is the video edge or the
/// scrubber depending on side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragContact {
    /// Strictly inside the legal range.
    Free,
    /// Clamped at the lower bound.
    AtLower,
    /// Clamped at the upper bound.
    AtUpper,
}

impl DragContact {
    /// True when a marker is pinned against the scrubber.
    pub fn at_scrubber(self, target: DragTarget) -> bool {
        matches!(
            (target, self),
            (DragTarget::LeftMarker, DragContact::AtUpper)
                | (DragTarget::RightMarker, DragContact::AtLower)
        )
    }
}

/// Transient state of an in-progress pointer interaction.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    pub target: DragTarget,
    /// Value of the target when the session started.
    pub origin_value: f64,
}

/// Press -> move -> release driver. `Idle` is `active == None`.
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_target(&self) -> Option<DragTarget> {
        self.active.map(|s| s.target)
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Start a session. Returns false if ignored: another target is already
    /// dragging, or this is a re-entrant press on the same target.
    pub fn press(&mut self, target: DragTarget, model: &TimelineModel) -> bool {
        if self.active.is_some() {
            trace!("press on {target:?} ignored, {:?} already dragging", self.active_target());
            return false;
        }

        let origin_value = match target {
            DragTarget::Scrubber => model.current_time(),
            DragTarget::LeftMarker => model.interval_start(),
            DragTarget::RightMarker => model.interval_end(),
        };
        debug!("drag press: {target:?} at {origin_value}");
        self.active = Some(DragSession {
            target,
            origin_value,
        });
        true
    }

    /// Move the active target to time `t` (already resolved from the pointer
    /// pixel). Clamps, writes the model, and classifies the contact.
    /// Returns None when no session is active.
    pub fn move_to(&mut self, t: f64, model: &mut TimelineModel) -> Option<(f64, DragContact)> {
        let session = self.active?;

        let (committed, lower, upper) = match session.target {
            DragTarget::Scrubber => {
                let (lo, hi) = model.interval();
                (model.set_current_time(t), lo, hi)
            }
            DragTarget::LeftMarker => {
                let lo = model.video_start();
                let hi = model.current_time();
                (model.set_interval_start(t), lo, hi)
            }
            DragTarget::RightMarker => {
                let lo = model.current_time();
                let hi = model.video_end();
                (model.set_interval_end(t), lo, hi)
            }
        };

        // Bound values are assigned by clamping, so equality is exact.
        let contact = if committed == lower {
            DragContact::AtLower
        } else if committed == upper {
            DragContact::AtUpper
        } else {
            DragContact::Free
        };
        Some((committed, contact))
    }

    /// End the session normally. Returns the session for release bookkeeping.
    pub fn release(&mut self) -> Option<DragSession> {
        let session = self.active.take();
        if let Some(s) = session {
            debug!("drag release: {:?}", s.target);
        }
        session
    }

    /// Forced release on abnormal termination (host failure mid-drag).
    /// Discards the session without any further model mutation.
    pub fn abort(&mut self) -> Option<DragSession> {
        let session = self.active.take();
        if let Some(s) = session {
            debug!("drag aborted: {:?} (origin {})", s.target, s.origin_value);
        }
        session
    }
}
