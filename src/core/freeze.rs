//! Freeze/unfreeze: two independent saved-enablement slots.
//!
//! Playback freezes interaction while the play loop runs; external automation
//! ("other") freezes it while an algorithm drives the control. The two
//! contexts never read or write each other's snapshot, so they compose:
//! `freeze(Other)` while playback is frozen leaves playback's restoration
//! intact when `unfreeze(Playback)` runs later.
//!
//! A freeze records the pre-state only if that context is not already frozen
//! (idempotent); unfreeze restores exactly what that context recorded, and
//! unfreeze without a prior freeze is a no-op.

use log::debug;

/// Which class of caller owns a freeze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreezeContext {
    Playback,
    Other,
}

/// Enabled/disabled state of every control class the freeze machinery covers.
///
/// These are the *stored* switches. Mode- and freeze-dependent rules (markers
/// disabled while snapped, everything locked while a context is frozen,
/// transport gated by at-start/at-end) are derived on top of them by the
/// control, so restoring a snapshot can never resurrect a control the current
/// mode or the other context forbids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlToggles {
    pub markers: bool,
    pub time_inputs: bool,
    pub snap_toggle: bool,
    pub transport: bool,
    pub scrubber: bool,
}

impl Default for ControlToggles {
    fn default() -> Self {
        Self {
            markers: true,
            time_inputs: true,
            snap_toggle: true,
            transport: true,
            scrubber: true,
        }
    }
}

/// The two snapshot slots.
#[derive(Debug, Default)]
pub struct FreezeStack {
    playback: Option<ControlToggles>,
    other: Option<ControlToggles>,
}

impl FreezeStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, context: FreezeContext) -> &mut Option<ControlToggles> {
        match context {
            FreezeContext::Playback => &mut self.playback,
            FreezeContext::Other => &mut self.other,
        }
    }

    pub fn is_frozen(&self, context: FreezeContext) -> bool {
        match context {
            FreezeContext::Playback => self.playback.is_some(),
            FreezeContext::Other => self.other.is_some(),
        }
    }

    /// Record `current` into the context's slot. Returns true if the snapshot
    /// was taken, false if that context was already frozen (second freeze is
    /// a no-op, preserving the original pre-state).
    pub fn freeze(&mut self, context: FreezeContext, current: ControlToggles) -> bool {
        let slot = self.slot(context);
        if slot.is_some() {
            debug!("freeze({context:?}) ignored, already frozen");
            return false;
        }
        debug!("freeze({context:?}): snapshot {current:?}");
        *slot = Some(current);
        true
    }

    /// Take the context's snapshot, leaving the slot empty. Returns None when
    /// the context was never frozen.
    pub fn unfreeze(&mut self, context: FreezeContext) -> Option<ControlToggles> {
        let restored = self.slot(context).take();
        if restored.is_some() {
            debug!("unfreeze({context:?})");
        }
        restored
    }

    /// Drop both snapshots (model replacement).
    pub fn clear(&mut self) {
        self.playback = None;
        self.other = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partly_disabled() -> ControlToggles {
        ControlToggles {
            markers: false,
            ..ControlToggles::default()
        }
    }

    #[test]
    fn test_freeze_unfreeze_restores_snapshot() {
        let mut stack = FreezeStack::new();
        let snap = partly_disabled();
        assert!(stack.freeze(FreezeContext::Playback, snap));
        assert!(stack.is_frozen(FreezeContext::Playback));
        assert_eq!(stack.unfreeze(FreezeContext::Playback), Some(snap));
        assert!(!stack.is_frozen(FreezeContext::Playback));
    }

    #[test]
    fn test_double_freeze_keeps_first_snapshot() {
        let mut stack = FreezeStack::new();
        let first = ControlToggles::default();
        assert!(stack.freeze(FreezeContext::Playback, first));
        // Second freeze in the same context must not clobber the pre-state.
        assert!(!stack.freeze(FreezeContext::Playback, partly_disabled()));
        assert_eq!(stack.unfreeze(FreezeContext::Playback), Some(first));
    }

    #[test]
    fn test_unfreeze_without_freeze_is_noop() {
        let mut stack = FreezeStack::new();
        assert_eq!(stack.unfreeze(FreezeContext::Other), None);
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut stack = FreezeStack::new();
        let playback_snap = ControlToggles::default();
        let other_snap = partly_disabled();

        assert!(stack.freeze(FreezeContext::Playback, playback_snap));
        assert!(stack.freeze(FreezeContext::Other, other_snap));

        // Releasing playback does not consult or disturb the other slot.
        assert_eq!(stack.unfreeze(FreezeContext::Playback), Some(playback_snap));
        assert!(stack.is_frozen(FreezeContext::Other));
        assert_eq!(stack.unfreeze(FreezeContext::Other), Some(other_snap));
    }
}
