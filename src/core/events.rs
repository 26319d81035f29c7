//! Notifications emitted to the host application.
//!
//! The control owns no frame data; the host reacts to these events by seeking
//! its decoder, refreshing label panels, etc. Events are carried over a
//! crossbeam channel so the host can drain them once per frame in its main
//! loop. Send errors are ignored - a dropped receiver just means nobody is
//! listening.

use crossbeam_channel::{Receiver, Sender, unbounded};

/// Transport action requested by the user (buttons or keyboard).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackRequest {
    First,
    Previous,
    PlayToggle,
    Next,
    Last,
}

/// Control state change notifications.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// Committed scrubber position changed.
    CurrentTimeChanged { time: f64 },

    /// Labeling interval bounds changed.
    IntervalChanged { start: f64, end: f64 },

    /// The user asked for a transport action. `time` is the proposed target;
    /// the host produces that frame, then acknowledges with
    /// `notify_frame_ready` before the control commits it.
    PlaybackRequested { kind: PlaybackRequest, time: f64 },

    /// Snap (zoom-to-interval) view toggled.
    SnapChanged { snapped: bool },
}

/// Event sender handle held by the control.
///
/// `dummy()` makes a disconnected sender for tests and headless use.
#[derive(Clone, Debug, Default)]
pub struct ControlEventSender {
    sender: Option<Sender<ControlEvent>>,
}

impl ControlEventSender {
    pub fn new(sender: Sender<ControlEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// No-op sender (for tests or when events are not needed).
    pub fn dummy() -> Self {
        Self { sender: None }
    }

    /// Connected sender + receiver pair.
    pub fn channel() -> (Self, Receiver<ControlEvent>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }

    /// Emit event (silent if no receiver).
    pub fn emit(&self, event: ControlEvent) {
        if let Some(ref tx) = self.sender {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (sender, rx) = ControlEventSender::channel();
        sender.emit(ControlEvent::CurrentTimeChanged { time: 1.0 });
        sender.emit(ControlEvent::IntervalChanged { start: 0.0, end: 2.0 });

        assert_eq!(rx.try_recv(), Ok(ControlEvent::CurrentTimeChanged { time: 1.0 }));
        assert_eq!(
            rx.try_recv(),
            Ok(ControlEvent::IntervalChanged { start: 0.0, end: 2.0 })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dummy_sender_is_silent() {
        let sender = ControlEventSender::dummy();
        sender.emit(ControlEvent::PlaybackRequested {
            kind: PlaybackRequest::Next,
            time: 0.0,
        });
    }
}
