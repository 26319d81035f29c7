//! Core control engine - model, mapping, drag, snap, freeze, playback.
//!
//! These modules hold all the timeline semantics, independent of UI.

pub mod control;
pub mod drag;
pub mod events;
pub mod freeze;
pub mod mapper;
pub mod mode;
pub mod model;
pub mod playback;

// Re-exports for convenience
pub use control::{ControlOptions, TimelineControl};
pub use drag::{DragContact, DragController, DragTarget};
pub use events::{ControlEvent, ControlEventSender, PlaybackRequest};
pub use freeze::{ControlToggles, FreezeContext, FreezeStack};
pub use mapper::{Viewport, pixel_to_time, time_to_pixel};
pub use mode::{ModeController, SnapMode};
pub use model::TimelineModel;
pub use playback::{PlaybackController, PlaybackState, TransportEnablement};
