//! SCRUBLINE - Interactive timeline scrubber control
//!
//! Re-exports all modules for use by binary targets.

// Core control engine (model, mapping, drag, snap, freeze, playback)
pub mod core;

// App modules
pub mod cli;
pub mod widgets;

// Re-export commonly used types from core
pub use crate::core::control::{ControlOptions, TimelineControl};
pub use crate::core::events::{ControlEvent, ControlEventSender, PlaybackRequest};
pub use crate::core::mapper::Viewport;
pub use crate::core::model::TimelineModel;
