//! Timeline widget - scrubber track, interval markers, transport bar
//!
//! Horizontal track with a draggable playhead and two interval handles

mod timeline;
mod timeline_helpers;
mod timeline_ui;

pub use timeline::{TimelineConfig, TimelineState};
pub use timeline_ui::render_timeline;
