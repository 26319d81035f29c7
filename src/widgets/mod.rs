//! UI Widgets - modular, reusable UI components
//!
//! Each widget is self-contained and talks to the core through
//! `TimelineControl`.

pub mod timeline;
