//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Per-theme color palettes
//! - `tabs`: Dashboard tab content (overview, progress, exercise, chat, report)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
