//! Dashboard tab content. Each module exposes a `render` function for the
//! main content area.

pub mod chat;
pub mod exercise;
pub mod overview;
pub mod progress;
pub mod report;
