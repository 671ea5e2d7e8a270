//! Utility functions for string formatting and manipulation.

pub mod format;

pub use format::{capitalize_first, format_date, format_time, truncate_string};
