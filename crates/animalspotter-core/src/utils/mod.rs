//! Utility functions for displaying sightings.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_coordinates, format_observed_at, sorted_names};
