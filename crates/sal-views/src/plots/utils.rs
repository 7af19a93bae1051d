//! Utilities for plot views

pub mod colors;
pub mod format;

// Re-export commonly used items
pub use colors::{category_color, level_color, salary_color, viridis_color, ALL_LEVELS_COLOR, NO_DATA_COLOR};
pub use format::{format_currency, format_k, format_percent};
