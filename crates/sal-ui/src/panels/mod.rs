//! Control panels around the views

mod filter_panel;

pub use filter_panel::{range_label, FilterPanel};
