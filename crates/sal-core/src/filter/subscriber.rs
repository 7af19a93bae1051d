//! Filter subscriber trait

use super::FilterState;

/// Trait for components that need to respond to filter changes
pub trait FilterSubscriber: Send + Sync {
    /// Called after every mutation of the filter store
    fn on_filter_change(&self, state: &FilterState);
}
