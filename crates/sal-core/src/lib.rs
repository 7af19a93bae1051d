//! Core functionality for the salary dashboard
//!
//! This crate provides the record model, the filter store, the aggregation
//! engine and the command dispatcher that keeps every view in sync.

pub mod aggregate;
pub mod dispatch;
pub mod drilldown;
pub mod events;
pub mod filter;
pub mod record;
pub mod reference;
pub mod rotation;
pub mod state;

// Re-export commonly used types
pub use dispatch::{Command, DispatchOutcome, Dispatcher};
pub use drilldown::{Drilldown, DrilldownScope, DrilldownSummary};
pub use filter::{FilterState, FilterStore, FilterSubscriber};
pub use record::{CategoryField, ExperienceLevel, Record};
pub use reference::CountryCodeMap;
pub use rotation::GlobeRotation;
pub use state::{AppState, DashboardSnapshot, ViewMode};
pub use data::DataSource;

pub mod data {
    use crate::record::Record;

    /// Anything that can produce the dashboard's records
    #[async_trait::async_trait]
    pub trait DataSource: Send + Sync {
        /// Load every valid record
        async fn load_records(&self) -> anyhow::Result<Vec<Record>>;

        /// Get the source name/path
        fn source_name(&self) -> &str;
    }
}
