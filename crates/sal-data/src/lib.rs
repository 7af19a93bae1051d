//! Data loading and configuration for the salary dashboard

pub mod config;
pub mod schema;
pub mod sources;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use config::{DashboardConfig, NullConfig, ThemePreference};
pub use schema::{ColumnIndex, REQUIRED_COLUMNS};
pub use sources::{CountryShape, LoadReport, LoadedDataset, SalaryCsvSource, SkippedRow, WorldGeometry};

/// Errors that can occur while loading data or configuration
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<geojson::Error> for DataError {
    fn from(error: geojson::Error) -> Self {
        DataError::GeoJson(error.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        DataError::InvalidConfig(error.to_string())
    }
}
