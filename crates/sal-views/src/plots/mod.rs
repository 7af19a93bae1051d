//! Plot view implementations

// Dashboard views
pub mod globe;
pub mod histogram;
pub mod trend;

// Drill-down charts
pub mod job_bars;
pub mod pie;

pub mod projection;

// Utilities
pub mod utils;

// Re-exports
pub use globe::GlobeView;
pub use histogram::HistogramView;
pub use job_bars::JobBarsChart;
pub use pie::{LabelFormat, LegendPosition, PieChart, PieChartConfig};
pub use trend::TrendView;
