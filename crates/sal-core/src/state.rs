//! Application state management

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, CountryStats, SalaryBin, YearPoint};
use crate::drilldown::Drilldown;
use crate::filter::{FilterState, FilterStore};
use crate::record::Record;
use crate::reference::CountryCodeMap;

/// Which view controllers are on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Globe choropleth next to the salary histogram
    #[default]
    MapHistogram,
    /// Salary trend line chart
    Trend,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::MapHistogram => ViewMode::Trend,
            ViewMode::Trend => ViewMode::MapHistogram,
        }
    }

    /// Caption of the button that switches away from this mode
    pub fn toggle_label(self) -> &'static str {
        match self {
            ViewMode::MapHistogram => "Show Trend View",
            ViewMode::Trend => "Show Map View",
        }
    }
}

/// The dashboard's mutable state. Owned by the dispatcher; everything else
/// reads [`DashboardSnapshot`]s.
pub struct AppState {
    /// Loaded dataset, never mutated after ingestion
    pub dataset: Arc<[Record]>,

    /// Name of the file the dataset came from
    pub source_name: String,

    /// Salary range and year selection
    pub filter: Arc<FilterStore>,

    /// Location normalization table
    pub country_map: CountryCodeMap,

    /// Active view controllers
    pub view_mode: ViewMode,

    /// Open drill-down modal, if any
    pub drilldown: Option<Arc<Drilldown>>,
}

impl AppState {
    /// Create state for a dataset with default filters (full range, every year)
    pub fn new(source_name: impl Into<String>, records: Vec<Record>) -> Self {
        let dataset: Arc<[Record]> = records.into();
        let filter = FilterStore::new(dataset.iter().map(|r| r.work_year));

        Self {
            dataset,
            source_name: source_name.into(),
            filter: Arc::new(filter),
            country_map: CountryCodeMap::builtin().clone(),
            view_mode: ViewMode::default(),
            drilldown: None,
        }
    }

    /// Use a different location normalization table
    pub fn with_country_map(mut self, country_map: CountryCodeMap) -> Self {
        self.country_map = country_map;
        self
    }

    /// Run the aggregation engine over the current state
    pub fn snapshot(&self) -> DashboardSnapshot {
        let filter = self.filter.state();
        let filtered = aggregate::filter_records(&self.dataset, &filter);

        DashboardSnapshot {
            country_stats: aggregate::country_stats(&filtered, &self.country_map),
            bins: aggregate::histogram_bins(&filtered),
            year_series: aggregate::year_series(&filtered),
            filtered: filtered.into(),
            filter,
            available_years: self.filter.available_years().to_vec(),
            total_records: self.dataset.len(),
            view_mode: self.view_mode,
            drilldown: self.drilldown.clone(),
        }
    }
}

/// Immutable, fully derived view of the state for one render cycle
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub filter: FilterState,
    pub available_years: Vec<i32>,
    pub total_records: usize,
    pub view_mode: ViewMode,
    /// Records matching the filter
    pub filtered: Arc<[Record]>,
    pub country_stats: CountryStats,
    pub bins: Vec<SalaryBin>,
    pub year_series: Vec<YearPoint>,
    pub drilldown: Option<Arc<Drilldown>>,
}

impl DashboardSnapshot {
    /// Largest stacked bin total, at least 1 so empty histograms keep an axis
    pub fn max_bin_total(&self) -> usize {
        self.bins.iter().map(SalaryBin::total).max().unwrap_or(0).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ExperienceLevel;

    #[test]
    fn test_view_mode_toggle() {
        let mode = ViewMode::default();
        assert_eq!(mode, ViewMode::MapHistogram);
        assert_eq!(mode.toggled(), ViewMode::Trend);
        assert_eq!(mode.toggled().toggled(), ViewMode::MapHistogram);
        assert_eq!(mode.toggle_label(), "Show Trend View");
    }

    #[test]
    fn test_snapshot_aggregates_filtered_view() {
        let state = AppState::new(
            "test.csv",
            vec![
                Record::new(50_000.0, 2021, ExperienceLevel::Entry, "US"),
                Record::new(150_000.0, 2022, ExperienceLevel::Senior, "FR"),
            ],
        );
        state.filter.toggle_year(2022);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.total_records, 2);
        assert_eq!(snapshot.filtered.len(), 1);
        assert_eq!(snapshot.available_years, vec![2021, 2022]);
        assert!(snapshot.country_stats.get("250").is_none());
        assert_eq!(snapshot.bins[2].count(ExperienceLevel::Entry), 1);
        assert_eq!(snapshot.year_series.len(), 1);
        assert_eq!(snapshot.max_bin_total(), 1);
    }
}
