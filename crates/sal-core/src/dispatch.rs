//! Interaction dispatcher
//!
//! UI gestures become typed [`Command`]s. The dispatcher applies them to the
//! [`AppState`], publishes a `RenderNeeded` event for every change and hands
//! out immutable snapshots that are recomputed after each change.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::aggregate;
use crate::drilldown::{Drilldown, DrilldownScope};
use crate::events::events::{
    DatasetLoaded, DrilldownClosed, DrilldownOpened, RenderNeeded, RenderReason, ViewModeChanged,
};
use crate::events::{handler_from_fn, EventBus};
use crate::filter::{FilterState, FilterSubscriber};
use crate::record::Record;
use crate::state::{AppState, DashboardSnapshot, ViewMode};

/// A state transition requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Salary slider moved (values may arrive swapped)
    SetSalaryRange { min: f64, max: f64 },
    /// Year checkbox toggled
    ToggleYear(i32),
    /// Replace the year selection at once ("All" / "None")
    SetYears(Vec<i32>),
    /// Back to the full range and every year
    ResetFilters,
    /// Switch between map/histogram and trend views
    ToggleView,
    /// Histogram bar clicked, by bin index
    OpenBinDrilldown(usize),
    /// Country clicked on the globe, by normalized code
    OpenCountryDrilldown { code: String, name: String },
    /// Modal dismissed
    CloseDrilldown,
    /// A new dataset finished loading
    ReplaceDataset { source_name: String, records: Vec<Record> },
}

/// Result of dispatching one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State changed and views must re-render
    Applied,
    /// Nothing to do (e.g. a click on a country without data)
    Ignored,
}

/// Publishes `RenderNeeded` whenever the filter store changes
struct FilterRenderTrigger {
    event_bus: Arc<EventBus>,
}

impl FilterSubscriber for FilterRenderTrigger {
    fn on_filter_change(&self, _state: &FilterState) {
        self.event_bus.publish(RenderNeeded { reason: RenderReason::FilterChanged });
    }
}

/// Applies commands to the application state
pub struct Dispatcher {
    state: AppState,
    event_bus: Arc<EventBus>,
    dirty: Arc<AtomicBool>,
    snapshot: Mutex<Option<Arc<DashboardSnapshot>>>,
    filter_trigger: Arc<FilterRenderTrigger>,
}

impl Dispatcher {
    /// Create a dispatcher owning `state`
    pub fn new(state: AppState) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let dirty = Arc::new(AtomicBool::new(true));

        let flag = dirty.clone();
        event_bus.subscribe::<RenderNeeded>(handler_from_fn(move |_| {
            flag.store(true, Ordering::SeqCst);
        }));

        let filter_trigger = Arc::new(FilterRenderTrigger { event_bus: event_bus.clone() });
        state.filter.add_subscriber(filter_trigger.clone());

        Self {
            state,
            event_bus,
            dirty,
            snapshot: Mutex::new(None),
            filter_trigger,
        }
    }

    /// Event bus for additional subscribers (logging, repaint requests)
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Whether a change happened since the last snapshot
    pub fn needs_render(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Current snapshot, re-aggregated if anything changed since the last call
    pub fn snapshot(&self) -> Arc<DashboardSnapshot> {
        let mut cached = self.snapshot.lock();
        if self.dirty.swap(false, Ordering::SeqCst) || cached.is_none() {
            *cached = Some(Arc::new(self.state.snapshot()));
        }
        cached.clone().unwrap_or_else(|| Arc::new(self.state.snapshot()))
    }

    /// Apply one command
    pub fn dispatch(&mut self, command: Command) -> DispatchOutcome {
        debug!(?command, "dispatch");

        match command {
            Command::SetSalaryRange { min, max } => {
                // The store clamps, reorders and publishes the render request
                self.state.filter.set_salary_range(min, max);
                DispatchOutcome::Applied
            }
            Command::ToggleYear(year) => {
                self.state.filter.toggle_year(year);
                DispatchOutcome::Applied
            }
            Command::SetYears(years) => {
                self.state.filter.set_years(years);
                DispatchOutcome::Applied
            }
            Command::ResetFilters => {
                self.state.filter.reset();
                DispatchOutcome::Applied
            }
            Command::ToggleView => {
                self.state.view_mode = self.state.view_mode.toggled();
                self.event_bus.publish(ViewModeChanged { mode: self.state.view_mode });
                self.request_render(RenderReason::ViewModeChanged);
                DispatchOutcome::Applied
            }
            Command::OpenBinDrilldown(index) => self.open_bin_drilldown(index),
            Command::OpenCountryDrilldown { code, name } => self.open_country_drilldown(code, name),
            Command::CloseDrilldown => {
                if self.state.drilldown.take().is_none() {
                    return DispatchOutcome::Ignored;
                }
                self.event_bus.publish(DrilldownClosed);
                self.request_render(RenderReason::DrilldownChanged);
                DispatchOutcome::Applied
            }
            Command::ReplaceDataset { source_name, records } => {
                self.replace_dataset(source_name, records);
                DispatchOutcome::Applied
            }
        }
    }

    /// Apply a batch of commands, e.g. everything the views emitted this frame
    pub fn dispatch_all(&mut self, commands: impl IntoIterator<Item = Command>) -> DispatchOutcome {
        commands.into_iter().fold(DispatchOutcome::Ignored, |outcome, command| {
            match self.dispatch(command) {
                DispatchOutcome::Applied => DispatchOutcome::Applied,
                DispatchOutcome::Ignored => outcome,
            }
        })
    }

    fn open_bin_drilldown(&mut self, index: usize) -> DispatchOutcome {
        let filtered = aggregate::filter_records(&self.state.dataset, &self.state.filter.state());
        let Some(bin) = aggregate::empty_bins().into_iter().nth(index) else {
            return DispatchOutcome::Ignored;
        };

        let records = aggregate::bin_subset(&filtered, &bin);
        let scope = DrilldownScope::SalaryBin { y0: bin.y0, y1: bin.y1 };
        self.open_drilldown(Drilldown::new(scope, records));
        DispatchOutcome::Applied
    }

    fn open_country_drilldown(&mut self, code: String, name: String) -> DispatchOutcome {
        let filtered = aggregate::filter_records(&self.state.dataset, &self.state.filter.state());
        let records = aggregate::country_subset(&filtered, &code, &self.state.country_map);

        // Countries without data are not clickable
        if records.is_empty() {
            debug!(%code, "ignoring drill-down on a country without data");
            return DispatchOutcome::Ignored;
        }

        self.open_drilldown(Drilldown::new(DrilldownScope::Country { code, name }, records));
        DispatchOutcome::Applied
    }

    fn open_drilldown(&mut self, drilldown: Drilldown) {
        self.event_bus.publish(DrilldownOpened {
            title: drilldown.title(),
            record_count: drilldown.records.len(),
        });
        self.state.drilldown = Some(Arc::new(drilldown));
        self.request_render(RenderReason::DrilldownChanged);
    }

    fn replace_dataset(&mut self, source_name: String, records: Vec<Record>) {
        let country_map = std::mem::take(&mut self.state.country_map);
        let view_mode = self.state.view_mode;

        self.state = AppState::new(source_name, records).with_country_map(country_map);
        self.state.view_mode = view_mode;
        self.state.filter.add_subscriber(self.filter_trigger.clone());

        info!(
            source = %self.state.source_name,
            rows = self.state.dataset.len(),
            "dataset replaced"
        );
        self.event_bus.publish(DatasetLoaded {
            source_name: self.state.source_name.clone(),
            row_count: self.state.dataset.len(),
            years: self.state.filter.available_years().to_vec(),
        });
        self.request_render(RenderReason::DatasetReplaced);
    }

    fn request_render(&self, reason: RenderReason) {
        self.event_bus.publish(RenderNeeded { reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ExperienceLevel::*;
    use std::sync::atomic::AtomicUsize;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(AppState::new(
            "test.csv",
            vec![
                Record::new(50_000.0, 2021, Entry, "US"),
                Record::new(150_000.0, 2021, Senior, "US"),
                Record::new(90_000.0, 2022, Mid, "DE"),
            ],
        ))
    }

    #[test]
    fn test_set_range_rerenders_with_effective_range() {
        let mut dispatcher = dispatcher();
        let _ = dispatcher.snapshot();
        assert!(!dispatcher.needs_render());

        let outcome = dispatcher.dispatch(Command::SetSalaryRange { min: 450_000.0, max: 100_000.0 });
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert!(dispatcher.needs_render());

        let snapshot = dispatcher.snapshot();
        assert_eq!((snapshot.filter.min_salary, snapshot.filter.max_salary), (100_000.0, 450_000.0));
        assert_eq!(snapshot.filtered.len(), 1);
        assert!(!dispatcher.needs_render());
    }

    #[test]
    fn test_set_years_replaces_selection() {
        let mut dispatcher = dispatcher();
        assert_eq!(dispatcher.dispatch(Command::SetYears(Vec::new())), DispatchOutcome::Applied);
        assert!(dispatcher.snapshot().filtered.is_empty());

        dispatcher.dispatch(Command::SetYears(vec![2022]));
        let snapshot = dispatcher.snapshot();
        assert_eq!(snapshot.filtered.len(), 1);
        assert_eq!(snapshot.filtered[0].company_location, "DE");
    }

    #[test]
    fn test_toggle_year() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(Command::ToggleYear(2021));
        let snapshot = dispatcher.snapshot();
        assert_eq!(snapshot.filtered.len(), 1);
        assert_eq!(snapshot.filtered[0].company_location, "DE");
    }

    #[test]
    fn test_toggle_view_round_trip() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(Command::ToggleView);
        assert_eq!(dispatcher.snapshot().view_mode, ViewMode::Trend);
        dispatcher.dispatch(Command::ToggleView);
        assert_eq!(dispatcher.snapshot().view_mode, ViewMode::MapHistogram);
    }

    #[test]
    fn test_bin_drilldown_scoped_to_filtered_view() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(Command::ToggleYear(2022));
        // 90_000 lies in bin 4 but its year is deselected
        assert_eq!(dispatcher.dispatch(Command::OpenBinDrilldown(4)), DispatchOutcome::Applied);

        let drilldown = dispatcher.snapshot().drilldown.clone().expect("modal open");
        assert!(drilldown.records.is_empty());
        assert_eq!(drilldown.scope, DrilldownScope::SalaryBin { y0: 80_000.0, y1: 100_000.0 });

        assert_eq!(dispatcher.dispatch(Command::OpenBinDrilldown(99)), DispatchOutcome::Ignored);
    }

    #[test]
    fn test_country_without_data_is_ignored() {
        let mut dispatcher = dispatcher();
        let outcome = dispatcher.dispatch(Command::OpenCountryDrilldown {
            code: "250".into(),
            name: "France".into(),
        });
        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert!(dispatcher.snapshot().drilldown.is_none());
    }

    #[test]
    fn test_country_drilldown_then_close_keeps_filter() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(Command::SetSalaryRange { min: 10_000.0, max: 200_000.0 });
        let before = dispatcher.snapshot().filter.clone();

        dispatcher.dispatch(Command::OpenCountryDrilldown {
            code: "840".into(),
            name: "United States".into(),
        });
        let drilldown = dispatcher.snapshot().drilldown.clone().expect("modal open");
        assert_eq!(drilldown.records.len(), 2);

        assert_eq!(dispatcher.dispatch(Command::CloseDrilldown), DispatchOutcome::Applied);
        let after = dispatcher.snapshot();
        assert!(after.drilldown.is_none());
        assert_eq!(after.filter, before);
        assert_eq!(dispatcher.dispatch(Command::CloseDrilldown), DispatchOutcome::Ignored);
    }

    #[test]
    fn test_replace_dataset_resets_filters() {
        let mut dispatcher = dispatcher();
        dispatcher.dispatch(Command::ToggleYear(2021));
        dispatcher.dispatch(Command::OpenCountryDrilldown { code: "276".into(), name: "Germany".into() });

        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        dispatcher.event_bus().subscribe::<DatasetLoaded>(handler_from_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        dispatcher.dispatch(Command::ReplaceDataset {
            source_name: "other.csv".into(),
            records: vec![Record::new(70_000.0, 2023, Executive, "GB")],
        });

        let snapshot = dispatcher.snapshot();
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.available_years, vec![2023]);
        assert_eq!(snapshot.filtered.len(), 1);
        assert!(snapshot.drilldown.is_none());

        // Filter changes on the new store still trigger renders
        dispatcher.dispatch(Command::ToggleYear(2023));
        assert!(dispatcher.needs_render());
        assert!(dispatcher.snapshot().filtered.is_empty());
    }

    #[test]
    fn test_dispatch_all_reports_any_change() {
        let mut dispatcher = dispatcher();
        let outcome = dispatcher.dispatch_all([
            Command::CloseDrilldown,
            Command::ToggleYear(2022),
        ]);
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(dispatcher.dispatch_all(Vec::new()), DispatchOutcome::Ignored);
    }
}
