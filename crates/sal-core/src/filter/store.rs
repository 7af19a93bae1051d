//! Filter store implementation

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{normalize_range, FilterState, FilterSubscriber};

/// Single source of truth for the salary range and selected years
pub struct FilterStore {
    state: Arc<RwLock<FilterState>>,
    /// Years present in the dataset, ascending
    available_years: Vec<i32>,
    subscribers: Arc<RwLock<Vec<Weak<dyn FilterSubscriber>>>>,
}

impl FilterStore {
    /// Create a store with the full salary domain and every available year selected
    pub fn new(available_years: impl IntoIterator<Item = i32>) -> Self {
        let available_years: Vec<i32> = available_years
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            state: Arc::new(RwLock::new(FilterState::new(available_years.iter().copied()))),
            available_years,
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Immutable snapshot of the current filter
    pub fn state(&self) -> FilterState {
        self.state.read().clone()
    }

    pub fn available_years(&self) -> &[i32] {
        &self.available_years
    }

    /// Store a new salary range. Raw slider values may arrive swapped, so callers
    /// must use the returned effective range.
    pub fn set_salary_range(&self, min: f64, max: f64) -> (f64, f64) {
        let (min, max) = normalize_range(min, max);

        let mut state = self.state.write();
        state.min_salary = min;
        state.max_salary = max;
        drop(state);

        self.notify_subscribers();
        (min, max)
    }

    /// Add the year to the selection, or remove it if already selected.
    /// Returns whether the year is selected afterwards.
    pub fn toggle_year(&self, year: i32) -> bool {
        let mut state = self.state.write();
        let selected = if state.selected_years.remove(&year) {
            false
        } else {
            state.selected_years.insert(year);
            true
        };
        drop(state);

        self.notify_subscribers();
        selected
    }

    /// Replace the whole year selection
    pub fn set_years(&self, years: impl IntoIterator<Item = i32>) {
        let mut state = self.state.write();
        state.selected_years = years.into_iter().collect();
        drop(state);

        self.notify_subscribers();
    }

    /// Back to the startup defaults
    pub fn reset(&self) {
        *self.state.write() = FilterState::new(self.available_years.iter().copied());
        self.notify_subscribers();
    }

    /// Add a subscriber. Only a weak handle is kept.
    pub fn add_subscriber(&self, subscriber: Arc<dyn FilterSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self) {
        let state = self.state();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_filter_change(&state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{SALARY_DOMAIN_MAX, SALARY_DOMAIN_MIN};
    use parking_lot::Mutex;

    struct Recorder {
        seen: Mutex<Vec<FilterState>>,
    }

    impl FilterSubscriber for Recorder {
        fn on_filter_change(&self, state: &FilterState) {
            self.seen.lock().push(state.clone());
        }
    }

    #[test]
    fn test_defaults() {
        let store = FilterStore::new([2022, 2020, 2021, 2022]);
        let state = store.state();
        assert_eq!(state.min_salary, SALARY_DOMAIN_MIN);
        assert_eq!(state.max_salary, SALARY_DOMAIN_MAX);
        assert_eq!(store.available_years(), &[2020, 2021, 2022]);
        assert_eq!(state.selected_years.len(), 3);
    }

    #[test]
    fn test_set_salary_range_returns_effective_range() {
        let store = FilterStore::new([2021]);
        assert_eq!(store.set_salary_range(300_000.0, 10_000.0), (10_000.0, 300_000.0));
        let state = store.state();
        assert_eq!((state.min_salary, state.max_salary), (10_000.0, 300_000.0));
        assert_eq!(store.set_salary_range(0.0, 999_999.0), (SALARY_DOMAIN_MIN, SALARY_DOMAIN_MAX));
    }

    #[test]
    fn test_toggle_year() {
        let store = FilterStore::new([2021, 2022]);
        assert!(!store.toggle_year(2021));
        assert!(!store.state().is_year_selected(2021));
        assert!(store.toggle_year(2021));
        assert!(store.state().is_year_selected(2021));
    }

    #[test]
    fn test_set_years_notifies_once() {
        let store = FilterStore::new([2020, 2021, 2022]);
        let recorder = Arc::new(Recorder { seen: Mutex::new(Vec::new()) });
        store.add_subscriber(recorder.clone());

        store.set_years([2022, 2020, 2022]);
        let state = store.state();
        assert_eq!(state.selected_years.iter().copied().collect::<Vec<_>>(), vec![2020, 2022]);
        assert_eq!(recorder.seen.lock().len(), 1);

        // Years outside the dataset are kept; they just match nothing
        store.set_years([1999]);
        assert!(store.state().is_year_selected(1999));
        assert_eq!(store.available_years(), &[2020, 2021, 2022]);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = FilterStore::new([2021, 2022]);
        store.set_salary_range(50_000.0, 60_000.0);
        store.toggle_year(2022);
        store.reset();
        assert_eq!(store.state(), FilterState::new([2021, 2022]));
    }

    #[test]
    fn test_subscribers_notified_and_pruned() {
        let store = FilterStore::new([2021]);
        let recorder = Arc::new(Recorder { seen: Mutex::new(Vec::new()) });
        store.add_subscriber(recorder.clone());

        store.set_salary_range(10_000.0, 20_000.0);
        store.toggle_year(2021);
        assert_eq!(recorder.seen.lock().len(), 2);
        assert!(recorder.seen.lock()[1].selected_years.is_empty());

        drop(recorder);
        store.toggle_year(2021);
        assert!(store.subscribers.read().is_empty());
    }
}
