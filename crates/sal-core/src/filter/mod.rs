//! Filter state shared by every view

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

mod store;
mod subscriber;

pub use store::FilterStore;
pub use subscriber::FilterSubscriber;

/// Lower bound of the salary slider
pub const SALARY_DOMAIN_MIN: f64 = 5_000.0;
/// Upper bound of the salary slider
pub const SALARY_DOMAIN_MAX: f64 = 450_000.0;
/// Slider step
pub const SALARY_STEP: f64 = 1_000.0;

/// User-controlled constraints on the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub min_salary: f64,
    pub max_salary: f64,
    pub selected_years: BTreeSet<i32>,
}

impl FilterState {
    /// Full salary domain with the given years selected
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            min_salary: SALARY_DOMAIN_MIN,
            max_salary: SALARY_DOMAIN_MAX,
            selected_years: years.into_iter().collect(),
        }
    }

    /// Whether a salary/year pair passes this filter
    pub fn matches(&self, salary: f64, year: i32) -> bool {
        salary >= self.min_salary && salary <= self.max_salary && self.selected_years.contains(&year)
    }

    pub fn is_year_selected(&self, year: i32) -> bool {
        self.selected_years.contains(&year)
    }
}

/// Clamp a raw slider pair into the domain and order it.
pub fn normalize_range(a: f64, b: f64) -> (f64, f64) {
    let clamp = |v: f64| {
        if v.is_nan() {
            SALARY_DOMAIN_MIN
        } else {
            v.clamp(SALARY_DOMAIN_MIN, SALARY_DOMAIN_MAX)
        }
    };
    let (a, b) = (clamp(a), clamp(b));
    (a.min(b), a.max(b))
}
