//! Aggregation engine
//!
//! Pure functions from `(records, filter state)` to the summaries each view
//! draws. Nothing here keeps state between calls; every render cycle
//! recomputes from scratch. Empty input always yields an empty result and a
//! mean over an empty group is reported as absent (or `0.0` where a value is
//! required), never `NaN`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::filter::FilterState;
use crate::record::{CategoryField, ExperienceLevel, Record};
use crate::reference::CountryCodeMap;

/// Lower edge of the first histogram bin
pub const HISTOGRAM_MIN: f64 = 0.0;
/// Upper edge (exclusive) of the last histogram bin
pub const HISTOGRAM_MAX: f64 = 460_000.0;
/// Width of every histogram bin
pub const BIN_WIDTH: f64 = 20_000.0;
/// Number of histogram bins
pub const BIN_COUNT: usize = 23;

/// Records passing the current filter, in dataset order
pub fn filter_records(records: &[Record], state: &FilterState) -> Vec<Record> {
    records
        .iter()
        .filter(|r| state.matches(r.salary_in_usd, r.work_year))
        .cloned()
        .collect()
}

/// Average salary and sample size of one country
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountryStat {
    pub avg_salary: f64,
    pub count: usize,
}

/// Per-country statistics keyed by normalized country code
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountryStats {
    stats: IndexMap<String, CountryStat>,
}

impl CountryStats {
    /// Statistics for a normalized code. `None` means "no data".
    pub fn get(&self, code: &str) -> Option<&CountryStat> {
        self.stats.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CountryStat)> {
        self.stats.iter().map(|(code, stat)| (code.as_str(), stat))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Smallest and largest positive average, the colour domain of the choropleth
    pub fn salary_extent(&self) -> Option<(f64, f64)> {
        self.stats
            .values()
            .map(|s| s.avg_salary)
            .filter(|v| v.is_finite() && *v > 0.0)
            .fold(None, |extent, v| match extent {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Group records by normalized location and average their salaries
pub fn country_stats(records: &[Record], country_map: &CountryCodeMap) -> CountryStats {
    let mut groups: IndexMap<String, (f64, usize)> = IndexMap::new();
    for record in records {
        let key = country_map.normalize(&record.company_location);
        let entry = groups.entry(key.to_string()).or_insert((0.0, 0));
        entry.0 += record.salary_in_usd;
        entry.1 += 1;
    }

    CountryStats {
        stats: groups
            .into_iter()
            .map(|(code, (sum, count))| {
                (code, CountryStat { avg_salary: sum / count as f64, count })
            })
            .collect(),
    }
}

/// Fixed-width salary bucket with one count per experience level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalaryBin {
    pub y0: f64,
    pub y1: f64,
    /// Counts indexed by [`ExperienceLevel::index`]
    pub counts: [usize; 4],
}

impl SalaryBin {
    pub fn count(&self, level: ExperienceLevel) -> usize {
        self.counts[level.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn contains(&self, salary: f64) -> bool {
        salary >= self.y0 && salary < self.y1
    }

    /// Share of a level within this bin, in `[0, 1]`; `0.0` for an empty bin
    pub fn share(&self, level: ExperienceLevel) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(level) as f64 / total as f64,
        }
    }
}

/// Bin index of a salary, `None` outside the histogram domain
pub fn bin_index(salary: f64) -> Option<usize> {
    if !(HISTOGRAM_MIN..HISTOGRAM_MAX).contains(&salary) {
        return None;
    }
    let index = ((salary - HISTOGRAM_MIN) / BIN_WIDTH).floor() as usize;
    (index < BIN_COUNT).then_some(index)
}

/// The empty bin layout. Edges never depend on the filter, so the axes stay put
/// while the salary slider is dragged.
pub fn empty_bins() -> Vec<SalaryBin> {
    (0..BIN_COUNT)
        .map(|i| {
            let y0 = HISTOGRAM_MIN + i as f64 * BIN_WIDTH;
            SalaryBin { y0, y1: y0 + BIN_WIDTH, counts: [0; 4] }
        })
        .collect()
}

/// Count records per bin and experience level. Salaries outside the domain are dropped.
pub fn histogram_bins(records: &[Record]) -> Vec<SalaryBin> {
    let mut bins = empty_bins();
    for record in records {
        if let Some(index) = bin_index(record.salary_in_usd) {
            bins[index].counts[record.experience_level.index()] += 1;
        }
    }
    bins
}

/// Records of the filtered view falling into one bin
pub fn bin_subset(records: &[Record], bin: &SalaryBin) -> Vec<Record> {
    records
        .iter()
        .filter(|r| bin.contains(r.salary_in_usd))
        .cloned()
        .collect()
}

/// Records of the filtered view located in one country (by normalized code)
pub fn country_subset(records: &[Record], code: &str, country_map: &CountryCodeMap) -> Vec<Record> {
    records
        .iter()
        .filter(|r| country_map.normalize(&r.company_location) == code)
        .cloned()
        .collect()
}

/// Average salaries of one work year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    /// Averages indexed by [`ExperienceLevel::index`]; `0.0` where a level has no records
    pub levels: [f64; 4],
    /// Average over all records of the year
    pub all: f64,
}

impl YearPoint {
    pub fn level(&self, level: ExperienceLevel) -> f64 {
        self.levels[level.index()]
    }

    /// Largest per-level average, used for the y axis extent
    pub fn max_level(&self) -> f64 {
        self.levels.iter().copied().fold(0.0, f64::max)
    }
}

/// Per-year, per-level average salary, ascending by year
pub fn year_series(records: &[Record]) -> Vec<YearPoint> {
    #[derive(Default)]
    struct Acc {
        sums: [f64; 4],
        counts: [usize; 4],
    }

    let mut years: IndexMap<i32, Acc> = IndexMap::new();
    for record in records {
        let acc = years.entry(record.work_year).or_default();
        let i = record.experience_level.index();
        acc.sums[i] += record.salary_in_usd;
        acc.counts[i] += 1;
    }
    years.sort_keys();

    years
        .into_iter()
        .map(|(year, acc)| {
            let mut levels = [0.0; 4];
            for i in 0..4 {
                if acc.counts[i] > 0 {
                    levels[i] = acc.sums[i] / acc.counts[i] as f64;
                }
            }
            let total: usize = acc.counts.iter().sum();
            let all = acc.sums.iter().sum::<f64>() / total as f64;
            YearPoint { year, levels, all }
        })
        .collect()
}

/// Count of one category value within a subset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub key: String,
    pub count: usize,
    /// `count / subset size`
    pub ratio: f64,
}

impl CategoryShare {
    pub fn percentage(&self) -> f64 {
        self.ratio * 100.0
    }
}

/// Group a subset by one categorical field, keys in first-encounter order
pub fn category_breakdown(records: &[Record], field: CategoryField) -> Vec<CategoryShare> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        *counts.entry(record.category_key(field).into_owned()).or_insert(0) += 1;
    }

    let total = records.len() as f64;
    counts
        .into_iter()
        .map(|(key, count)| CategoryShare { key, count, ratio: count as f64 / total })
        .collect()
}

/// Average salary of one job title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSalary {
    pub title: String,
    pub avg_salary: f64,
    pub count: usize,
}

/// Per-title averages for a subset, in first-encounter order
pub fn job_salaries(records: &[Record]) -> Vec<JobSalary> {
    let mut groups: IndexMap<&str, (f64, usize)> = IndexMap::new();
    for record in records {
        let entry = groups.entry(record.job_title.as_str()).or_insert((0.0, 0));
        entry.0 += record.salary_in_usd;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(title, (sum, count))| JobSalary {
            title: title.to_string(),
            avg_salary: sum / count as f64,
            count,
        })
        .collect()
}

/// The `n` best paid job titles. Ties keep first-encounter order (the sort is stable).
pub fn top_jobs_by_salary(records: &[Record], n: usize) -> Vec<JobSalary> {
    let mut jobs = job_salaries(records);
    jobs.sort_by(|a, b| b.avg_salary.total_cmp(&a.avg_salary));
    jobs.truncate(n);
    jobs
}

/// Number of distinct job titles in a subset
pub fn job_title_count(records: &[Record]) -> usize {
    records
        .iter()
        .map(|r| r.job_title.as_str())
        .collect::<ahash::AHashSet<_>>()
        .len()
}
