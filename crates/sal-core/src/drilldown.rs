//! Drill-down scopes and their summaries

use serde::Serialize;

use crate::aggregate::{self, CategoryShare, JobSalary};
use crate::record::{CategoryField, Record};

/// Number of job titles shown in the country drill-down
pub const TOP_JOBS: usize = 5;

/// Fields broken down by the drill-down pie charts, in display order
pub const BREAKDOWN_FIELDS: [(CategoryField, &str); 3] = [
    (CategoryField::RemoteRatio, "Remote Work Distribution"),
    (CategoryField::CompanySize, "Company Size Distribution"),
    (CategoryField::EmploymentType, "Employment Type Distribution"),
];

/// What a drill-down was opened on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrilldownScope {
    /// A histogram bin, `[y0, y1)`
    SalaryBin { y0: f64, y1: f64 },
    /// A country on the globe, by normalized code
    Country { code: String, name: String },
}

impl DrilldownScope {
    pub fn title(&self) -> String {
        match self {
            DrilldownScope::SalaryBin { y0, y1 } => {
                format!("Salary Range: ${} - ${}", group_thousands(*y0), group_thousands(*y1))
            }
            DrilldownScope::Country { name, .. } => format!("{} - Salary Analysis", name),
        }
    }
}

/// One pie chart worth of data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub field: CategoryField,
    pub title: &'static str,
    pub shares: Vec<CategoryShare>,
}

/// The job-salary bar chart of a country drill-down
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobChart {
    pub title: &'static str,
    pub jobs: Vec<JobSalary>,
}

/// Everything the modal displays, computed once when it opens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrilldownSummary {
    pub record_count: usize,
    pub breakdowns: Vec<Breakdown>,
    pub job_chart: Option<JobChart>,
}

impl DrilldownSummary {
    pub fn from_records(scope: &DrilldownScope, records: &[Record]) -> Self {
        let breakdowns = BREAKDOWN_FIELDS
            .iter()
            .map(|&(field, title)| Breakdown {
                field,
                title,
                shares: aggregate::category_breakdown(records, field),
            })
            .collect();

        let job_chart = match scope {
            DrilldownScope::Country { .. } => Some(JobChart {
                title: if aggregate::job_title_count(records) <= TOP_JOBS {
                    "Job Salary Distribution"
                } else {
                    "Top 5 Job Titles by Average Salary"
                },
                jobs: aggregate::top_jobs_by_salary(records, TOP_JOBS),
            }),
            DrilldownScope::SalaryBin { .. } => None,
        };

        Self {
            record_count: records.len(),
            breakdowns,
            job_chart,
        }
    }
}

/// An open drill-down: its scope, the scoped records and their summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drilldown {
    pub scope: DrilldownScope,
    pub records: Vec<Record>,
    pub summary: DrilldownSummary,
}

impl Drilldown {
    pub fn new(scope: DrilldownScope, records: Vec<Record>) -> Self {
        let summary = DrilldownSummary::from_records(&scope, &records);
        Self { scope, records, summary }
    }

    pub fn title(&self) -> String {
        self.scope.title()
    }
}

/// `1234567.0` -> `"1,234,567"`
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
