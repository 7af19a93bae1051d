//! Salary record model

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Seniority bucket of a salary record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "EN")]
    Entry,
    #[serde(rename = "MI")]
    Mid,
    #[serde(rename = "SE")]
    Senior,
    #[serde(rename = "EX")]
    Executive,
}

impl ExperienceLevel {
    /// All levels in stacking order (entry level at the bottom)
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Executive,
    ];

    /// Dataset code (`EN`, `MI`, `SE`, `EX`)
    pub fn code(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "EN",
            ExperienceLevel::Mid => "MI",
            ExperienceLevel::Senior => "SE",
            ExperienceLevel::Executive => "EX",
        }
    }

    /// Human readable label used in legends and tooltips
    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry Level",
            ExperienceLevel::Mid => "Mid Level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Executive => "Executive",
        }
    }

    /// Position in [`ExperienceLevel::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when an experience level code is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExperienceLevel(pub String);

impl fmt::Display for UnknownExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown experience level '{}'", self.0)
    }
}

impl std::error::Error for UnknownExperienceLevel {}

impl FromStr for ExperienceLevel {
    type Err = UnknownExperienceLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "EN" => Ok(ExperienceLevel::Entry),
            "MI" => Ok(ExperienceLevel::Mid),
            "SE" => Ok(ExperienceLevel::Senior),
            "EX" => Ok(ExperienceLevel::Executive),
            other => Err(UnknownExperienceLevel(other.to_string())),
        }
    }
}

/// One salary observation. Numeric fields are coerced once when the dataset is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub work_year: i32,
    pub experience_level: ExperienceLevel,
    pub employment_type: String,
    pub job_title: String,
    pub salary_in_usd: f64,
    /// ISO alpha-2 country code of the employer
    pub company_location: String,
    pub remote_ratio: u32,
    pub company_size: String,
}

impl Record {
    /// Builder used by tests and demo data; categorical fields get common defaults.
    pub fn new(
        salary_in_usd: f64,
        work_year: i32,
        experience_level: ExperienceLevel,
        company_location: impl Into<String>,
    ) -> Self {
        Self {
            work_year,
            experience_level,
            employment_type: "FT".to_string(),
            job_title: "Data Scientist".to_string(),
            salary_in_usd,
            company_location: company_location.into(),
            remote_ratio: 0,
            company_size: "M".to_string(),
        }
    }

    pub fn with_job_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = title.into();
        self
    }

    pub fn with_remote_ratio(mut self, ratio: u32) -> Self {
        self.remote_ratio = ratio;
        self
    }

    pub fn with_company_size(mut self, size: impl Into<String>) -> Self {
        self.company_size = size.into();
        self
    }

    pub fn with_employment_type(mut self, kind: impl Into<String>) -> Self {
        self.employment_type = kind.into();
        self
    }

    /// Raw value of a categorical field, as it appears in the dataset
    pub fn category_key(&self, field: CategoryField) -> Cow<'_, str> {
        match field {
            CategoryField::RemoteRatio => Cow::Owned(self.remote_ratio.to_string()),
            CategoryField::CompanySize => Cow::Borrowed(&self.company_size),
            CategoryField::EmploymentType => Cow::Borrowed(&self.employment_type),
            CategoryField::JobTitle => Cow::Borrowed(&self.job_title),
            CategoryField::ExperienceLevel => Cow::Borrowed(self.experience_level.code()),
        }
    }
}

/// Categorical columns that drill-down charts can break a subset down by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    RemoteRatio,
    CompanySize,
    EmploymentType,
    JobTitle,
    ExperienceLevel,
}

impl CategoryField {
    /// Column name in the source dataset
    pub fn column_name(self) -> &'static str {
        match self {
            CategoryField::RemoteRatio => "remote_ratio",
            CategoryField::CompanySize => "company_size",
            CategoryField::EmploymentType => "employment_type",
            CategoryField::JobTitle => "job_title",
            CategoryField::ExperienceLevel => "experience_level",
        }
    }
}
