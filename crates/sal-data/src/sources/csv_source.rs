use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use sal_core::data::DataSource;
use sal_core::record::{ExperienceLevel, Record};

use crate::config::NullConfig;
use crate::schema::ColumnIndex;
use crate::DataError;

/// Skipped rows are logged individually up to this many, then summarized
const MAX_LOGGED_SKIPS: usize = 20;

/// A row that was dropped during loading
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line in the file
    pub line: u64,
    pub reason: String,
}

/// Outcome of a load, including rows that were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub fn accepted(&self) -> usize {
        self.rows_read - self.skipped.len()
    }
}

/// Records parsed from one salary file
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source_name: String,
    pub records: Vec<Record>,
    pub report: LoadReport,
}

/// CSV data source for salary records
pub struct SalaryCsvSource {
    path: PathBuf,
    source_name: String,
    null_config: NullConfig,
}

impl SalaryCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Self {
            path,
            source_name,
            null_config: NullConfig::default(),
        }
    }

    pub fn with_null_config(mut self, null_config: NullConfig) -> Self {
        self.null_config = null_config;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file on the blocking pool
    pub async fn load(&self) -> Result<LoadedDataset, DataError> {
        let path = self.path.clone();
        let source_name = self.source_name.clone();
        let null_config = self.null_config.clone();

        tokio::task::spawn_blocking(move || Self::load_blocking(&path, source_name, &null_config)).await?
    }

    fn load_blocking(path: &Path, source_name: String, null_config: &NullConfig) -> Result<LoadedDataset, DataError> {
        let file = File::open(path)?;
        let (records, report) = parse_reader(BufReader::new(file), null_config)?;

        info!(
            source = %source_name,
            accepted = report.accepted(),
            skipped = report.skipped.len(),
            "loaded salary records"
        );

        Ok(LoadedDataset {
            source_name,
            records,
            report,
        })
    }
}

#[async_trait]
impl DataSource for SalaryCsvSource {
    async fn load_records(&self) -> anyhow::Result<Vec<Record>> {
        Ok(self.load().await?.records)
    }

    fn source_name(&self) -> &str {
        &self.source_name
    }
}

/// Parse salary rows from any reader. Missing required columns fail the whole
/// load; bad rows are skipped and reported.
pub fn parse_reader<R: Read>(reader: R, null_config: &NullConfig) -> Result<(Vec<Record>, LoadReport), DataError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in csv_reader.records() {
        report.rows_read += 1;

        // Unreadable rows (bad UTF-8, broken quoting) are skipped like invalid ones
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                skip_row(&mut report, line, format!("unreadable row: {}", e));
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        match parse_row(&row, &columns, null_config) {
            Ok(record) => records.push(record),
            Err(reason) => skip_row(&mut report, line, reason),
        }
    }

    if report.skipped.len() > MAX_LOGGED_SKIPS {
        warn!(
            total = report.skipped.len(),
            "further skipped rows were not logged"
        );
    }

    Ok((records, report))
}

fn skip_row(report: &mut LoadReport, line: u64, reason: String) {
    if report.skipped.len() < MAX_LOGGED_SKIPS {
        warn!(line, %reason, "skipping salary row");
    }
    report.skipped.push(SkippedRow { line, reason });
}

fn parse_row(row: &StringRecord, columns: &ColumnIndex, nulls: &NullConfig) -> Result<Record, String> {
    let field = |idx: usize, name: &str| {
        row.get(idx)
            .and_then(|value| nulls.value(value))
            .ok_or_else(|| format!("missing {}", name))
    };

    let work_year = parse_year(field(columns.work_year, "work_year")?)?;

    let experience_level: ExperienceLevel = field(columns.experience_level, "experience_level")?
        .parse()
        .map_err(|e| format!("{}", e))?;

    let salary_raw = field(columns.salary_in_usd, "salary_in_usd")?;
    let salary_in_usd: f64 = salary_raw
        .parse()
        .map_err(|_| format!("invalid salary '{}'", salary_raw))?;
    if !salary_in_usd.is_finite() || salary_in_usd <= 0.0 {
        return Err(format!("salary must be positive, got {}", salary_raw));
    }

    let remote_raw = field(columns.remote_ratio, "remote_ratio")?;
    let remote_ratio = remote_raw
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r >= 0.0 && r.fract() == 0.0)
        .ok_or_else(|| format!("invalid remote ratio '{}'", remote_raw))? as u32;

    Ok(Record {
        work_year,
        experience_level,
        employment_type: field(columns.employment_type, "employment_type")?.to_string(),
        job_title: field(columns.job_title, "job_title")?.to_string(),
        salary_in_usd,
        company_location: field(columns.company_location, "company_location")?.to_string(),
        remote_ratio,
        company_size: field(columns.company_size, "company_size")?.to_string(),
    })
}

/// Years may be exported as floats (`2022.0`)
fn parse_year(raw: &str) -> Result<i32, String> {
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|y| y.fract() == 0.0 && y.abs() < i32::MAX as f64)
        .map(|y| y as i32)
        .ok_or_else(|| format!("invalid work year '{}'", raw))
}
