//! Column layout of the salary CSV

use ahash::AHashMap;
use csv::StringRecord;

use crate::DataError;

/// Columns every salary file must carry. Other columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "work_year",
    "experience_level",
    "employment_type",
    "job_title",
    "salary_in_usd",
    "company_location",
    "remote_ratio",
    "company_size",
];

/// Positions of the required columns within a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub work_year: usize,
    pub experience_level: usize,
    pub employment_type: usize,
    pub job_title: usize,
    pub salary_in_usd: usize,
    pub company_location: usize,
    pub remote_ratio: usize,
    pub company_size: usize,
}

impl ColumnIndex {
    /// Locate the required columns. Header names are matched after trimming,
    /// case-insensitively.
    pub fn from_headers(headers: &StringRecord) -> Result<Self, DataError> {
        let positions: AHashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_ascii_lowercase(), idx))
            .collect();

        let find = |column: &str| {
            positions
                .get(column)
                .copied()
                .ok_or_else(|| DataError::MissingColumn(column.to_string()))
        };

        Ok(Self {
            work_year: find("work_year")?,
            experience_level: find("experience_level")?,
            employment_type: find("employment_type")?,
            job_title: find("job_title")?,
            salary_in_usd: find("salary_in_usd")?,
            company_location: find("company_location")?,
            remote_ratio: find("remote_ratio")?,
            company_size: find("company_size")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reordered_headers_with_extras() {
        let headers = StringRecord::from(vec![
            "salary", "salary_currency", "Salary_In_USD ", "job_title", "work_year",
            "experience_level", "employment_type", "employee_residence",
            "company_location", "remote_ratio", "company_size",
        ]);
        let index = ColumnIndex::from_headers(&headers).unwrap();
        assert_eq!(index.salary_in_usd, 2);
        assert_eq!(index.work_year, 4);
        assert_eq!(index.company_size, 10);
    }

    #[test]
    fn test_missing_column() {
        let headers = StringRecord::from(vec!["work_year", "salary_in_usd"]);
        match ColumnIndex::from_headers(&headers) {
            Err(DataError::MissingColumn(column)) => assert_eq!(column, "experience_level"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_required_columns_resolve() {
        let headers = StringRecord::from(REQUIRED_COLUMNS.to_vec());
        assert!(ColumnIndex::from_headers(&headers).is_ok());
    }
}
