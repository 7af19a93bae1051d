pub mod csv_source;
pub mod geo_source;

pub use csv_source::{parse_reader, LoadReport, LoadedDataset, SalaryCsvSource, SkippedRow};
pub use geo_source::{CountryShape, WorldGeometry};
