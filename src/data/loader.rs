//! Accident File Loader Module
//! Reads bzip2-compressed FARS CSV files into Polars DataFrames.

use super::filename::{resolve_filename, Year};
use super::record::{int_column, AccidentTable, MONTH_COL};
use bzip2::read::MultiBzDecoder;
use polars::prelude::*;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the column stamped with the source year.
pub const YEAR_COL: &str = "year";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("file '{}' does not exist", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("column '{0}' not found")]
    MissingColumn(String),
    #[error("null value in column '{column}' at row {row}")]
    NullValue { column: String, row: usize },
}

/// Result of loading one year inside a batch.
#[derive(Debug)]
pub enum YearLoad {
    /// `MONTH` and `year` columns of a successfully read file.
    Loaded { year: Year, table: DataFrame },
    /// The year could not be read; `reason` carries the underlying error.
    Invalid { year: Year, reason: String },
}

impl YearLoad {
    pub fn year(&self) -> Year {
        match self {
            YearLoad::Loaded { year, .. } | YearLoad::Invalid { year, .. } => *year,
        }
    }

    pub fn table(&self) -> Option<&DataFrame> {
        match self {
            YearLoad::Loaded { table, .. } => Some(table),
            YearLoad::Invalid { .. } => None,
        }
    }

    pub fn into_table(self) -> Option<DataFrame> {
        match self {
            YearLoad::Loaded { table, .. } => Some(table),
            YearLoad::Invalid { .. } => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, YearLoad::Invalid { .. })
    }
}

/// Loads yearly accident files from a data directory.
#[derive(Debug, Clone)]
pub struct DataLoader {
    data_dir: PathBuf,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the file holding `year`.
    pub fn path_for(&self, year: impl Into<Year>) -> PathBuf {
        self.data_dir.join(resolve_filename(year))
    }

    /// Load one year's full table.
    pub fn load_year(&self, year: impl Into<Year>) -> Result<AccidentTable, LoaderError> {
        self.load_file(self.path_for(year))
    }

    /// Load any accident file, bypassing name resolution.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<AccidentTable, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let io_err = |source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        };

        // The decoder and file handle are dropped before parsing starts
        let bytes = {
            let file = File::open(path).map_err(io_err)?;
            let mut decoder = MultiBzDecoder::new(file);
            let mut bytes = Vec::new();
            decoder.read_to_end(&mut bytes).map_err(io_err)?;
            bytes
        };
        debug!(path = %path.display(), bytes = bytes.len(), "decompressed");

        // Schema comes from every row so late decimals in passthrough
        // columns widen the type instead of failing the load.
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .map_parse_options(|opts| opts.with_encoding(CsvEncoding::LossyUtf8))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        debug!(path = %path.display(), rows = df.height(), cols = df.width(), "parsed");

        Ok(AccidentTable::new(df, path))
    }

    /// Load `MONTH` plus a `year` stamp for every year, isolating failures.
    ///
    /// The output has one entry per input year, in input order. Years whose
    /// file is missing or unreadable become [`YearLoad::Invalid`] and a
    /// warning is logged; the remaining years are unaffected.
    pub fn load_years<Y>(&self, years: impl IntoIterator<Item = Y>) -> Vec<YearLoad>
    where
        Y: Into<Year>,
    {
        years
            .into_iter()
            .map(|year| {
                let year = year.into();
                match self.load_month_year(year) {
                    Ok(table) => YearLoad::Loaded { year, table },
                    Err(err) => {
                        warn!(%year, error = %err, "invalid year: {year}");
                        YearLoad::Invalid {
                            year,
                            reason: err.to_string(),
                        }
                    }
                }
            })
            .collect()
    }

    fn load_month_year(&self, year: Year) -> Result<DataFrame, LoaderError> {
        let table = self.load_year(year)?;
        let months = int_column(table.dataframe(), MONTH_COL)?;
        let stamp = vec![year.value(); months.len()];

        let df = DataFrame::new(vec![
            months.with_name(MONTH_COL.into()).into_series().into(),
            Column::new(YEAR_COL.into(), stamp),
        ])?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_accident_file, write_raw_file, AccidentRow};
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let loader = DataLoader::new(dir.path());
        match loader.load_year(1999) {
            Err(LoaderError::FileNotFound(path)) => {
                assert_eq!(path, dir.path().join("accident_1999.csv.bz2"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn loads_every_column_unmodified() {
        let dir = TempDir::new().unwrap();
        write_accident_file(
            dir.path(),
            2013,
            &[AccidentRow::new(1, 1, 30.5, -87.1), AccidentRow::new(2, 3, 99.9999, 999.9999)],
        );

        let table = DataLoader::new(dir.path()).load_year(2013).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(
            table.column_names(),
            vec!["STATE", "ST_CASE", "MONTH", "DAY", "LATITUDE", "LONGITUD", "FATALS"]
        );
        assert_eq!(table.source(), dir.path().join("accident_2013.csv.bz2"));
    }

    #[test]
    fn repeated_loads_are_identical() {
        let dir = TempDir::new().unwrap();
        write_accident_file(
            dir.path(),
            2014,
            &[AccidentRow::new(6, 4, 34.0, -118.2), AccidentRow::new(6, 4, 37.7, -122.4)],
        );
        let loader = DataLoader::new(dir.path());
        let first = loader.load_year(2014).unwrap();
        let second = loader.load_year(2014).unwrap();
        assert!(first.dataframe().equals_missing(second.dataframe()));
    }

    #[test]
    fn corrupt_container_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("accident_2015.csv.bz2"), b"MONTH\n1\n").unwrap();
        let result = DataLoader::new(dir.path()).load_year(2015);
        assert!(matches!(result, Err(LoaderError::Io { .. })));
    }

    #[test]
    fn batch_isolates_failing_years() {
        let dir = TempDir::new().unwrap();
        write_accident_file(dir.path(), 2013, &[AccidentRow::new(1, 1, 30.0, -87.0)]);
        write_accident_file(
            dir.path(),
            2015,
            &[AccidentRow::new(4, 2, 61.0, -150.0), AccidentRow::new(5, 2, 61.0, -150.0)],
        );

        let loads = DataLoader::new(dir.path()).load_years([2013, 2014, 2015]);
        assert_eq!(loads.len(), 3);
        let years: Vec<i64> = loads.iter().map(|l| l.year().value()).collect();
        assert_eq!(years, vec![2013, 2014, 2015]);

        assert!(loads[1].is_invalid());
        let first = loads[0].table().unwrap();
        let names: Vec<&str> = first.get_column_names().iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["MONTH", "year"]);
        assert_eq!(first.height(), 1);

        let third = loads[2].table().unwrap();
        let stamped: Vec<Option<i64>> = third
            .column(YEAR_COL)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(stamped, vec![Some(2015), Some(2015)]);
    }

    #[test]
    fn late_decimal_in_passthrough_column_still_loads() {
        let dir = TempDir::new().unwrap();
        let mut csv = String::from("STATE,MONTH,TWAY,LATITUDE,LONGITUD\n");
        for i in 0..10_050 {
            let tway = if i == 10_020 { "1.5" } else { "1" };
            csv.push_str(&format!("1,{},{tway},32.0,-86.0\n", i % 12 + 1));
        }
        write_raw_file(dir.path(), 2013, &csv);

        let loader = DataLoader::new(dir.path());
        let table = loader.load_year(2013).unwrap();
        assert_eq!(table.height(), 10_050);
        let tway = table.dataframe().column("TWAY").unwrap();
        assert_eq!(tway.dtype(), &DataType::Float64);
        assert_eq!(tway.f64().unwrap().get(10_020), Some(1.5));

        let loads = loader.load_years([2013]);
        assert_eq!(loads[0].table().unwrap().height(), 10_050);
    }

    #[test]
    fn non_utf8_text_is_replaced_not_rejected() {
        let dir = TempDir::new().unwrap();
        let mut csv = b"STATE,MONTH,CITY,LATITUDE,LONGITUD\n6,3,CA".to_vec();
        csv.push(0xD1);
        csv.extend_from_slice(b"ON,34.1,-117.3\n");
        write_raw_file(dir.path(), 2014, &csv);

        let table = DataLoader::new(dir.path()).load_year(2014).unwrap();
        assert_eq!(table.height(), 1);
        let records = table.records().unwrap();
        let city = records[0].extra["CITY"].as_deref().unwrap();
        assert!(city.starts_with("CA") && city.ends_with("ON"));
        assert_eq!(records[0].month, Some(3));
    }

    #[test]
    fn file_without_month_is_an_invalid_year() {
        let dir = TempDir::new().unwrap();
        write_raw_file(dir.path(), 2016, "STATE,LATITUDE\n1,30.0\n");
        let loads = DataLoader::new(dir.path()).load_years([2016]);
        match &loads[0] {
            YearLoad::Invalid { year, reason } => {
                assert_eq!(year.value(), 2016);
                assert!(reason.contains("MONTH"));
            }
            other => panic!("unexpected load: {other:?}"),
        }
    }
}
