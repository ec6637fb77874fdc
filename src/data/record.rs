//! Typed view over loaded accident rows.

use super::loader::LoaderError;
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const MONTH_COL: &str = "MONTH";
pub const STATE_COL: &str = "STATE";
pub const LATITUDE_COL: &str = "LATITUDE";
pub const LONGITUDE_COL: &str = "LONGITUD";

/// Latitudes above this value encode "not available".
pub const LATITUDE_SENTINEL: f64 = 90.0;
/// Longitudes above this value encode "not available".
pub const LONGITUDE_SENTINEL: f64 = 900.0;

/// One accident row with the columns this crate reads, plus every other
/// column carried through as rendered text.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    /// `None` when the file has no `MONTH` column or the cell is empty.
    pub month: Option<i64>,
    pub state: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub extra: BTreeMap<String, Option<String>>,
}

impl AccidentRecord {
    /// Replace sentinel coordinates with `None`.
    pub fn clean_coordinates(&mut self) {
        if self.latitude.is_some_and(|lat| lat > LATITUDE_SENTINEL) {
            self.latitude = None;
        }
        if self.longitude.is_some_and(|lon| lon > LONGITUDE_SENTINEL) {
            self.longitude = None;
        }
    }

    /// `(longitude, latitude)` when both coordinates are known.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }
}

/// One year of accidents as read from disk.
#[derive(Debug, Clone)]
pub struct AccidentTable {
    df: DataFrame,
    source: PathBuf,
}

impl AccidentTable {
    pub fn new(df: DataFrame, source: impl Into<PathBuf>) -> Self {
        Self {
            df,
            source: source.into(),
        }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    /// File the table was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Distinct `STATE` codes, ascending.
    pub fn state_codes(&self) -> Result<Vec<i64>, LoaderError> {
        let states = int_column(&self.df, STATE_COL)?;
        let mut codes: Vec<i64> = states.into_iter().flatten().collect();
        codes.sort_unstable();
        codes.dedup();
        Ok(codes)
    }

    /// Keep only the rows of one state.
    pub fn filter_state(&self, state: i64) -> Result<AccidentTable, LoaderError> {
        if self.df.column(STATE_COL).is_err() {
            return Err(LoaderError::MissingColumn(STATE_COL.to_string()));
        }
        let filtered = self
            .df
            .clone()
            .lazy()
            .filter(col(STATE_COL).cast(DataType::Int64).eq(lit(state)))
            .collect()?;
        Ok(AccidentTable::new(filtered, self.source.clone()))
    }

    /// Materialize every row as an [`AccidentRecord`].
    pub fn records(&self) -> Result<Vec<AccidentRecord>, LoaderError> {
        let months = match self.df.column(MONTH_COL) {
            Ok(column) => Some(column.cast(&DataType::Int64)?.i64()?.clone()),
            Err(_) => None,
        };
        let states = int_column(&self.df, STATE_COL)?;
        let latitudes = float_column(&self.df, LATITUDE_COL)?;
        let longitudes = float_column(&self.df, LONGITUDE_COL)?;

        let extra_cols: Vec<&Column> = self
            .df
            .get_columns()
            .iter()
            .filter(|c| {
                !matches!(
                    c.name().as_str(),
                    MONTH_COL | STATE_COL | LATITUDE_COL | LONGITUDE_COL
                )
            })
            .collect();

        let mut records = Vec::with_capacity(self.df.height());
        for i in 0..self.df.height() {
            let month = months.as_ref().and_then(|m| m.get(i));
            let state = states.get(i).ok_or_else(|| LoaderError::NullValue {
                column: STATE_COL.to_string(),
                row: i,
            })?;

            let mut extra = BTreeMap::new();
            for column in &extra_cols {
                let val = column.get(i)?;
                let text = if val.is_null() {
                    None
                } else {
                    Some(val.to_string().trim_matches('"').to_string())
                };
                extra.insert(column.name().to_string(), text);
            }

            records.push(AccidentRecord {
                month,
                state,
                latitude: latitudes.get(i),
                longitude: longitudes.get(i),
                extra,
            });
        }

        Ok(records)
    }
}

pub(crate) fn int_column(df: &DataFrame, name: &str) -> Result<Int64Chunked, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    Ok(column.cast(&DataType::Int64)?.i64()?.clone())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    Ok(column.cast(&DataType::Float64)?.f64()?.clone())
}
