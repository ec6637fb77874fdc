//! Data Processor Module
//! Stacks per-year tables and aggregates them into month x year counts.

use super::filename::Year;
use super::loader::{DataLoader, YearLoad, YEAR_COL};
use super::record::{AccidentRecord, MONTH_COL};
use super::summary::YearSummary;
use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

const COUNT_COL: &str = "n";

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Handles aggregation and cleaning of loaded accident data.
pub struct DataProcessor;

impl DataProcessor {
    /// Stack the tables of every loaded year, dropping invalid years.
    ///
    /// Returns `None` when no year loaded.
    pub fn stack_years(loads: Vec<YearLoad>) -> Result<Option<DataFrame>, SummaryError> {
        let mut tables = loads.into_iter().filter_map(YearLoad::into_table);
        let Some(mut stacked) = tables.next() else {
            return Ok(None);
        };
        for table in tables {
            stacked.vstack_mut(&table)?;
        }
        Ok(Some(stacked))
    }

    /// Long-format counts: one row per `(year, MONTH)` with its row count.
    pub fn count_by_month_year(stacked: &DataFrame) -> Result<DataFrame, SummaryError> {
        let counts = stacked
            .clone()
            .lazy()
            .group_by([col(YEAR_COL), col(MONTH_COL)])
            .agg([len().cast(DataType::UInt32).alias(COUNT_COL)])
            .collect()?;
        Ok(counts)
    }

    /// Reshape long-format counts into the wide month x year table.
    pub fn pivot_counts(counts: &DataFrame) -> Result<YearSummary, SummaryError> {
        let years = counts.column(YEAR_COL)?.cast(&DataType::Int64)?;
        let months = counts.column(MONTH_COL)?.cast(&DataType::Int64)?;
        let n = counts.column(COUNT_COL)?.cast(&DataType::UInt32)?;

        let mut cells = BTreeMap::new();
        for ((year, month), n) in years
            .i64()?
            .into_iter()
            .zip(months.i64()?.into_iter())
            .zip(n.u32()?.into_iter())
        {
            if let (Some(year), Some(month), Some(n)) = (year, month, n) {
                cells.insert((month, year), n);
            }
        }

        Ok(YearSummary::from_cells(&cells))
    }

    /// Load, stack, count and pivot the given years.
    ///
    /// Years that fail to load are skipped with a warning. If none load the
    /// result is an empty summary.
    pub fn summarize<Y>(
        loader: &DataLoader,
        years: impl IntoIterator<Item = Y>,
    ) -> Result<YearSummary, SummaryError>
    where
        Y: Into<Year>,
    {
        let loads = loader.load_years(years);
        let requested = loads.len();

        let Some(stacked) = Self::stack_years(loads)? else {
            info!(requested, "no year could be loaded; summary is empty");
            return Ok(YearSummary::default());
        };
        debug!(rows = stacked.height(), "stacked years");

        let counts = Self::count_by_month_year(&stacked)?;
        Self::pivot_counts(&counts)
    }

    /// Replace sentinel coordinates in every record.
    pub fn clean_coordinates(records: &mut [AccidentRecord]) {
        for record in records.iter_mut() {
            record.clean_coordinates();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_accident_file, AccidentRow};
    use tempfile::TempDir;

    fn month_year(months: &[i64], year: i64) -> DataFrame {
        DataFrame::new(vec![
            Column::new(MONTH_COL.into(), months.to_vec()),
            Column::new(YEAR_COL.into(), vec![year; months.len()]),
        ])
        .unwrap()
    }

    #[test]
    fn stack_skips_invalid_years() {
        let loads = vec![
            YearLoad::Loaded {
                year: Year::new(2013),
                table: month_year(&[1, 1, 2], 2013),
            },
            YearLoad::Invalid {
                year: Year::new(2014),
                reason: "missing".into(),
            },
            YearLoad::Loaded {
                year: Year::new(2015),
                table: month_year(&[3], 2015),
            },
        ];
        let stacked = DataProcessor::stack_years(loads).unwrap().unwrap();
        assert_eq!(stacked.height(), 4);
    }

    #[test]
    fn stack_of_nothing_is_none() {
        let loads = vec![YearLoad::Invalid {
            year: Year::new(2014),
            reason: "missing".into(),
        }];
        assert!(DataProcessor::stack_years(loads).unwrap().is_none());
    }

    #[test]
    fn counts_pivot_into_wide_table() {
        let mut stacked = month_year(&[1, 1, 1, 2, 2], 2013);
        stacked.vstack_mut(&month_year(&[2, 7], 2014)).unwrap();

        let counts = DataProcessor::count_by_month_year(&stacked).unwrap();
        assert_eq!(counts.height(), 4);

        let summary = DataProcessor::pivot_counts(&counts).unwrap();
        assert_eq!(summary.years(), &[2013, 2014]);
        assert_eq!(summary.months(), vec![1, 2, 7]);
        assert_eq!(summary.get(1, 2013), Some(3));
        assert_eq!(summary.get(2, 2013), Some(2));
        assert_eq!(summary.get(2, 2014), Some(1));
        assert_eq!(summary.get(7, 2013), None);
    }

    #[test]
    fn summarize_reads_files_from_disk() {
        let dir = TempDir::new().unwrap();
        write_accident_file(
            dir.path(),
            2013,
            &[
                AccidentRow::new(1, 1, 30.0, -87.0),
                AccidentRow::new(1, 1, 31.0, -86.0),
                AccidentRow::new(1, 6, 34.0, -118.0),
                AccidentRow::new(2, 6, 35.0, -119.0),
                AccidentRow::new(2, 6, 36.0, -120.0),
            ],
        );

        let loader = DataLoader::new(dir.path());
        let summary = DataProcessor::summarize(&loader, [2013, 2099]).unwrap();
        assert_eq!(summary.years(), &[2013]);
        assert_eq!(summary.get(1, 2013), Some(3));
        assert_eq!(summary.get(2, 2013), Some(2));
    }

    #[test]
    fn summarize_without_data_is_empty() {
        let dir = TempDir::new().unwrap();
        let loader = DataLoader::new(dir.path());
        assert!(DataProcessor::summarize(&loader, Vec::<i64>::new())
            .unwrap()
            .is_empty());
        assert!(DataProcessor::summarize(&loader, [1990, 1991])
            .unwrap()
            .is_empty());
    }
}
