//! Month x year fatality count table.

use super::record::MONTH_COL;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Counts of one month across every summarized year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCounts {
    pub month: i64,
    /// One cell per entry of [`YearSummary::years`]; `None` when the month
    /// has no rows in that year.
    pub counts: Vec<Option<u32>>,
}

/// Wide table: one row per month, one column per year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    years: Vec<i64>,
    rows: Vec<MonthCounts>,
}

impl YearSummary {
    /// Pivot `(month, year) -> count` cells into the wide layout.
    ///
    /// Months and years are sorted ascending. Only months present in at
    /// least one year get a row.
    pub fn from_cells(cells: &BTreeMap<(i64, i64), u32>) -> Self {
        let years: Vec<i64> = cells
            .keys()
            .map(|&(_, year)| year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let months: BTreeSet<i64> = cells.keys().map(|&(month, _)| month).collect();

        let rows = months
            .into_iter()
            .map(|month| MonthCounts {
                month,
                counts: years
                    .iter()
                    .map(|&year| cells.get(&(month, year)).copied())
                    .collect(),
            })
            .collect();

        Self { years, rows }
    }

    pub fn years(&self) -> &[i64] {
        &self.years
    }

    pub fn months(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.month).collect()
    }

    pub fn rows(&self) -> &[MonthCounts] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count for one cell, `None` if the combination never occurred.
    pub fn get(&self, month: i64, year: i64) -> Option<u32> {
        let col = self.years.iter().position(|&y| y == year)?;
        self.rows
            .iter()
            .find(|r| r.month == month)
            .and_then(|r| r.counts[col])
    }

    /// Fatal accidents summed over every month of `year`.
    pub fn total(&self, year: i64) -> Option<u32> {
        let col = self.years.iter().position(|&y| y == year)?;
        Some(self.rows.iter().filter_map(|r| r.counts[col]).sum())
    }

    /// `MONTH` followed by one nullable count column per year.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.years.len() + 1);
        columns.push(Column::new(MONTH_COL.into(), self.months()));

        for (i, year) in self.years.iter().enumerate() {
            let cells: Vec<Option<u32>> = self.rows.iter().map(|r| r.counts[i]).collect();
            columns.push(Column::new(year.to_string().into(), cells));
        }

        DataFrame::new(columns)
    }
}

impl fmt::Display for YearSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "(no data)");
        }

        write!(f, "{:>5}", MONTH_COL)?;
        for year in &self.years {
            write!(f, " {:>6}", year)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:>5}", row.month)?;
            for cell in &row.counts {
                match cell {
                    Some(n) => write!(f, " {:>6}", n)?,
                    None => write!(f, " {:>6}", "-")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
