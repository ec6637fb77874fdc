//! FARS - Fatality Analysis Reporting System toolkit
//!
//! Loads the yearly `accident_<year>.csv.bz2` files, counts fatal accidents
//! per month and year, and maps accident locations for a state.
//!
//! The free functions below read from the current working directory. Use
//! [`DataLoader`], [`DataProcessor`] and [`StateMapPlotter`] directly to
//! work against another directory or tune the rendered map.

pub mod charts;
pub mod config;
pub mod data;
pub mod states;

#[cfg(test)]
mod test_support;

use std::path::Path;

pub use charts::{MapError, MapOutcome, MapStyle, StateMapPlotter};
pub use config::{Config, ConfigError};
pub use data::{
    resolve_filename, AccidentRecord, AccidentTable, DataLoader, DataProcessor, LoaderError,
    SummaryError, Year, YearLoad, YearSummary,
};
pub use states::StateCode;

/// Read one accident file.
pub fn load_year(path: impl AsRef<Path>) -> Result<AccidentTable, LoaderError> {
    DataLoader::default().load_file(path)
}

/// `MONTH`/`year` tables for each year, invalid years logged and kept as
/// placeholders.
pub fn load_years<Y: Into<Year>>(years: impl IntoIterator<Item = Y>) -> Vec<YearLoad> {
    DataLoader::default().load_years(years)
}

/// Month x year accident counts for the given years.
pub fn summarize_years<Y: Into<Year>>(
    years: impl IntoIterator<Item = Y>,
) -> Result<YearSummary, SummaryError> {
    DataProcessor::summarize(&DataLoader::default(), years)
}

/// Map a state's accidents for one year into `accident_map_<state>_<year>.png`.
pub fn map_state(
    state: impl Into<StateCode>,
    year: impl Into<Year>,
) -> Result<MapOutcome, MapError> {
    StateMapPlotter::new(DataLoader::default(), MapStyle::default(), ".").map_state(state, year)
}
