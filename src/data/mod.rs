//! Data module - accident file loading, typed rows and summaries

mod filename;
mod loader;
mod processor;
mod record;
mod summary;

pub use filename::{resolve_filename, Year};
pub use loader::{DataLoader, LoaderError, YearLoad, YEAR_COL};
pub use processor::{DataProcessor, SummaryError};
pub use record::{
    AccidentRecord, AccidentTable, LATITUDE_COL, LATITUDE_SENTINEL, LONGITUDE_COL,
    LONGITUDE_SENTINEL, MONTH_COL, STATE_COL,
};
pub use summary::{MonthCounts, YearSummary};
