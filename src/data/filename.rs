//! Year handling and data-file name resolution.

use serde::Serialize;
use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

/// A calendar year used to locate one annual FARS file.
///
/// Fractional inputs are truncated toward zero, so `2013.9` resolves to the
/// same file as `2013`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Year(i64);

impl Year {
    pub fn new(year: i64) -> Self {
        Self(year)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for Year {
    fn from(year: i64) -> Self {
        Self(year)
    }
}

impl From<i32> for Year {
    fn from(year: i32) -> Self {
        Self(i64::from(year))
    }
}

impl From<u32> for Year {
    fn from(year: u32) -> Self {
        Self(i64::from(year))
    }
}

impl From<f64> for Year {
    fn from(year: f64) -> Self {
        Self(year.trunc() as i64)
    }
}

impl FromStr for Year {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(year) => Ok(Self(year)),
            Err(_) => s.parse::<f64>().map(Self::from),
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of the data file holding one year of accidents.
pub fn resolve_filename(year: impl Into<Year>) -> String {
    format!("accident_{}.csv.bz2", year.into())
}
