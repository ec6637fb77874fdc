//! FARS state codes.
//!
//! FARS identifies states by their FIPS numeric code. Codes 43 (Puerto Rico)
//! and 52 (Virgin Islands) appear in some releases.

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;

/// Numeric `STATE` code as used in the accident files.
///
/// Fractional inputs are truncated toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateCode(i64);

impl StateCode {
    pub fn new(code: i64) -> Self {
        Self(code)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for StateCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

impl From<i32> for StateCode {
    fn from(code: i32) -> Self {
        Self(i64::from(code))
    }
}

impl From<f64> for StateCode {
    fn from(code: f64) -> Self {
        Self(code.trunc() as i64)
    }
}

impl FromStr for StateCode {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(code) => Ok(Self(code)),
            Err(_) => s.parse::<f64>().map(Self::from),
        }
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state or territory known to FARS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub code: i64,
    pub abbreviation: &'static str,
    pub name: &'static str,
}

const fn state(code: i64, abbreviation: &'static str, name: &'static str) -> StateInfo {
    StateInfo {
        code,
        abbreviation,
        name,
    }
}

pub const STATES: [StateInfo; 53] = [
    state(1, "AL", "Alabama"),
    state(2, "AK", "Alaska"),
    state(4, "AZ", "Arizona"),
    state(5, "AR", "Arkansas"),
    state(6, "CA", "California"),
    state(8, "CO", "Colorado"),
    state(9, "CT", "Connecticut"),
    state(10, "DE", "Delaware"),
    state(11, "DC", "District of Columbia"),
    state(12, "FL", "Florida"),
    state(13, "GA", "Georgia"),
    state(15, "HI", "Hawaii"),
    state(16, "ID", "Idaho"),
    state(17, "IL", "Illinois"),
    state(18, "IN", "Indiana"),
    state(19, "IA", "Iowa"),
    state(20, "KS", "Kansas"),
    state(21, "KY", "Kentucky"),
    state(22, "LA", "Louisiana"),
    state(23, "ME", "Maine"),
    state(24, "MD", "Maryland"),
    state(25, "MA", "Massachusetts"),
    state(26, "MI", "Michigan"),
    state(27, "MN", "Minnesota"),
    state(28, "MS", "Mississippi"),
    state(29, "MO", "Missouri"),
    state(30, "MT", "Montana"),
    state(31, "NE", "Nebraska"),
    state(32, "NV", "Nevada"),
    state(33, "NH", "New Hampshire"),
    state(34, "NJ", "New Jersey"),
    state(35, "NM", "New Mexico"),
    state(36, "NY", "New York"),
    state(37, "NC", "North Carolina"),
    state(38, "ND", "North Dakota"),
    state(39, "OH", "Ohio"),
    state(40, "OK", "Oklahoma"),
    state(41, "OR", "Oregon"),
    state(42, "PA", "Pennsylvania"),
    state(43, "PR", "Puerto Rico"),
    state(44, "RI", "Rhode Island"),
    state(45, "SC", "South Carolina"),
    state(46, "SD", "South Dakota"),
    state(47, "TN", "Tennessee"),
    state(48, "TX", "Texas"),
    state(49, "UT", "Utah"),
    state(50, "VT", "Vermont"),
    state(51, "VA", "Virginia"),
    state(52, "VI", "Virgin Islands"),
    state(53, "WA", "Washington"),
    state(54, "WV", "West Virginia"),
    state(55, "WI", "Wisconsin"),
    state(56, "WY", "Wyoming"),
];

pub fn lookup(code: i64) -> Option<&'static StateInfo> {
    STATES.iter().find(|s| s.code == code)
}

/// Human label for a code, falling back to the bare number.
pub fn label(code: i64) -> String {
    match lookup(code) {
        Some(info) => format!("{} ({})", info.name, info.abbreviation),
        None => format!("state {code}"),
    }
}
