//! Fixture writers for unit tests.

use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::data::resolve_filename;

pub struct AccidentRow {
    pub month: i64,
    pub state: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl AccidentRow {
    pub fn new(month: i64, state: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            month,
            state,
            latitude,
            longitude,
        }
    }
}

/// Write `accident_<year>.csv.bz2` into `dir` with a FARS-like header.
pub fn write_accident_file(dir: &Path, year: i64, rows: &[AccidentRow]) -> PathBuf {
    let mut csv = String::from("STATE,ST_CASE,MONTH,DAY,LATITUDE,LONGITUD,FATALS\n");
    for (i, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{},{},{},1\n",
            row.state,
            row.state * 10_000 + i as i64,
            row.month,
            (i % 28) + 1,
            row.latitude,
            row.longitude
        ));
    }
    write_raw_file(dir, year, &csv)
}

/// Compress arbitrary CSV bytes into the year's file.
pub fn write_raw_file(dir: &Path, year: i64, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(resolve_filename(year));
    let file = File::create(&path).unwrap();
    let mut encoder = BzEncoder::new(file, Compression::default());
    encoder.write_all(contents.as_ref()).unwrap();
    encoder.finish().unwrap();
    path
}
