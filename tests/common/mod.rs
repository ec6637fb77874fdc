#![allow(dead_code)]

use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Write a FARS-like `accident_<year>.csv.bz2` with one row per
/// `(month, state, latitude, longitude)`.
pub fn write_year(dir: &Path, year: i64, rows: &[(i64, i64, f64, f64)]) -> PathBuf {
    let mut csv = String::from("STATE,ST_CASE,VE_TOTAL,MONTH,DAY,HOUR,LATITUDE,LONGITUD,FATALS\n");
    for (i, (month, state, lat, lon)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{state},{},{},{month},{},{},{lat},{lon},1\n",
            state * 10_000 + i as i64,
            1 + i % 3,
            1 + i % 28,
            i % 24,
        ));
    }
    let path = dir.join(fars::resolve_filename(year));
    let mut encoder = BzEncoder::new(File::create(&path).unwrap(), Compression::default());
    encoder.write_all(csv.as_bytes()).unwrap();
    encoder.finish().unwrap();
    path
}

/// Log output collected from a scoped subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Run `f` with every event at `info` or above recorded here.
    pub fn record<T>(&self, f: impl FnOnce() -> T) -> T {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
