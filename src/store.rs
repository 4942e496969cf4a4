//! File-backed rolling history of samples.
//!
//! The store is a plain text file with one row per sampling cycle, oldest
//! first. It never holds more than its capacity: [`SampleStore::rotate`]
//! trims it to `capacity - 1` rows before each append once it is full, which
//! gives a fixed-size sliding window that the chart script can plot by line
//! number.

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::MonitorError;
use crate::process::Sample;

/// Number of rows kept in the history (one per second, 20 minutes).
pub const HISTORY_CAPACITY: usize = 1200;

/// Rounds `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// One persisted history line: `<virtual MB> <resident MB> <cpu %>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRow {
    pub virtual_memory_mb: f64,
    pub resident_set_mb: f64,
    pub cpu_percent: i64,
}

impl HistoryRow {
    /// Builds a row from the later sample of a pair and its CPU percentage.
    pub fn new(sample: &Sample, cpu_percent: i64) -> Self {
        Self {
            virtual_memory_mb: round_to(sample.virtual_memory_mb, 3),
            resident_set_mb: round_to(sample.resident_set_mb, 3),
            cpu_percent,
        }
    }
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} {:.3} {}",
            self.virtual_memory_mb, self.resident_set_mb, self.cpu_percent
        )
    }
}

/// A history line that does not have three numeric fields.
#[derive(Debug, thiserror::Error)]
#[error("invalid history row {line:?}: {reason}")]
pub struct ParseRowError {
    pub line: String,
    pub reason: String,
}

impl FromStr for HistoryRow {
    type Err = ParseRowError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ParseRowError {
            line: line.to_string(),
            reason,
        };

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(invalid(format!("expected 3 fields, got {}", parts.len())));
        }

        let virtual_memory_mb = parts[0]
            .parse::<f64>()
            .map_err(|e| invalid(format!("virtual MB: {}", e)))?;
        let resident_set_mb = parts[1]
            .parse::<f64>()
            .map_err(|e| invalid(format!("resident MB: {}", e)))?;
        let cpu_percent = parts[2]
            .parse::<i64>()
            .map_err(|e| invalid(format!("cpu percent: {}", e)))?;

        Ok(Self {
            virtual_memory_mb,
            resident_set_mb,
            cpu_percent,
        })
    }
}

/// Bounded, append-only history file.
#[derive(Debug, Clone)]
pub struct SampleStore {
    path: PathBuf,
    capacity: usize,
}

impl SampleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, HISTORY_CAPACITY)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Deletes the history file if it exists.
    pub fn reset(&self) -> Result<(), MonitorError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed previous history {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MonitorError::io("Failed to remove", &self.path, e)),
        }
    }

    /// Trims the file to its newest `capacity - 1` rows once it is full.
    ///
    /// The trimmed copy is written next to the log and renamed over it, so a
    /// concurrent reader sees either the old or the new file, never a partial
    /// one. Returns whether anything was dropped.
    pub fn rotate(&self) -> Result<bool, MonitorError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(MonitorError::io("Failed to read", &self.path, e)),
        };

        let lines: Vec<&str> = content.lines().collect();
        if lines.len() < self.capacity {
            return Ok(false);
        }

        let keep = &lines[lines.len() - (self.capacity - 1)..];
        let tmp_path = self.tmp_path();

        write_lines(&tmp_path, keep)
            .map_err(|e| MonitorError::io("Failed to write", &tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| MonitorError::io("Failed to replace", &self.path, e))?;

        debug!(
            "Rotated {}: dropped {} row(s)",
            self.path.display(),
            lines.len() - keep.len()
        );
        Ok(true)
    }

    /// Appends one row as a newline-terminated line.
    pub fn append(&self, row: &HistoryRow) -> Result<(), MonitorError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| MonitorError::io("Failed to open", &self.path, e))?;

        // a single write keeps the line whole under O_APPEND
        file.write_all(format!("{}\n", row).as_bytes())
            .map_err(|e| MonitorError::io("Failed to append to", &self.path, e))
    }

    /// Reads back every persisted row, oldest first.
    pub fn rows(&self) -> Result<Vec<HistoryRow>, MonitorError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MonitorError::io("Failed to read", &self.path, e)),
        };

        content
            .lines()
            .map(|line| {
                line.parse::<HistoryRow>().map_err(|e| {
                    MonitorError::io(
                        "Malformed history in",
                        &self.path,
                        io::Error::new(io::ErrorKind::InvalidData, e),
                    )
                })
            })
            .collect()
    }

    /// Number of rows currently persisted.
    pub fn len(&self) -> Result<usize, MonitorError> {
        match fs::read_to_string(&self.path) {
            Ok(c) => Ok(c.lines().count()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(MonitorError::io("Failed to read", &self.path, e)),
        }
    }

    pub fn is_empty(&self) -> Result<bool, MonitorError> {
        Ok(self.len()? == 0)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn write_lines(path: &Path, lines: &[&str]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}
