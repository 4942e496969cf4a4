//! Process accounting: reading `/proc/<pid>/stat` and converting it to samples.
//!
//! This module provides:
//! - `stat`: field extraction from the stat line
//! - `sample`: unit conversion and the per-run OS constants
//! - `reader`: the `MetricSource` trait and its procfs implementation

pub mod reader;
pub mod sample;
pub mod stat;

// Re-export commonly used types
pub use reader::{MetricSource, ProcStatReader, PROC_ROOT};
pub use sample::{Sample, SystemConstants};
pub use stat::{parse_stat, read_stat, RawAccounting};
