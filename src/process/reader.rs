//! Sources of [`Sample`]s for a single target process.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::sample::{Sample, SystemConstants};
use super::stat::read_stat;
use crate::error::MonitorError;

/// Default mount point of procfs.
pub const PROC_ROOT: &str = "/proc";

/// Something that can take a fresh measurement of the target process.
pub trait MetricSource {
    fn measure(&mut self) -> Result<Sample, MonitorError>;
}

/// Reads `/proc/<pid>/stat` on every call.
pub struct ProcStatReader {
    pid: String,
    proc_path: PathBuf,
    constants: SystemConstants,
}

impl ProcStatReader {
    pub fn new(pid: &str, constants: SystemConstants) -> Self {
        Self::with_proc_root(PROC_ROOT, pid, constants)
    }

    /// Reader rooted somewhere other than `/proc`.
    pub fn with_proc_root(
        proc_root: impl AsRef<Path>,
        pid: &str,
        constants: SystemConstants,
    ) -> Self {
        Self {
            pid: pid.to_string(),
            proc_path: proc_root.as_ref().join(pid),
            constants,
        }
    }

    pub fn pid(&self) -> &str {
        &self.pid
    }

    pub fn constants(&self) -> SystemConstants {
        self.constants
    }
}

impl MetricSource for ProcStatReader {
    fn measure(&mut self) -> Result<Sample, MonitorError> {
        let raw = read_stat(&self.proc_path).map_err(|e| {
            debug!("Failed to read stat for pid {}: {}", self.pid, e);
            MonitorError::unavailable(&self.pid, e.to_string())
        })?;

        Ok(Sample::from_raw(&raw, &self.constants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONSTANTS: SystemConstants = SystemConstants {
        page_size_bytes: 4096,
        clock_ticks_per_second: 100,
    };

    #[test]
    fn test_measure_reads_pid_directory() {
        let root = tempdir().expect("Failed to create temp dir");
        let pid_dir = root.path().join("4242");
        std::fs::create_dir(&pid_dir).expect("Failed to create pid dir");
        let stat = "4242 (worker) R 1 4242 4242 0 -1 4194304 0 0 0 0 250 50 0 0 20 0 1 0 100 2097152 512 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0";
        std::fs::write(pid_dir.join("stat"), stat).expect("Failed to write stat file");

        let mut reader = ProcStatReader::with_proc_root(root.path(), "4242", CONSTANTS);
        let sample = reader.measure().expect("measure should succeed");

        assert_eq!(sample.virtual_memory_mb, 2.0);
        assert_eq!(sample.resident_set_mb, 2.0);
        assert!((sample.total_cpu_seconds - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_missing_process_is_unavailable() {
        let root = tempdir().expect("Failed to create temp dir");
        let mut reader = ProcStatReader::with_proc_root(root.path(), "99999", CONSTANTS);

        match reader.measure() {
            Err(MonitorError::ProcessUnavailable { pid, .. }) => assert_eq!(pid, "99999"),
            other => panic!("expected ProcessUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_measure_non_numeric_pid_is_unavailable() {
        let mut reader = ProcStatReader::new("not-a-pid", CONSTANTS);
        assert!(matches!(
            reader.measure(),
            Err(MonitorError::ProcessUnavailable { .. })
        ));
    }

    #[test]
    fn test_measure_self() {
        let pid = std::process::id().to_string();
        let mut reader = ProcStatReader::new(&pid, SystemConstants::detect());
        let sample = reader.measure().expect("own stat must be readable");
        assert!(sample.virtual_memory_mb > 0.0);
        assert!(sample.resident_set_mb > 0.0);
    }
}
