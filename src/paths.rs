//! File layout of one monitoring run.
//!
//! Every file lives under a prefix keyed by the target pid, e.g. for pid
//! 1234 in `/tmp`: `/tmp/procmon-1234-.log`, `/tmp/procmon-1234-cpu.png`,
//! `/tmp/procmon-1234-mem.png` and `/tmp/procmon-1234-gnuplot.script`.
//! A relative output directory is resolved against the working directory
//! so the chart script never depends on where the renderer is started.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default directory for generated files.
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp";

/// Paths of the log, images and chart script for one target process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    prefix: OsString,
}

impl OutputPaths {
    pub fn new(output_dir: &Path, pid: &str) -> Self {
        let dir = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
        Self {
            prefix: dir.join(format!("procmon-{}-", pid)).into_os_string(),
        }
    }

    fn path_of(&self, suffix: &str) -> PathBuf {
        let mut path = self.prefix.clone();
        path.push(suffix);
        PathBuf::from(path)
    }

    pub fn log(&self) -> PathBuf {
        self.path_of(".log")
    }

    pub fn cpu_png(&self) -> PathBuf {
        self.path_of("cpu.png")
    }

    pub fn mem_png(&self) -> PathBuf {
        self.path_of("mem.png")
    }

    pub fn script(&self) -> PathBuf {
        self.path_of("gnuplot.script")
    }

    /// Images shown by the viewer, CPU chart first.
    pub fn images(&self) -> [PathBuf; 2] {
        [self.cpu_png(), self.mem_png()]
    }
}
