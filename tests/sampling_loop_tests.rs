//! Integration tests for the sampling loop.
//!
//! These tests drive `SamplingLoop` through its public API with a synthetic
//! metric source and a recording renderer, so many cycles can run without
//! sleeping or spawning gnuplot.

use std::path::PathBuf;
use std::time::Duration;

use procmon::{
    HistoryRow, MetricSource, MonitorError, OutputPaths, ProcStatReader, RenderTrigger, Sample,
    SampleStore, SamplingLoop, SystemConstants, ViewerState, HISTORY_CAPACITY,
};
use tempfile::tempdir;

/// Constant memory; cycle k burns k/100 CPU seconds, so its row reads k%.
struct SyntheticProcess {
    calls: u64,
    cpu_seconds: f64,
}

impl SyntheticProcess {
    fn new() -> Self {
        Self {
            calls: 0,
            cpu_seconds: 0.0,
        }
    }
}

impl MetricSource for SyntheticProcess {
    fn measure(&mut self) -> Result<Sample, MonitorError> {
        let cycle = self.calls / 2 + 1;
        if self.calls % 2 == 1 {
            self.cpu_seconds += cycle as f64 / 100.0;
        }
        self.calls += 1;

        Ok(Sample {
            virtual_memory_mb: 512.0,
            resident_set_mb: 64.0,
            total_cpu_seconds: self.cpu_seconds,
        })
    }
}

#[derive(Default)]
struct RecordingRenderer {
    renders: usize,
    shown: Vec<PathBuf>,
}

impl RenderTrigger for RecordingRenderer {
    fn render(&mut self) -> Result<(), MonitorError> {
        self.renders += 1;
        Ok(())
    }

    fn show(&mut self, images: &[PathBuf]) -> Result<(), MonitorError> {
        self.shown.extend_from_slice(images);
        Ok(())
    }
}

fn no_sleep(_: Duration) {}

#[test]
fn test_history_is_bounded_sliding_window() {
    let dir = tempdir().expect("Failed to create temp dir");
    let paths = OutputPaths::new(dir.path(), "1");
    let mut sampler = SamplingLoop::new(
        SyntheticProcess::new(),
        SampleStore::new(paths.log()),
        RecordingRenderer::default(),
        &paths,
    )
    .with_sleep(no_sleep);
    sampler.init().expect("init");

    for cycle in 1..=1205usize {
        let row = sampler.run_cycle().expect("cycle should succeed");
        assert_eq!(row.cpu_percent, cycle as i64);

        assert_eq!(
            sampler.store().len().unwrap(),
            cycle.min(HISTORY_CAPACITY)
        );
    }

    let rows = sampler.store().rows().unwrap();
    assert_eq!(rows.len(), 1200);
    assert_eq!(rows.first().unwrap().cpu_percent, 6);
    assert_eq!(rows.last().unwrap().cpu_percent, 1205);
    assert!(rows.windows(2).all(|w| w[1].cpu_percent == w[0].cpu_percent + 1));
    assert!(rows
        .iter()
        .all(|r| r.virtual_memory_mb == 512.0 && r.resident_set_mb == 64.0));

    assert_eq!(sampler.cycles(), 1205);
    assert_eq!(sampler.viewer_state(), ViewerState::Launched);
}

#[test]
fn test_viewer_started_once_with_both_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    let paths = OutputPaths::new(dir.path(), "1");
    let mut sampler = SamplingLoop::new(
        SyntheticProcess::new(),
        SampleStore::new(paths.log()),
        RecordingRenderer::default(),
        &paths,
    )
    .with_sleep(no_sleep);
    sampler.init().expect("init");

    assert_eq!(sampler.viewer_state(), ViewerState::NotLaunched);
    for _ in 0..5 {
        sampler.run_cycle().unwrap();
    }

    assert_eq!(sampler.viewer_state(), ViewerState::Launched);
    assert_eq!(sampler.renderer().renders, 5);
    assert_eq!(sampler.renderer().shown, paths.images().to_vec());
    assert_eq!(sampler.store().rows().unwrap().len(), 5);
}

#[test]
fn test_persisted_rows_match_returned_rows() {
    let dir = tempdir().expect("Failed to create temp dir");
    let paths = OutputPaths::new(dir.path(), "1");
    let mut sampler = SamplingLoop::new(
        SyntheticProcess::new(),
        SampleStore::new(paths.log()),
        RecordingRenderer::default(),
        &paths,
    )
    .with_sleep(no_sleep);
    sampler.init().expect("init");

    let returned: Vec<HistoryRow> = (0..10).map(|_| sampler.run_cycle().unwrap()).collect();
    assert_eq!(sampler.store().rows().unwrap(), returned);
}

#[test]
fn test_fresh_run_discards_previous_history() {
    let dir = tempdir().expect("Failed to create temp dir");
    let paths = OutputPaths::new(dir.path(), "1");
    let stale: String = (0..50).map(|i| format!("1.000 1.000 {}\n", i)).collect();
    std::fs::write(paths.log(), stale).unwrap();

    let mut sampler = SamplingLoop::new(
        SyntheticProcess::new(),
        SampleStore::new(paths.log()),
        RecordingRenderer::default(),
        &paths,
    )
    .with_sleep(no_sleep);
    sampler.init().expect("init");
    sampler.run_cycle().unwrap();

    assert_eq!(sampler.store().len().unwrap(), 1);
    assert!(paths.script().exists());
}

#[test]
fn test_vanished_process_stops_run_without_row() {
    let proc_root = tempdir().expect("Failed to create temp dir");
    let out = tempdir().expect("Failed to create temp dir");
    let pid_dir = proc_root.path().join("321");
    std::fs::create_dir(&pid_dir).unwrap();
    let stat = "321 (short lived) S 1 321 321 0 -1 0 0 0 0 0 100 0 0 0 20 0 1 0 1 1048576 256 0";
    std::fs::write(pid_dir.join("stat"), stat).unwrap();

    let constants = SystemConstants {
        page_size_bytes: 4096,
        clock_ticks_per_second: 100,
    };
    let paths = OutputPaths::new(out.path(), "321");
    let mut sampler = SamplingLoop::new(
        ProcStatReader::with_proc_root(proc_root.path(), "321", constants),
        SampleStore::new(paths.log()),
        RecordingRenderer::default(),
        &paths,
    )
    .with_sleep(no_sleep);
    sampler.init().expect("init");

    let row = sampler.run_cycle().expect("process still present");
    assert_eq!(row.virtual_memory_mb, 1.0);
    assert_eq!(row.resident_set_mb, 1.0);
    assert_eq!(row.cpu_percent, 0);

    std::fs::remove_dir_all(&pid_dir).unwrap();

    match sampler.run() {
        Err(MonitorError::ProcessUnavailable { pid, .. }) => assert_eq!(pid, "321"),
        other => panic!("expected ProcessUnavailable, got {:?}", other.err()),
    }
    assert_eq!(sampler.store().len().unwrap(), 1);
}
