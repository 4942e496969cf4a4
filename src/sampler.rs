//! The sampling loop: measure, derive, store, render.
//!
//! Each cycle takes two samples one period apart. The CPU time consumed
//! between them divided by the period is the CPU percentage, so no
//! wall-clock bookkeeping is needed. The later sample supplies the memory
//! figures. The row is appended to the rolling history (rotating first),
//! the charts are redrawn, and after the first successful redraw the viewer
//! is started once.

use std::convert::Infallible;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::MonitorError;
use crate::paths::OutputPaths;
use crate::process::{MetricSource, Sample};
use crate::render::RenderTrigger;
use crate::script::write_script;
use crate::store::{HistoryRow, SampleStore};

/// Time between the two samples of a cycle.
pub const SAMPLING_PERIOD: Duration = Duration::from_secs(1);

/// CPU usage over `period` given two cumulative CPU-time samples, in whole percent.
pub fn cpu_percent(before: &Sample, after: &Sample, period: Duration) -> i64 {
    let delta = after.total_cpu_seconds - before.total_cpu_seconds;
    (delta / period.as_secs_f64() * 100.0).round() as i64
}

/// Whether the image viewer has been started in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    NotLaunched,
    Launched,
    /// Viewer turned off by configuration.
    Disabled,
}

/// Drives one monitoring run.
pub struct SamplingLoop<S, R> {
    source: S,
    store: SampleStore,
    renderer: R,
    paths: OutputPaths,
    period: Duration,
    viewer: ViewerState,
    sleep: fn(Duration),
    cycles: u64,
}

impl<S: MetricSource, R: RenderTrigger> SamplingLoop<S, R> {
    pub fn new(source: S, store: SampleStore, renderer: R, paths: &OutputPaths) -> Self {
        Self {
            source,
            store,
            renderer,
            paths: paths.clone(),
            period: SAMPLING_PERIOD,
            viewer: ViewerState::NotLaunched,
            sleep: std::thread::sleep,
            cycles: 0,
        }
    }

    /// Never start the viewer.
    pub fn without_viewer(mut self) -> Self {
        self.viewer = ViewerState::Disabled;
        self
    }

    /// Replaces the blocking sleep between the two samples of a cycle.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    pub fn viewer_state(&self) -> ViewerState {
        self.viewer
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Writes the chart script and discards any previous history.
    pub fn init(&mut self) -> Result<(), MonitorError> {
        write_script(&self.paths, self.store.capacity())?;
        self.store.reset()?;
        info!(
            "Recording to {} ({} rows, period {:?})",
            self.store.path().display(),
            self.store.capacity(),
            self.period
        );
        Ok(())
    }

    /// Takes one measurement pair and records it; returns the appended row.
    fn sample_once(&mut self) -> Result<HistoryRow, MonitorError> {
        let before = self.source.measure()?;
        (self.sleep)(self.period);
        let after = self.source.measure()?;

        let row = HistoryRow::new(&after, cpu_percent(&before, &after, self.period));
        self.store.rotate()?;
        self.store.append(&row)?;
        Ok(row)
    }

    /// One full cycle: sample, record, redraw, and start the viewer if needed.
    pub fn run_cycle(&mut self) -> Result<HistoryRow, MonitorError> {
        let row = self.sample_once()?;
        self.renderer.render()?;
        self.ensure_viewer()?;

        self.cycles += 1;
        debug!(
            "Cycle {}: vmem={} MB rss={} MB cpu={}%",
            self.cycles, row.virtual_memory_mb, row.resident_set_mb, row.cpu_percent
        );
        Ok(row)
    }

    fn ensure_viewer(&mut self) -> Result<(), MonitorError> {
        if self.viewer == ViewerState::NotLaunched {
            self.renderer.show(&self.paths.images())?;
            self.viewer = ViewerState::Launched;
        }
        Ok(())
    }

    /// Runs cycles until one fails.
    pub fn run(&mut self) -> Result<Infallible, MonitorError> {
        loop {
            self.run_cycle()?;
        }
    }
}
