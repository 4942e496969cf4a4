//! procmon library
//!
//! Samples the memory and CPU usage of a single Linux process once per
//! second, keeps the last 1200 samples in a text file and has gnuplot redraw
//! a memory chart and a CPU chart after every sample.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use procmon::{
//!     GnuplotRenderer, OutputPaths, ProcStatReader, SampleStore, SamplingLoop, SystemConstants,
//! };
//!
//! let pid = "1234";
//! let paths = OutputPaths::new(Path::new("/tmp"), pid);
//! let reader = ProcStatReader::new(pid, SystemConstants::detect());
//! let renderer = GnuplotRenderer::new("gnuplot", "eog", &paths.script());
//!
//! let mut sampler = SamplingLoop::new(reader, SampleStore::new(paths.log()), renderer, &paths);
//! sampler.init()?;
//! let err = match sampler.run() {
//!     Ok(never) => match never {},
//!     Err(e) => e,
//! };
//! eprintln!("{}", err);
//! # Ok::<(), procmon::MonitorError>(())
//! ```

pub mod error;
pub mod paths;
pub mod process;
pub mod render;
pub mod sampler;
pub mod script;
pub mod store;

// Re-export main types for convenience
pub use error::MonitorError;
pub use paths::OutputPaths;
pub use process::{MetricSource, ProcStatReader, Sample, SystemConstants};
pub use render::{GnuplotRenderer, RenderTrigger};
pub use sampler::{cpu_percent, SamplingLoop, ViewerState, SAMPLING_PERIOD};
pub use store::{HistoryRow, SampleStore, HISTORY_CAPACITY};
