//! Sample command implementation.
//!
//! Runs sampling cycles against a process and prints each derived row,
//! leaving the history log and the charts untouched.

use std::thread;
use std::time::Instant;

use procmon::{cpu_percent, HistoryRow, MetricSource, ProcStatReader, SystemConstants, SAMPLING_PERIOD};

/// Prints `iterations` sampling cycles for `pid`.
pub fn command_sample(pid: &str, iterations: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧪 procmon - Sample Mode (pid {})", pid);
    println!("================================");

    let constants = SystemConstants::detect();
    let mut reader = ProcStatReader::new(pid, constants);

    println!("{:>5}  {:>12}  {:>12}  {:>6}", "cycle", "VMEM MB", "RSS MB", "% CPU");
    for iteration in 1..=iterations {
        let start = Instant::now();
        let before = reader.measure()?;
        thread::sleep(SAMPLING_PERIOD);
        let after = reader.measure()?;

        let row = HistoryRow::new(&after, cpu_percent(&before, &after, SAMPLING_PERIOD));
        println!(
            "{:>5}  {:>12.3}  {:>12.3}  {:>6}",
            iteration, row.virtual_memory_mb, row.resident_set_mb, row.cpu_percent
        );
        tracing::debug!("Cycle {} took {:?}", iteration, start.elapsed());
    }

    Ok(())
}
