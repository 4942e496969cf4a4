//! Check command implementation.
//!
//! Validates system requirements and configuration for one target process.

use procmon::{MetricSource, OutputPaths, ProcStatReader, SampleStore, SystemConstants};

use crate::config::{validate_effective_config, Config};
use crate::startup_checks::validate_requirements;

/// Validates system requirements and configuration.
pub fn command_check(pid: &str, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 procmon - System Check");
    println!("=========================");

    let mut all_ok = true;

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📁 Checking process and tools...");
    match validate_requirements(pid, config) {
        Ok(_) => println!("   ✅ Process {} and external programs available", pid),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n💾 Checking accounting data...");
    let constants = SystemConstants::detect();
    println!(
        "   ℹ️  page size {} bytes, {} clock ticks/s",
        constants.page_size_bytes, constants.clock_ticks_per_second
    );
    let mut reader = ProcStatReader::new(pid, constants);
    match reader.measure() {
        Ok(sample) => println!(
            "   ✅ VMEM={:.3}MB RSS={:.3}MB CPU time={:.2}s",
            sample.virtual_memory_mb, sample.resident_set_mb, sample.total_cpu_seconds
        ),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    let paths = OutputPaths::new(&config.output_dir(), pid);
    let store = SampleStore::new(paths.log());
    match store.rows() {
        Ok(rows) if rows.is_empty() => {
            println!("   ℹ️  No history at {}", store.path().display())
        }
        Ok(rows) => println!(
            "   ℹ️  Existing history: {} of {} rows at {}",
            rows.len(),
            store.capacity(),
            store.path().display()
        ),
        Err(e) => println!("   ⚠️  {}", e),
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - ready to monitor process {}", pid);
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
