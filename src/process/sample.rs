//! Unit conversion from raw stat counters to a [`Sample`].

use tracing::warn;

use super::stat::RawAccounting;

const BYTES_PER_MB: f64 = (1u64 << 20) as f64;

/// Page size fallback when sysconf fails.
const DEFAULT_PAGE_SIZE: u64 = 4096;
/// Clock tick fallback when sysconf fails (the usual USER_HZ).
const DEFAULT_CLK_TCK: u64 = 100;

/// OS constants needed to convert raw counters, resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemConstants {
    pub page_size_bytes: u64,
    pub clock_ticks_per_second: u64,
}

impl SystemConstants {
    /// Queries sysconf for the page size and clock tick rate.
    pub fn detect() -> Self {
        let page_size_bytes = sysconf_positive(libc::_SC_PAGESIZE).unwrap_or_else(|| {
            warn!(
                "sysconf(_SC_PAGESIZE) failed, assuming {} bytes",
                DEFAULT_PAGE_SIZE
            );
            DEFAULT_PAGE_SIZE
        });
        let clock_ticks_per_second = sysconf_positive(libc::_SC_CLK_TCK).unwrap_or_else(|| {
            warn!(
                "sysconf(_SC_CLK_TCK) failed, assuming {} ticks/s",
                DEFAULT_CLK_TCK
            );
            DEFAULT_CLK_TCK
        });

        Self {
            page_size_bytes,
            clock_ticks_per_second,
        }
    }
}

fn sysconf_positive(name: libc::c_int) -> Option<u64> {
    // SAFETY: sysconf has no preconditions; it returns -1 for unknown names
    let value = unsafe { libc::sysconf(name) };
    (value > 0).then_some(value as u64)
}

/// One converted measurement of the target process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub virtual_memory_mb: f64,
    pub resident_set_mb: f64,
    /// Cumulative user + kernel CPU time.
    pub total_cpu_seconds: f64,
}

impl Sample {
    pub fn from_raw(raw: &RawAccounting, constants: &SystemConstants) -> Self {
        let rss_bytes = raw.rss_pages as f64 * constants.page_size_bytes as f64;
        let ticks = raw.user_ticks as f64 + raw.kernel_ticks as f64;

        Self {
            virtual_memory_mb: raw.vsize_bytes as f64 / BYTES_PER_MB,
            resident_set_mb: rss_bytes / BYTES_PER_MB,
            total_cpu_seconds: ticks / constants.clock_ticks_per_second as f64,
        }
    }
}
