//! Parsing of `/proc/<pid>/stat`.
//!
//! Field numbers follow proc(5), which counts from 1: `pid` is field 1,
//! `comm` is field 2, `utime` is field 14 and so on.

use std::fs;
use std::path::Path;

/// Field holding user-mode CPU time in clock ticks.
pub const FIELD_UTIME: usize = 14;
/// Field holding kernel-mode CPU time in clock ticks.
pub const FIELD_STIME: usize = 15;
/// Field holding virtual memory size in bytes.
pub const FIELD_VSIZE: usize = 23;
/// Field holding resident set size in pages.
pub const FIELD_RSS: usize = 24;

/// The raw counters of one stat snapshot, before any unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAccounting {
    pub user_ticks: u64,
    pub kernel_ticks: u64,
    pub vsize_bytes: u64,
    pub rss_pages: u64,
}

/// A stat line split into its numbered fields.
struct StatFields<'a> {
    /// Fields 3.. (everything after the closing paren of `comm`).
    rest: Vec<&'a str>,
}

impl<'a> StatFields<'a> {
    fn split(content: &'a str) -> Result<Self, String> {
        // comm may contain spaces and ')' so anchor on the last one
        let close = content
            .rfind(')')
            .ok_or_else(|| "Invalid stat format: missing comm field".to_string())?;
        let rest = content[close + 1..].split_whitespace().collect();
        Ok(Self { rest })
    }

    /// Returns 1-based field `n` (n >= 3).
    fn get(&self, n: usize) -> Option<&'a str> {
        self.rest.get(n.checked_sub(3)?).copied()
    }

    fn parse_u64(&self, n: usize) -> Result<u64, String> {
        let raw = self
            .get(n)
            .ok_or_else(|| format!("Invalid stat format: field {} missing", n))?;
        raw.parse()
            .map_err(|_| format!("Failed to parse stat field {}: {:?}", n, raw))
    }
}

/// Parses the counters this tool needs out of one stat line.
pub fn parse_stat(content: &str) -> Result<RawAccounting, String> {
    let fields = StatFields::split(content)?;

    // rss is signed in the kernel's format; a negative value means no pages
    let rss_pages = match fields.get(FIELD_RSS) {
        Some(v) if v.starts_with('-') => 0,
        _ => fields.parse_u64(FIELD_RSS)?,
    };

    Ok(RawAccounting {
        user_ticks: fields.parse_u64(FIELD_UTIME)?,
        kernel_ticks: fields.parse_u64(FIELD_STIME)?,
        vsize_bytes: fields.parse_u64(FIELD_VSIZE)?,
        rss_pages,
    })
}

/// Reads and parses `<proc_path>/stat`.
pub fn read_stat(proc_path: &Path) -> Result<RawAccounting, std::io::Error> {
    let content = fs::read_to_string(proc_path.join("stat"))?;
    parse_stat(&content).map_err(std::io::Error::other)
}
