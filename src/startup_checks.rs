//! Startup requirement validation for procmon.
//!
//! This module validates that the target process can be read and that the
//! external programs are installed before the sampling loop starts.

use nix::sys::stat::stat;
use nix::unistd::geteuid;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use procmon::process::{parse_stat, PROC_ROOT};

use crate::config::Config;

/// Validate all runtime requirements
pub fn validate_requirements(pid: &str, config: &Config) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_proc_access(pid)?;
    check_ownership(pid);
    check_program("renderer", config.renderer())?;
    if config.show_graphs() {
        check_program("viewer", config.viewer())?;
    }

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Check that /proc/<pid>/stat exists and parses
fn check_proc_access(pid: &str) -> Result<(), ValidationError> {
    let stat_path = Path::new(PROC_ROOT).join(pid).join("stat");

    match fs::read_to_string(&stat_path) {
        Ok(content) => match parse_stat(&content) {
            Ok(_) => {
                info!("✅ {} readable", stat_path.display());
                Ok(())
            }
            Err(e) => Err(ValidationError::MalformedStat(e)),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ValidationError::ProcessNotFound(pid.to_string()))
        }
        Err(e) => Err(ValidationError::InsufficientPermissions(format!(
            "{}: {}",
            stat_path.display(),
            e
        ))),
    }
}

/// Note when the target belongs to another user; stat stays readable but
/// the process may exit or be restarted out of our control.
fn check_ownership(pid: &str) {
    let proc_path = Path::new(PROC_ROOT).join(pid);
    match stat(&proc_path) {
        Ok(st) => {
            let euid = geteuid();
            if st.st_uid != euid.as_raw() && !euid.is_root() {
                warn!(
                    "⚠️  Process {} is owned by uid {} (running as uid {})",
                    pid, st.st_uid, euid
                );
            } else {
                debug!("Process {} owner uid {}", pid, st.st_uid);
            }
        }
        Err(e) => debug!("Could not stat {}: {}", proc_path.display(), e),
    }
}

/// Check that an external program can be found
fn check_program(role: &'static str, program: &str) -> Result<(), ValidationError> {
    match which::which(program) {
        Ok(path) => {
            info!("✅ {} found at {}", role, path.display());
            Ok(())
        }
        Err(e) => Err(ValidationError::ProgramNotFound {
            role,
            program: program.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Process {0} not found")]
    ProcessNotFound(String),

    #[error("Insufficient permissions: {0}")]
    InsufficientPermissions(String),

    #[error("Unexpected stat format: {0}")]
    MalformedStat(String),

    #[error("{role} '{program}' not found: {reason}")]
    ProgramNotFound {
        role: &'static str,
        program: String,
        reason: String,
    },
}
