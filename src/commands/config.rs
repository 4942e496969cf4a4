//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{format_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("procmon.yaml"),
    };

    let mut content = format_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# procmon Configuration
# ======================
#
# The sampling period (1s) and history size (1200 rows) are fixed.
#
# Output
# ------
# output_dir: "/tmp"           # Log, chart script and images go here as procmon-<pid>-*
#
# External Programs
# -----------------
# renderer: "gnuplot"          # Run as `<renderer> <script>` after every sample
# viewer: "eog"                # Run as `<viewer> <image>` once per chart
# show_graphs: true            # Open the charts after the first redraw
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
