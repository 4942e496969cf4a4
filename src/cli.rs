//! CLI arguments and subcommands for procmon.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "procmon",
    about = "Chart the memory and CPU usage of one process",
    long_about = "Chart the memory and CPU usage of one process.\n\n\
                  Samples /proc/<PID>/stat once per second, keeps the last 1200 samples in \
                  /tmp/procmon-<PID>-.log and redraws a memory chart and a CPU chart with \
                  gnuplot after every sample. The charts are opened in an image viewer after \
                  the first redraw. Runs until interrupted.",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Process id to monitor
    pub pid: Option<String>,

    /// Log level (overrides log_level from the config file) [default: info]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Directory for the history log, chart script and images
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Chart renderer program (run as `<renderer> <script>`)
    #[arg(long)]
    pub renderer: Option<String>,

    /// Image viewer program (run as `<viewer> <image>`)
    #[arg(long)]
    pub viewer: Option<String>,

    /// Do not open the charts in an image viewer
    #[arg(long)]
    pub no_viewer: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and system requirements for a process
    Check {
        /// Process id to check
        pid: String,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Print sampling cycles to stdout without recording or charting
    Sample {
        /// Process id to sample
        pid: String,

        /// Number of sampling cycles
        #[arg(short = 'n', long, default_value_t = 5)]
        iterations: usize,
    },
}
