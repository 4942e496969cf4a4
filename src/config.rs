//! Configuration management for procmon.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use clap::ValueEnum;
use procmon::paths::DEFAULT_OUTPUT_DIR;
use procmon::render::{DEFAULT_RENDERER, DEFAULT_VIEWER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations searched when no `--config` is given.
const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "/etc/procmon/procmon.yaml",
    "/etc/procmon/procmon.yml",
    "./procmon.yaml",
    "./procmon.json",
];

/// Runtime configuration. Sampling period and history size are fixed and
/// not configurable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding the log, script and images
    #[serde(alias = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Chart renderer program
    pub renderer: Option<String>,

    /// Image viewer program
    pub viewer: Option<String>,

    /// Open the charts in the viewer after the first redraw
    #[serde(alias = "show-graphs")]
    pub show_graphs: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
            renderer: Some(DEFAULT_RENDERER.into()),
            viewer: Some(DEFAULT_VIEWER.into()),
            show_graphs: Some(true),
            log_level: Some("info".into()),
        }
    }
}

impl Config {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn renderer(&self) -> &str {
        self.renderer.as_deref().unwrap_or(DEFAULT_RENDERER)
    }

    pub fn viewer(&self) -> &str {
        self.viewer.as_deref().unwrap_or(DEFAULT_VIEWER)
    }

    pub fn show_graphs(&self) -> bool {
        self.show_graphs.unwrap_or(true)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.renderer().trim().is_empty() {
        return Err("renderer must not be empty".into());
    }
    if cfg.show_graphs() && cfg.viewer().trim().is_empty() {
        return Err("viewer must not be empty when show_graphs is enabled".into());
    }

    let dir = cfg.output_dir();
    match fs::metadata(&dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(format!("output_dir is not a directory: {}", dir.display()).into());
        }
        Err(e) => {
            return Err(format!("output_dir is not accessible: {} ({})", dir.display(), e).into());
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            return Err(format!(
                "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                level
            )
            .into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(dir) = &args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(renderer) = &args.renderer {
        config.renderer = Some(renderer.clone());
    }
    if let Some(viewer) = &args.viewer {
        config.viewer = Some(viewer.clone());
    }
    if args.no_viewer {
        config.show_graphs = Some(false);
    }

    Ok(config)
}

/// Loads the config file by extension, or defaults when none is found.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    if !path.exists() {
        return Err(format!("Config file not found: {}", path.display()).into());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Serializes a config in the requested format.
pub fn format_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_config(config, &format)?);
    Ok(())
}
