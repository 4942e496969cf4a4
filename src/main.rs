//! procmon - version 0.1.0
//!
//! Per-process memory and CPU charting with tracing logging.
//! This is the main entry point that starts the sampling loop and handles subcommands.

mod cli;
mod commands;
mod config;
mod startup_checks;

use clap::{CommandFactory, Parser, ValueEnum};
use std::convert::Infallible;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config, command_sample};
use config::{resolve_config, show_config, validate_effective_config, Config};
use procmon::{
    GnuplotRenderer, MetricSource, MonitorError, OutputPaths, ProcStatReader, RenderTrigger,
    SampleStore, SamplingLoop, SystemConstants,
};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = args
        .log_level
        .clone()
        .or_else(|| {
            config
                .log_level
                .as_deref()
                .and_then(|s| LogLevel::from_str(s, true).ok())
        })
        .unwrap_or(LogLevel::Info);

    let filter = match log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Logging initialized with level: {:?}", log_level);
    Ok(())
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Writes the chart script, clears old history and samples until an error.
fn run_monitor<S: MetricSource, R: RenderTrigger>(
    sampler: &mut SamplingLoop<S, R>,
) -> Result<Infallible, MonitorError> {
    sampler.init()?;
    sampler.run()
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format.clone());
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), format.clone(), *commented),

            Commands::Check { pid } => {
                let config = resolve_config(&args)?;
                setup_logging(&config, &args)?;
                command_check(pid, &config)
            }

            Commands::Sample { pid, iterations } => {
                let config = resolve_config(&args)?;
                setup_logging(&config, &args)?;
                command_sample(pid, *iterations)
            }
        };
    }

    let Some(pid) = args.pid.as_deref() else {
        Args::command().print_help()?;
        std::process::exit(2);
    };

    let config = load_validated_config(&args)?;
    setup_logging(&config, &args)?;

    info!("Starting procmon for pid {}", pid);

    if let Err(e) = startup_checks::validate_requirements(pid, &config) {
        warn!("⚠️  Startup validation failed: {}", e);
        warn!("   Continuing; the first failing operation will stop the run");
    }

    let constants = SystemConstants::detect();
    info!(
        "Page size {} bytes, {} clock ticks/s",
        constants.page_size_bytes, constants.clock_ticks_per_second
    );

    let paths = OutputPaths::new(&config.output_dir(), pid);
    let reader = ProcStatReader::new(pid, constants);
    let renderer = GnuplotRenderer::new(config.renderer(), config.viewer(), &paths.script());

    let mut sampler = SamplingLoop::new(reader, SampleStore::new(paths.log()), renderer, &paths);
    if !config.show_graphs() {
        info!("Viewer disabled; charts are written to {}", paths.mem_png().display());
        sampler = sampler.without_viewer();
    }

    match run_monitor(&mut sampler) {
        Ok(never) => match never {},
        Err(e) => {
            error!(
                "❌ Monitoring of pid {} stopped after {} cycle(s): {}",
                pid,
                sampler.cycles(),
                e
            );
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
