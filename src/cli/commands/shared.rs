//! Shared components for CLI commands
//!
//! Logging setup, configuration layering, progress reporting and the
//! end-of-run summary used by the command implementations.

use crate::cli::args::ConvertArgs;
use crate::config::Config;
use crate::Result;
use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info};

/// Conversion statistics for the end-of-run report
#[derive(Debug, Clone, Default)]
pub struct ConvertStats {
    /// Number of outdoor log lines read
    pub lines_read: usize,
    /// Number of outdoor records parsed
    pub records_parsed: usize,
    /// Number of outdoor lines dropped as malformed
    pub lines_rejected: usize,
    /// Number of indoor records parsed (CCTF only)
    pub indoor_records_parsed: usize,
    /// Outdoor records that received indoor channels
    pub indoor_matched: usize,
    /// Outdoor records with no indoor reading inside the tolerance
    pub indoor_missed: usize,
    /// Number of data lines written to the output file
    pub records_written: usize,
    /// The written output file
    pub output_file: PathBuf,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

/// Set up structured logging for the convert command
pub fn setup_logging(args: &ConvertArgs) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("eva2rinex={}", log_level)));

    // try_init: a subscriber may already be installed when commands run
    // repeatedly inside one process
    if args.quiet {
        // Minimal logging for quiet mode
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init();
    } else {
        // Standard logging with timestamps
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> args)
pub fn load_configuration(args: &ConvertArgs) -> Result<Config> {
    info!("Loading configuration");

    let mut config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            Config::load(path)?
        }
        None => {
            if let Some(path) = Config::default_path().filter(|p| p.is_file()) {
                info!("Using config file: {}", path.display());
            }
            Config::load_default()?
        }
    };

    apply_cli_overrides(&mut config, args);
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ConvertArgs) {
    if let Some(input_dir) = &args.input_dir {
        config.input_directory = input_dir.clone();
    }
    if let Some(indoor_dir) = &args.indoor_dir {
        config.indoor_input_directory = indoor_dir.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_directory = output_dir.clone();
    }
    if let Some(rinex_type) = &args.rinex_type {
        config.rinex_type = rinex_type.clone();
    }
    config.verbose = config.verbose || args.verbose > 0;
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Print the end-of-run summary block. Suppressed in quiet mode.
pub fn report_summary(stats: &ConvertStats, quiet: bool) {
    if quiet {
        return;
    }

    println!();
    println!("{}", "Conversion complete".green().bold());
    println!(
        "  Output file:       {}",
        stats.output_file.display().to_string().cyan()
    );
    println!("  Lines read:        {}", stats.lines_read);
    println!("  Records parsed:    {}", stats.records_parsed);
    if stats.lines_rejected > 0 {
        println!(
            "  Lines rejected:    {}",
            stats.lines_rejected.to_string().yellow()
        );
    }
    if stats.indoor_records_parsed > 0 || stats.indoor_matched > 0 || stats.indoor_missed > 0 {
        println!("  Indoor records:    {}", stats.indoor_records_parsed);
        println!("  Indoor matched:    {}", stats.indoor_matched);
        if stats.indoor_missed > 0 {
            println!(
                "  Indoor missed:     {}",
                stats.indoor_missed.to_string().yellow()
            );
        }
    }
    println!("  Records written:   {}", stats.records_written);
    println!(
        "  Elapsed:           {}",
        HumanDuration(stats.processing_time)
    );
}
