//! Command-line argument definitions for the EVA700 to RINEX converter
//!
//! The complete CLI interface, defined with the clap derive API.

use crate::constants::{earliest_plausible_timestamp, INPUT_DATE_FORMAT};
use crate::{Error, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the EVA700 to RINEX converter
///
/// Converts one calendar day of BEV meteorological sensor logs into a
/// RINEX meteorological data file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "eva2rinex",
    version,
    about = "Convert EVA700 meteorological sensor logs to RINEX met files",
    long_about = "Converts one calendar day of proprietary EVA700 outdoor sensor logs \
                  (optionally combined with an indoor Vaisala lab log) into a \
                  RINEX-compliant meteorological data file in one of four dialects: \
                  VERSION2, VERSION3, BIPM or CCTF."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert one day of sensor logs to a RINEX file (main command)
    Convert(ConvertArgs),
    /// Print the RINEX output file name for a date without converting
    Filename(FilenameArgs),
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Calendar day to convert, as yyyymmdd (e.g. 20210501)
    #[arg(value_name = "DATE", help = "Calendar day to convert (yyyymmdd)")]
    pub date: String,

    /// Directory holding the outdoor sensor logs
    ///
    /// The converter reads `<yyyymmdd>.TXT` from this directory. Defaults
    /// to the configured input directory.
    #[arg(
        short = 'i',
        long = "input-dir",
        value_name = "PATH",
        help = "Directory holding the outdoor <yyyymmdd>.TXT logs"
    )]
    pub input_dir: Option<PathBuf>,

    /// Directory holding the indoor Vaisala logs (CCTF output only)
    ///
    /// The converter reads `Vaisala_Data_<yyyymmdd>.TXT` from this
    /// directory. Defaults to the configured indoor input directory.
    #[arg(
        long = "indoor-dir",
        value_name = "PATH",
        help = "Directory holding the indoor Vaisala_Data_<yyyymmdd>.TXT logs"
    )]
    pub indoor_dir: Option<PathBuf>,

    /// Directory the RINEX file is written to
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "PATH",
        help = "Directory the RINEX file is written to"
    )]
    pub output_dir: Option<PathBuf>,

    /// Output dialect
    #[arg(
        short = 't',
        long = "rinex-type",
        value_name = "TYPE",
        help = "Output dialect: VERSION2, VERSION3, BIPM or CCTF"
    )]
    pub rinex_type: Option<String>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/eva2rinex/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the filename command
#[derive(Debug, Clone, Parser)]
pub struct FilenameArgs {
    /// Calendar day, as yyyymmdd
    #[arg(value_name = "DATE", help = "Calendar day (yyyymmdd)")]
    pub date: String,

    /// Output dialect the name is derived for
    #[arg(
        short = 't',
        long = "rinex-type",
        value_name = "TYPE",
        default_value = "CCTF",
        help = "Output dialect: VERSION2, VERSION3, BIPM or CCTF"
    )]
    pub rinex_type: String,
}

/// Parse a `yyyymmdd` argument into a calendar day.
///
/// Days before the 2020 epoch are rejected with the same lower bound the
/// record parser enforces; no sensor data exists for them and the MJD-based
/// file-naming schemes assume a five-digit MJD.
pub fn parse_date_argument(value: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| Error::invalid_date_argument(value))?;
    if date < earliest_plausible_timestamp().date_naive() {
        return Err(Error::invalid_date_argument(value));
    }
    Ok(date)
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

impl ConvertArgs {
    /// Validate the convert command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        parse_date_argument(&self.date)?;

        if let Some(input_dir) = &self.input_dir {
            if !input_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Input directory does not exist: {}",
                    input_dir.display()
                )));
            }
        }

        if let Some(indoor_dir) = &self.indoor_dir {
            if !indoor_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Indoor input directory does not exist: {}",
                    indoor_dir.display()
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// The calendar day named on the command line.
    pub fn parse_date(&self) -> Result<NaiveDate> {
        parse_date_argument(&self.date)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl FilenameArgs {
    /// The calendar day named on the command line.
    pub fn parse_date(&self) -> Result<NaiveDate> {
        parse_date_argument(&self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn convert_args(date: &str) -> ConvertArgs {
        ConvertArgs {
            date: date.to_string(),
            input_dir: None,
            indoor_dir: None,
            output_dir: None,
            rinex_type: None,
            config_file: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_date_argument_parsing() {
        let date = parse_date_argument("20210501").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 5, 1).unwrap());

        // Surrounding whitespace tolerated
        assert!(parse_date_argument(" 20210501 ").is_ok());

        // Wrong layout, impossible day, not a date
        assert!(parse_date_argument("2021-05-01").is_err());
        assert!(parse_date_argument("20210532").is_err());
        assert!(parse_date_argument("yesterday").is_err());
        assert!(parse_date_argument("").is_err());
    }

    #[test]
    fn test_pre_epoch_date_argument_is_rejected() {
        // Valid calendar days, but before any sensor data exists
        assert!(parse_date_argument("18590101").is_err());
        assert!(parse_date_argument("20191231").is_err());
        assert!(parse_date_argument("20200101").is_ok());
    }

    #[test]
    fn test_convert_args_validation() {
        let temp_dir = TempDir::new().unwrap();

        let mut args = convert_args("20210501");
        args.input_dir = Some(temp_dir.path().to_path_buf());
        assert!(args.validate().is_ok());

        let mut bad_date = convert_args("01.05.2021");
        bad_date.input_dir = Some(temp_dir.path().to_path_buf());
        assert!(bad_date.validate().is_err());

        let mut missing_dir = convert_args("20210501");
        missing_dir.input_dir = Some(PathBuf::from("/nonexistent/path"));
        assert!(missing_dir.validate().is_err());

        let mut missing_config = convert_args("20210501");
        missing_config.config_file = Some(PathBuf::from("/nonexistent/config.toml"));
        assert!(missing_config.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = convert_args("20210501");
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "trace");

        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }
}
