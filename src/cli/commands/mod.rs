//! Command implementations for the eva2rinex CLI
//!
//! Each command lives in its own module; `shared` holds the logging,
//! configuration and reporting pieces they have in common.

pub mod convert;
pub mod filename;
pub mod shared;

pub use shared::ConvertStats;

use crate::cli::args::Commands;
use crate::Result;

/// Dispatch to the selected subcommand:
/// - `convert`: the full log-to-RINEX conversion workflow
/// - `filename`: derive the output file name for a date
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Convert(convert_args) => convert::run_convert(convert_args).map(|_| ()),
        Commands::Filename(filename_args) => filename::run_filename(filename_args),
    }
}
