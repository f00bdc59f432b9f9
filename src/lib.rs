//! Eva2Rinex Library
//!
//! A Rust library for converting BEV meteorological sensor logs into
//! RINEX-compliant meteorological data files.
//!
//! This library provides tools for:
//! - Parsing EVA700 outdoor and Vaisala indoor sensor log lines with strict
//!   per-record validation
//! - Time-ordered storage of measurement records with range and day queries
//! - Merging outdoor and indoor readings into unified per-timestamp records
//! - Rendering station metadata and measurement records in the fixed-width
//!   RINEX meteorological layout (Version 2.11, Version 3.03, BIPM and CCTF
//!   dialects), including RINEX file naming and Modified Julian Date
//!   arithmetic

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod data_log;
        pub mod eva_parser;
        pub mod merger;
        pub mod rinex;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{EvaRecord, SensorBouquet, SensorRecord, VaisalaRecord};
pub use app::services::rinex::RinexVariant;
pub use config::Config;

/// Result type alias for eva2rinex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the conversion workflow.
///
/// Per-line parse failures are not represented here: they are recovered
/// locally by dropping the offending line and are reported through
/// [`app::services::eva_parser::ParseStats`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The date argument does not name a supported calendar day
    #[error("Invalid date argument '{value}': expected yyyymmdd, 2020-01-01 or later")]
    InvalidDateArgument { value: String },

    /// Header rendering produced no output (fewer than 3 configured sensors)
    #[error("RINEX header could not be rendered: fewer than {minimum} sensor descriptions")]
    EmptyHeader { minimum: usize },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid date argument error
    pub fn invalid_date_argument(value: impl Into<String>) -> Self {
        Self::InvalidDateArgument {
            value: value.into(),
        }
    }

    /// Create an empty header error
    pub fn empty_header() -> Self {
        Self::EmptyHeader {
            minimum: constants::MIN_HEADER_SENSORS,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
