//! Configuration management and validation.
//!
//! Settings are layered: compiled-in defaults, then an optional TOML file,
//! then command-line overrides applied by the CLI layer. The file lives at
//! `~/.config/eva2rinex/config.toml` unless a path is given explicitly.

use crate::app::services::rinex::RinexVariant;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed mean lab-climate values, substituted for the indoor channels when
/// CCTF output is requested but no indoor log exists for the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackInternal {
    /// Mean lab temperature in degrees Celsius
    pub temperature: f64,

    /// Mean lab relative humidity in percent
    pub humidity: f64,
}

/// Global configuration for a conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the outdoor `<yyyymmdd>.TXT` logs
    pub input_directory: PathBuf,

    /// Directory holding the indoor `Vaisala_Data_<yyyymmdd>.TXT` logs
    pub indoor_input_directory: PathBuf,

    /// Directory the RINEX file is written to
    pub output_directory: PathBuf,

    /// Output dialect token: VERSION2, VERSION3, BIPM or CCTF
    pub rinex_type: String,

    /// Substitute lab values for days without an indoor log (CCTF only)
    pub fallback_internal: Option<FallbackInternal>,

    /// Override the default agency name in the header
    pub agency_name: Option<String>,

    /// Override the default station (marker) name in the header
    pub station_name: Option<String>,

    /// Emit debug-level diagnostics
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from("."),
            indoor_input_directory: PathBuf::from("."),
            output_directory: PathBuf::from("."),
            rinex_type: "CCTF".to_string(),
            fallback_internal: None,
            agency_name: None,
            station_name: None,
            verbose: false,
        }
    }
}

impl Config {
    /// The default configuration file location,
    /// `~/.config/eva2rinex/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("eva2rinex").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text).map_err(|e| {
            Error::configuration(format!("invalid config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration file at the default location if one exists,
    /// otherwise fall back to compiled-in defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// The output dialect selected by `rinex_type`. Unrecognized tokens map
    /// to [`RinexVariant::Unknown`]; [`validate`](Self::validate) rejects
    /// those before any conversion starts.
    pub fn variant(&self) -> RinexVariant {
        RinexVariant::from_token(&self.rinex_type)
    }

    /// Check the settings for values that cannot produce output.
    pub fn validate(&self) -> Result<()> {
        if self.variant() == RinexVariant::Unknown {
            return Err(Error::configuration(format!(
                "unknown rinex_type '{}' (expected VERSION2, VERSION3, BIPM or CCTF)",
                self.rinex_type
            )));
        }
        if let Some(fallback) = &self.fallback_internal {
            if !(0.0..=100.0).contains(&fallback.humidity) {
                return Err(Error::configuration(format!(
                    "fallback_internal.humidity {} outside 0..=100",
                    fallback.humidity
                )));
            }
        }
        Ok(())
    }
}
