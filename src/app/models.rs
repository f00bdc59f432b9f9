//! Data models for sensor log conversion
//!
//! This module contains the measurement record types: the two raw input
//! record schemas (outdoor EVA700, indoor Vaisala) and the unified sensor
//! record that feeds the RINEX encoder.

use crate::app::services::rinex::format::{format_epoch, format_observation};
use crate::constants::NULL_DATA;
use chrono::{DateTime, Utc};

/// Anything stored in a [`DataLog`](crate::app::services::data_log::DataLog)
/// is keyed by its measurement timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

// =============================================================================
// Raw Input Records
// =============================================================================

/// A single validated line of the outdoor EVA700 sensor log.
///
/// A record either parses completely (all 12 source columns, timestamp inside
/// the plausible range) or is rejected as a whole; partially parsed records
/// are never constructed. Values are stored as parsed, without unit
/// conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaRecord {
    /// Time of the measurement (UTC, second resolution)
    pub timestamp: DateTime<Utc>,
    /// Air temperature, analog channel, in °C
    pub temperature1: f64,
    /// Air temperature, digital channel, in °C
    pub temperature2: f64,
    /// Barometric pressure in hPa
    pub absolute_pressure: f64,
    /// Relative humidity in %
    pub relative_humidity: f64,
    /// Absolute humidity in g/m³
    pub absolute_humidity: f64,
    /// Dewpoint in °C
    pub dewpoint: f64,
    /// Mixing ratio in g/kg
    pub mixing_ratio: f64,
    /// Frostpoint in °C
    pub frostpoint: f64,
    /// Air flow in %
    pub air_flow: f64,
    /// Fan power in %
    pub fan_power: f64,
}

impl Timestamped for EvaRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A single validated line of the indoor (lab) Vaisala sensor log.
///
/// A narrower schema than [`EvaRecord`]: 4 source columns. The same
/// all-or-nothing validation applies.
#[derive(Debug, Clone, PartialEq)]
pub struct VaisalaRecord {
    /// Time of the measurement (UTC, second resolution)
    pub timestamp: DateTime<Utc>,
    /// Lab air temperature in °C
    pub temperature: f64,
    /// Lab relative humidity in %
    pub relative_humidity: f64,
}

impl Timestamped for VaisalaRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

// =============================================================================
// Unified Sensor Record
// =============================================================================

/// The set of sensor channels present in a unified record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorBouquet {
    /// Outdoor channels only: TD/HR/PR
    ExternalOnly,
    /// Outdoor channels plus the indoor TI/HI pair (CCTF output)
    ExternalAndInternal,
}

/// A merged per-timestamp measurement, ready for RINEX data-line rendering.
///
/// Created fresh per output run by the merger and immutable afterwards; the
/// bouquet is derived from which internal fields are present, never stored
/// independently. Field order in the output is fixed to TD HR PR (TI HI).
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    timestamp: DateTime<Utc>,
    air_temperature: f64,
    relative_humidity: f64,
    air_pressure: f64,
    internal_temperature: Option<f64>,
    internal_humidity: Option<f64>,
}

impl Timestamped for SensorRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl SensorRecord {
    /// A record carrying the external sensor channels only.
    pub fn external(
        timestamp: DateTime<Utc>,
        air_temperature: f64,
        relative_humidity: f64,
        air_pressure: f64,
    ) -> Self {
        Self {
            timestamp,
            air_temperature,
            relative_humidity,
            air_pressure,
            internal_temperature: None,
            internal_humidity: None,
        }
    }

    /// A record carrying external and internal (lab) sensor channels.
    pub fn with_internal(
        timestamp: DateTime<Utc>,
        air_temperature: f64,
        relative_humidity: f64,
        air_pressure: f64,
        internal_temperature: f64,
        internal_humidity: f64,
    ) -> Self {
        Self {
            timestamp,
            air_temperature,
            relative_humidity,
            air_pressure,
            internal_temperature: Some(internal_temperature),
            internal_humidity: Some(internal_humidity),
        }
    }

    pub fn air_temperature(&self) -> f64 {
        self.air_temperature
    }

    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity
    }

    pub fn air_pressure(&self) -> f64 {
        self.air_pressure
    }

    /// Internal temperature, or the format's missing-data sentinel when the
    /// record carries no indoor channels.
    pub fn internal_temperature(&self) -> f64 {
        self.internal_temperature.unwrap_or(NULL_DATA)
    }

    /// Internal humidity, or the format's missing-data sentinel when the
    /// record carries no indoor channels.
    pub fn internal_humidity(&self) -> f64 {
        self.internal_humidity.unwrap_or(NULL_DATA)
    }

    /// Derive the bouquet: both internal fields present means
    /// external + internal, anything else is external only.
    pub fn bouquet(&self) -> SensorBouquet {
        if self.internal_temperature.is_some() && self.internal_humidity.is_some() {
            SensorBouquet::ExternalAndInternal
        } else {
            SensorBouquet::ExternalOnly
        }
    }

    /// Format the record as one RINEX meteo data line (without newline).
    ///
    /// The epoch uses blank-padded single-digit components, followed by the
    /// observations right-justified to 7 characters with 1 decimal digit.
    /// Field order is fixed to TD HR PR (TI HI).
    pub fn to_rinex(&self) -> String {
        let epoch = format_epoch(self.timestamp);
        match self.bouquet() {
            SensorBouquet::ExternalOnly => format!(
                " {}{}{}{}",
                epoch,
                format_observation(self.air_temperature),
                format_observation(self.relative_humidity),
                format_observation(self.air_pressure),
            ),
            SensorBouquet::ExternalAndInternal => format!(
                " {}{}{}{}{}{}",
                epoch,
                format_observation(self.air_temperature),
                format_observation(self.relative_humidity),
                format_observation(self.air_pressure),
                format_observation(self.internal_temperature()),
                format_observation(self.internal_humidity()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_bouquet_derivation() {
        let external = SensorRecord::external(ts(2021, 5, 1, 10, 0, 0), 10.1, 55.0, 980.5);
        assert_eq!(external.bouquet(), SensorBouquet::ExternalOnly);

        let full =
            SensorRecord::with_internal(ts(2021, 5, 1, 10, 0, 0), 10.1, 55.0, 980.5, 23.2, 41.0);
        assert_eq!(full.bouquet(), SensorBouquet::ExternalAndInternal);
    }

    #[test]
    fn test_internal_accessors_substitute_sentinel() {
        let external = SensorRecord::external(ts(2021, 5, 1, 10, 0, 0), 10.1, 55.0, 980.5);
        assert_eq!(external.internal_temperature(), NULL_DATA);
        assert_eq!(external.internal_humidity(), NULL_DATA);
    }

    #[test]
    fn test_external_record_renders_three_fields() {
        let record = SensorRecord::external(ts(2021, 5, 1, 10, 0, 0), 10.1, 55.0, 980.5);
        assert_eq!(record.to_rinex(), " 21  5  1 10  0  0   10.1   55.0  980.5");
    }

    #[test]
    fn test_full_record_renders_five_fields() {
        let record =
            SensorRecord::with_internal(ts(2021, 5, 1, 10, 0, 0), 10.1, 55.0, 980.5, 23.2, 41.0);
        assert_eq!(
            record.to_rinex(),
            " 21  5  1 10  0  0   10.1   55.0  980.5   23.2   41.0"
        );
    }

    #[test]
    fn test_epoch_blank_padding_of_two_digit_components() {
        // Components of 10 or more keep their digits
        let record = SensorRecord::external(ts(2021, 12, 31, 23, 59, 58), -3.0, 100.0, 1013.2);
        assert_eq!(record.to_rinex(), " 21 12 31 23 59 58   -3.0  100.0 1013.2");
    }
}
