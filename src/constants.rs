//! Application constants for eva2rinex
//!
//! This module collects the format constants of the two sensor log layouts
//! and of the RINEX meteorological output, so the numbers live in one place.

use chrono::{DateTime, NaiveDate, Utc};

// =============================================================================
// Sensor Log Input Formats
// =============================================================================

/// Field separator in both sensor log formats
pub const FIELD_SEPARATOR: char = ';';

/// Number of columns in an EVA700 outdoor log line.
/// The format gained the mixing ratio column in August 2020; older 11-column
/// files are out of scope and are rejected.
pub const EVA_EXPECTED_COLUMNS: usize = 12;

/// Number of columns in a Vaisala indoor log line
pub const VAISALA_EXPECTED_COLUMNS: usize = 4;

/// Timestamp layout shared by both input formats, e.g. `2018-07-29 13:15:00`
pub const SENSOR_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Earliest plausible record timestamp. Source hardware occasionally logs
/// garbage clock values; anything before this day is dropped.
pub fn earliest_plausible_timestamp() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .expect("valid hardcoded date")
        .and_hms_opt(0, 0, 0)
        .expect("valid hardcoded time")
        .and_utc()
}

/// Matching tolerance when pairing an indoor record with an outdoor
/// timestamp, symmetric around the query
pub const DATE_MATCH_TOLERANCE_SECONDS: f64 = 120.0;

// =============================================================================
// RINEX Output Format
// =============================================================================

/// Missing-data sentinel according to Meteo_format_CCTF-V1.0.pdf.
/// A more logical choice would be f64::NAN, but output byte-compatibility
/// depends on the sentinel.
pub const NULL_DATA: f64 = 9999.9;

/// Default width of a consolidated header field
pub const DEFAULT_FIELD_WIDTH: usize = 20;

/// Width of the free-text portion of a header line (before the label column)
pub const HEADER_TEXT_WIDTH: usize = 60;

/// Minimum number of sensor descriptions a header must carry
pub const MIN_HEADER_SENSORS: usize = 3;

/// Epoch layout of a RINEX meteo data record, before blank-padding of
/// single-digit components
pub const RINEX_EPOCH_FORMAT: &str = "%y %m %d %H %M %S";

/// Epoch of the date serial number the MJD arithmetic is anchored to
/// (1899-12-30, the OLE automation date origin of the legacy tooling)
pub fn serial_date_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid hardcoded date")
}

/// Offset between the serial date epoch and the Modified Julian Date epoch
/// (1858-11-17). Must be reproduced exactly; file naming depends on it.
pub const SERIAL_TO_MJD_OFFSET: f64 = 15018.0;

// =============================================================================
// File Naming
// =============================================================================

/// Date layout of the day argument and of the input file base names
pub const INPUT_DATE_FORMAT: &str = "%Y%m%d";

/// Extension of both sensor log files
pub const INPUT_FILE_EXTENSION: &str = "TXT";

/// Prefix of the indoor (Vaisala) log file name
pub const INDOOR_FILE_PREFIX: &str = "Vaisala_Data_";

/// Build the outdoor input file name for a day, e.g. `20210501.TXT`
pub fn eva_input_file_name(date: NaiveDate) -> String {
    format!("{}.{}", date.format(INPUT_DATE_FORMAT), INPUT_FILE_EXTENSION)
}

/// Build the indoor input file name for a day, e.g. `Vaisala_Data_20210501.TXT`
pub fn vaisala_input_file_name(date: NaiveDate) -> String {
    format!(
        "{}{}.{}",
        INDOOR_FILE_PREFIX,
        date.format(INPUT_DATE_FORMAT),
        INPUT_FILE_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_file_names() {
        let date = NaiveDate::from_ymd_opt(2021, 5, 1).unwrap();
        assert_eq!(eva_input_file_name(date), "20210501.TXT");
        assert_eq!(vaisala_input_file_name(date), "Vaisala_Data_20210501.TXT");
    }

    #[test]
    fn test_serial_epoch_to_mjd_epoch_distance() {
        let mjd_epoch = NaiveDate::from_ymd_opt(1858, 11, 17).unwrap();
        let days = (serial_date_epoch() - mjd_epoch).num_days();
        assert_eq!(days as f64, SERIAL_TO_MJD_OFFSET);
    }
}
