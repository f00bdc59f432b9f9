//! Line parsing for the two sensor log formats
//!
//! Turns one raw text line into a validated measurement record or a
//! rejection. Parsing never panics and never aborts a run: a malformed line
//! is dropped and counted, nothing else.
//!
//! Both formats are semicolon-delimited with a quoted date and a quoted time
//! in the first two columns; the outdoor EVA700 layout carries 12 columns,
//! the indoor Vaisala layout 4.

use crate::app::models::{EvaRecord, VaisalaRecord};
use crate::constants::{
    earliest_plausible_timestamp, EVA_EXPECTED_COLUMNS, FIELD_SEPARATOR, SENSOR_TIMESTAMP_FORMAT,
    VAISALA_EXPECTED_COLUMNS,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

/// Why a single input line was dropped.
///
/// Always recovered locally; a rejection never propagates as a run error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseRejection {
    #[error("empty or whitespace-only line")]
    EmptyLine,

    #[error("expected {expected} fields, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("invalid timestamp '{text}'")]
    Timestamp { text: String },

    #[error("invalid numeric value '{text}'")]
    Numeric { text: String },

    #[error("timestamp {timestamp} outside the plausible range")]
    OutOfRange { timestamp: DateTime<Utc> },
}

impl EvaRecord {
    /// Parse one outdoor log line.
    ///
    /// `now` is the upper bound of the plausible timestamp range; records
    /// dated in the future (corrupted hardware clocks) are rejected.
    pub fn parse(line: &str, now: DateTime<Utc>) -> Result<Self, ParseRejection> {
        let tokens = split_fields(line, EVA_EXPECTED_COLUMNS)?;
        let timestamp = parse_timestamp(tokens[0], tokens[1])?;
        let record = Self {
            timestamp,
            temperature1: parse_numeric(tokens[2])?,
            temperature2: parse_numeric(tokens[3])?,
            absolute_pressure: parse_numeric(tokens[4])?,
            relative_humidity: parse_numeric(tokens[5])?,
            absolute_humidity: parse_numeric(tokens[6])?,
            dewpoint: parse_numeric(tokens[7])?,
            mixing_ratio: parse_numeric(tokens[8])?,
            frostpoint: parse_numeric(tokens[9])?,
            air_flow: parse_numeric(tokens[10])?,
            fan_power: parse_numeric(tokens[11])?,
        };
        check_timestamp_range(timestamp, now)?;
        Ok(record)
    }
}

impl VaisalaRecord {
    /// Parse one indoor log line. Same validation rules as the outdoor
    /// format, over the narrower 4-column schema.
    pub fn parse(line: &str, now: DateTime<Utc>) -> Result<Self, ParseRejection> {
        let tokens = split_fields(line, VAISALA_EXPECTED_COLUMNS)?;
        let timestamp = parse_timestamp(tokens[0], tokens[1])?;
        let record = Self {
            timestamp,
            temperature: parse_numeric(tokens[2])?,
            relative_humidity: parse_numeric(tokens[3])?,
        };
        check_timestamp_range(timestamp, now)?;
        Ok(record)
    }
}

/// Split a line on the field separator, discarding empty tokens produced by
/// consecutive delimiters, and check the exact column count.
fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, ParseRejection> {
    if line.trim().is_empty() {
        return Err(ParseRejection::EmptyLine);
    }
    let tokens: Vec<&str> = line
        .split(FIELD_SEPARATOR)
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.len() != expected {
        return Err(ParseRejection::ColumnCount {
            expected,
            found: tokens.len(),
        });
    }
    Ok(tokens)
}

/// Parse the quoted date and time tokens into a UTC timestamp.
///
/// Both tokens are stripped of quotation marks and joined with a single
/// space; the combined string must match the fixed, locale-independent
/// format exactly. No timezone conversion is performed.
fn parse_timestamp(date_token: &str, time_token: &str) -> Result<DateTime<Utc>, ParseRejection> {
    let combined = format!(
        "{} {}",
        strip_quotation_marks(date_token),
        strip_quotation_marks(time_token)
    );
    NaiveDateTime::parse_from_str(&combined, SENSOR_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseRejection::Timestamp { text: combined })
}

/// Parse a locale-independent floating-point token (decimal point, no
/// thousands separators). Surrounding whitespace is tolerated.
fn parse_numeric(token: &str) -> Result<f64, ParseRejection> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseRejection::Numeric {
            text: token.to_string(),
        })
}

fn strip_quotation_marks(token: &str) -> String {
    token.replace('"', "")
}

/// Reject timestamps in the future or before the 2020 epoch, both symptoms
/// of corrupted clock values in the source hardware.
fn check_timestamp_range(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ParseRejection> {
    if timestamp > now || timestamp < earliest_plausible_timestamp() {
        return Err(ParseRejection::OutOfRange { timestamp });
    }
    Ok(())
}

// =============================================================================
// Bulk parsing and statistics
// =============================================================================

/// Counts of accepted and rejected lines for one parsed input log.
///
/// This is the structured outcome the presentation layer reports from;
/// the core never writes to the console itself.
#[derive(Debug, Clone, Default)]
pub struct ParseStats {
    /// Total number of lines offered to the parser
    pub total_lines: usize,

    /// Number of records successfully parsed
    pub records_parsed: usize,

    /// Number of lines dropped
    pub lines_rejected: usize,

    /// Rejection messages, for diagnostics
    pub rejections: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_ok(&mut self) {
        self.total_lines += 1;
        self.records_parsed += 1;
    }

    fn record_rejected(&mut self, line_number: usize, rejection: &ParseRejection) {
        self.total_lines += 1;
        self.lines_rejected += 1;
        self.rejections
            .push(format!("line {}: {}", line_number, rejection));
    }

    /// Fraction of lines that parsed, as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_lines as f64) * 100.0
        }
    }
}

/// Parse all lines of an outdoor log. Rejected lines are dropped and counted.
pub fn parse_eva_lines<'a, I>(lines: I, now: DateTime<Utc>) -> (Vec<EvaRecord>, ParseStats)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    let mut stats = ParseStats::new();
    for (index, line) in lines.into_iter().enumerate() {
        match EvaRecord::parse(line, now) {
            Ok(record) => {
                records.push(record);
                stats.record_ok();
            }
            Err(rejection) => {
                debug!("dropping outdoor line {}: {}", index + 1, rejection);
                stats.record_rejected(index + 1, &rejection);
            }
        }
    }
    (records, stats)
}

/// Parse all lines of an indoor log. Rejected lines are dropped and counted.
pub fn parse_vaisala_lines<'a, I>(lines: I, now: DateTime<Utc>) -> (Vec<VaisalaRecord>, ParseStats)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    let mut stats = ParseStats::new();
    for (index, line) in lines.into_iter().enumerate() {
        match VaisalaRecord::parse(line, now) {
            Ok(record) => {
                records.push(record);
                stats.record_ok();
            }
            Err(rejection) => {
                debug!("dropping indoor line {}: {}", index + 1, rejection);
                stats.record_rejected(index + 1, &rejection);
            }
        }
    }
    (records, stats)
}
