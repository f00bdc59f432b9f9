//! Fixed-width field formatting helpers for the RINEX layout

use crate::constants::{DEFAULT_FIELD_WIDTH, RINEX_EPOCH_FORMAT};
use chrono::{DateTime, Utc};

/// Format a free-text header field to an exact width.
///
/// The input is trimmed; when it does not fit, it is truncated to one
/// character short of the nominal width (a readability margin baked into the
/// format) and then right-padded with spaces to exactly `width` characters.
/// Header fields use widths 20, 40 or 60.
pub fn consolidate(text: &str, width: usize) -> String {
    let trimmed = text.trim();
    let result: String = if trimmed.chars().count() >= width {
        trimmed.chars().take(width - 1).collect()
    } else {
        trimmed.to_string()
    };
    format!("{:<width$}", result, width = width)
}

/// [`consolidate`] at the default field width of 20.
pub fn consolidate_default(text: &str) -> String {
    consolidate(text, DEFAULT_FIELD_WIDTH)
}

/// Format a record timestamp as a RINEX meteo epoch: `yy MM dd HH mm ss`
/// with single-digit components blank-padded instead of zero-padded.
///
/// The blank-padding is a global replacement of every `" 0"` digram over the
/// whole date string, not a per-field operation, so a minute or second field
/// whose rendering happens to start with space-zero is affected as well.
pub fn format_epoch(timestamp: DateTime<Utc>) -> String {
    timestamp
        .format(RINEX_EPOCH_FORMAT)
        .to_string()
        .replace(" 0", "  ")
}

/// Format an observation value right-justified to 7 characters with one
/// decimal digit.
pub fn format_observation(value: f64) -> String {
    format!("{:7.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_consolidate_pads_short_input() {
        assert_eq!(consolidate("hello", 8), "hello   ");
        assert_eq!(consolidate("hello", 8).len(), 8);
    }

    #[test]
    fn test_consolidate_trims_before_padding() {
        assert_eq!(consolidate("  BEV  ", 10), "BEV       ");
    }

    #[test]
    fn test_consolidate_truncates_one_short_of_width() {
        let result = consolidate("a-string-longer-than-the-width-forces-truncation", 10);
        assert_eq!(result.len(), 10);
        assert_eq!(result, "a-string- ");
        assert!(result.ends_with(' '));
    }

    #[test]
    fn test_consolidate_exact_width_input_still_truncates() {
        assert_eq!(consolidate("abcdefgh", 8), "abcdefg ");
    }

    #[test]
    fn test_consolidate_default_width() {
        assert_eq!(consolidate_default("BEV").len(), 20);
    }

    #[test]
    fn test_format_epoch_blank_pads_leading_zeros() {
        let ts = NaiveDate::from_ymd_opt(2021, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(format_epoch(ts), "21  5  1 10  0  0");
    }

    #[test]
    fn test_format_epoch_keeps_two_digit_components() {
        let ts = NaiveDate::from_ymd_opt(2021, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap()
            .and_utc();
        assert_eq!(format_epoch(ts), "21 12 31 23 59 58");
    }

    #[test]
    fn test_format_observation_widths() {
        assert_eq!(format_observation(10.1), "   10.1");
        assert_eq!(format_observation(-3.0), "   -3.0");
        assert_eq!(format_observation(980.5), "  980.5");
        assert_eq!(format_observation(9999.9), " 9999.9");
    }
}
