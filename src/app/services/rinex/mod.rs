//! RINEX meteorological data encoding
//!
//! Pure string-producing renderers over already-validated data; no I/O
//! happens here. The module is organized into:
//! - [`variant`] - the closed set of output dialects, file naming and MJD
//!   arithmetic
//! - [`header`] - station metadata and its fixed-order header block
//! - [`format`] - field consolidation and numeric/epoch formatting

pub mod format;
pub mod header;
pub mod variant;

pub use header::{SensorDescription, StationMetadata};
pub use variant::{modified_julian_date, rinex_file_name, RinexVariant};

use crate::app::models::SensorRecord;

/// Render a sequence of unified records as RINEX data lines, one line per
/// record, each terminated by a newline.
pub fn render_records(records: &[&SensorRecord]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&record.to_rinex());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_render_records_one_line_each() {
        let ts = NaiveDate::from_ymd_opt(2021, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc();
        let a = SensorRecord::external(ts, 10.1, 55.0, 980.5);
        let b = SensorRecord::external(ts + chrono::Duration::minutes(1), 10.2, 54.0, 980.6);

        let text = render_records(&[&a, &b]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(text.ends_with('\n'));
        assert_eq!(lines[0], " 21  5  1 10  0  0   10.1   55.0  980.5");
    }

    #[test]
    fn test_render_records_empty_input() {
        assert_eq!(render_records(&[]), "");
    }
}
