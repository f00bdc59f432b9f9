//! Time-ordered storage of measurement records
//!
//! [`DataLog`] is an append-only container over records of one type, keyed
//! by timestamp. Insertion order is irrelevant; every query returns records
//! sorted ascending by timestamp. Sorting is lazy: a dirty flag avoids
//! re-sorting between consecutive read-only queries.

use crate::app::models::{Timestamped, VaisalaRecord};
use crate::constants::DATE_MATCH_TOLERANCE_SECONDS;
use chrono::{DateTime, NaiveDate, Utc};

/// A lazily sorted collection of timestamped measurement records.
///
/// Ties in timestamp keep their insertion order (stable sort, no secondary
/// key) and duplicates are retained.
#[derive(Debug, Clone)]
pub struct DataLog<T: Timestamped> {
    title: String,
    records: Vec<T>,
    sorted: bool,
}

impl<T: Timestamped> DataLog<T> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            records: Vec::new(),
            sorted: false,
        }
    }

    /// Build a log from already validated records.
    pub fn from_records(title: impl Into<String>, records: Vec<T>) -> Self {
        let mut log = Self::new(title);
        log.records = records;
        log
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record. Any previous sort state is invalidated.
    pub fn push(&mut self, record: T) {
        self.records.push(record);
        self.sorted = false;
    }

    /// All records, sorted ascending by timestamp.
    pub fn records(&mut self) -> &[T] {
        self.sort_if_needed();
        &self.records
    }

    /// All records with a timestamp in `[from, till]`, inclusive both ends,
    /// sorted ascending.
    pub fn records_in_range(&mut self, from: DateTime<Utc>, till: DateTime<Utc>) -> Vec<&T> {
        self.sort_if_needed();
        self.records
            .iter()
            .filter(|record| {
                let ts = record.timestamp();
                ts >= from && ts <= till
            })
            .collect()
    }

    /// All records whose calendar date matches `day` (time-of-day ignored),
    /// sorted ascending.
    pub fn records_on_day(&mut self, day: NaiveDate) -> Vec<&T> {
        self.sort_if_needed();
        self.records
            .iter()
            .filter(|record| record.timestamp().date_naive() == day)
            .collect()
    }

    /// Sort by timestamp, but only when the storage is unsorted and holds
    /// more than one element.
    fn sort_if_needed(&mut self) {
        if self.records.len() <= 1 || self.sorted {
            return;
        }
        self.records.sort_by_key(|record| record.timestamp());
        self.sorted = true;
    }
}

impl DataLog<VaisalaRecord> {
    /// Find an indoor record within the matching tolerance of `query`.
    ///
    /// Linear scan in current storage order; the first record inside the
    /// symmetric 120 s window wins, even when a later one would be closer.
    /// Returns `None` when the log is empty or nothing matches.
    pub fn nearest_record(&self, query: DateTime<Utc>) -> Option<&VaisalaRecord> {
        self.records.iter().find(|record| {
            let delta_seconds = (record.timestamp() - query).num_milliseconds() as f64 / 1000.0;
            delta_seconds.abs() < DATE_MATCH_TOLERANCE_SECONDS
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::SensorRecord;
    use chrono::Duration;

    fn ts(day: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2021, 5, day)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
            .and_utc()
    }

    fn indoor(day: u32, h: u32, mi: u32, s: u32, temperature: f64) -> VaisalaRecord {
        VaisalaRecord {
            timestamp: ts(day, h, mi, s),
            temperature,
            relative_humidity: 40.0,
        }
    }

    #[test]
    fn test_records_are_returned_sorted() {
        let mut log = DataLog::new("test");
        log.push(SensorRecord::external(ts(1, 12, 0, 0), 2.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(1, 10, 0, 0), 1.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(1, 11, 0, 0), 3.0, 50.0, 980.0));

        let temperatures: Vec<f64> = log.records().iter().map(|r| r.air_temperature()).collect();
        assert_eq!(temperatures, vec![1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_duplicate_timestamps_are_retained_in_insertion_order() {
        let mut log = DataLog::new("test");
        log.push(SensorRecord::external(ts(1, 10, 0, 0), 1.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(1, 10, 0, 0), 2.0, 50.0, 980.0));

        let temperatures: Vec<f64> = log.records().iter().map(|r| r.air_temperature()).collect();
        assert_eq!(temperatures, vec![1.0, 2.0]);
    }

    #[test]
    fn test_range_query_is_inclusive_on_both_ends() {
        let mut log = DataLog::new("test");
        for hour in 8..=12 {
            log.push(SensorRecord::external(
                ts(1, hour, 0, 0),
                hour as f64,
                50.0,
                980.0,
            ));
        }

        let selected = log.records_in_range(ts(1, 9, 0, 0), ts(1, 11, 0, 0));
        let temperatures: Vec<f64> = selected.iter().map(|r| r.air_temperature()).collect();
        assert_eq!(temperatures, vec![9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_day_query_ignores_time_of_day() {
        let mut log = DataLog::new("test");
        log.push(SensorRecord::external(ts(1, 23, 59, 59), 1.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(2, 0, 0, 0), 2.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(2, 12, 0, 0), 3.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(3, 0, 0, 0), 4.0, 50.0, 980.0));

        let day = NaiveDate::from_ymd_opt(2021, 5, 2).unwrap();
        let selected = log.records_on_day(day);
        let temperatures: Vec<f64> = selected.iter().map(|r| r.air_temperature()).collect();
        assert_eq!(temperatures, vec![2.0, 3.0]);
    }

    #[test]
    fn test_day_query_equals_full_span_range_query() {
        let mut log = DataLog::new("test");
        log.push(SensorRecord::external(ts(1, 23, 0, 0), 1.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(2, 6, 0, 0), 2.0, 50.0, 980.0));
        log.push(SensorRecord::external(ts(2, 18, 0, 0), 3.0, 50.0, 980.0));

        let day = NaiveDate::from_ymd_opt(2021, 5, 2).unwrap();
        let by_day: Vec<SensorRecord> = log.records_on_day(day).into_iter().cloned().collect();
        let by_range: Vec<SensorRecord> = log
            .records_in_range(ts(2, 0, 0, 0), ts(2, 23, 59, 59))
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(by_day, by_range);
    }

    #[test]
    fn test_nearest_record_within_tolerance() {
        let mut log = DataLog::new("indoor");
        log.push(indoor(1, 10, 0, 0, 23.0));
        log.push(indoor(1, 10, 10, 0, 24.0));

        let matched = log.nearest_record(ts(1, 10, 1, 30)).unwrap();
        assert_eq!(matched.temperature, 23.0);

        let delta = (matched.timestamp - ts(1, 10, 1, 30)).num_seconds().abs();
        assert!(delta <= 120);
    }

    #[test]
    fn test_nearest_record_tolerance_is_strict() {
        let mut log = DataLog::new("indoor");
        log.push(indoor(1, 10, 0, 0, 23.0));

        // Exactly 120 s away is outside the window
        let query = ts(1, 10, 0, 0) + Duration::seconds(120);
        assert!(log.nearest_record(query).is_none());

        let query = ts(1, 10, 0, 0) + Duration::seconds(119);
        assert!(log.nearest_record(query).is_some());
    }

    #[test]
    fn test_nearest_record_first_match_wins_in_storage_order() {
        // Two candidates inside the window; the later-stored one is closer,
        // the scan still returns the first stored match.
        let mut log = DataLog::new("indoor");
        log.push(indoor(1, 10, 1, 50, 23.0));
        log.push(indoor(1, 10, 0, 10, 24.0));

        let matched = log.nearest_record(ts(1, 10, 0, 0)).unwrap();
        assert_eq!(matched.temperature, 23.0);
    }

    #[test]
    fn test_nearest_record_on_empty_log() {
        let log: DataLog<VaisalaRecord> = DataLog::new("indoor");
        assert!(log.nearest_record(ts(1, 10, 0, 0)).is_none());
    }
}
