//! Merging outdoor and indoor readings into unified sensor records
//!
//! The outdoor log is authoritative: the merge produces exactly one
//! [`SensorRecord`] per outdoor record and indoor readings never contribute
//! timestamps of their own. Indoor channels are only attached for CCTF
//! output; every other variant produces external-only records regardless of
//! what the indoor log contains.

use crate::app::models::{EvaRecord, SensorRecord, VaisalaRecord};
use crate::app::services::data_log::DataLog;
use crate::app::services::rinex::RinexVariant;
use tracing::debug;

/// Where internal (lab) readings come from during a merge.
#[derive(Debug, Clone, Copy)]
pub enum IndoorSource<'a> {
    /// No indoor data; all records are external-only
    None,

    /// Nearest-match lookups against a parsed indoor log
    Log(&'a DataLog<VaisalaRecord>),

    /// Fixed mean lab values from configuration, used when CCTF output is
    /// requested but no indoor log exists for the day
    Fallback { temperature: f64, humidity: f64 },
}

/// Counts describing one merge run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeStats {
    /// Number of outdoor records processed (equals the output length)
    pub outdoor_records: usize,

    /// Outdoor records that received indoor channels
    pub indoor_matched: usize,

    /// Outdoor records for which no indoor record fell inside the matching
    /// tolerance; their internal fields stay absent
    pub indoor_missed: usize,
}

/// Result of merging one day's logs.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Unified records, one per outdoor record
    pub log: DataLog<SensorRecord>,

    /// Match/miss counts for reporting
    pub stats: MergeStats,
}

/// Build the unified sensor log from an outdoor log and an indoor source.
///
/// Pure transformation: neither input log is modified beyond the lazy sort
/// its queries perform. An unmatched indoor lookup is not an error; the
/// affected record simply carries no internal channels.
pub fn merge(
    outdoor: &mut DataLog<EvaRecord>,
    indoor: IndoorSource,
    variant: RinexVariant,
) -> MergeOutcome {
    let title = format!("outdoor: {}", outdoor.title());
    let mut log = DataLog::new(title);
    let mut stats = MergeStats::default();

    let attach_indoor = variant == RinexVariant::Cctf;

    for record in outdoor.records() {
        stats.outdoor_records += 1;
        let unified = if attach_indoor {
            unify_with_indoor(record, indoor, &mut stats)
        } else {
            external_only(record)
        };
        log.push(unified);
    }

    debug!(
        "merged {} outdoor records ({} with indoor channels, {} missed)",
        stats.outdoor_records, stats.indoor_matched, stats.indoor_missed
    );

    MergeOutcome { log, stats }
}

fn external_only(record: &EvaRecord) -> SensorRecord {
    SensorRecord::external(
        record.timestamp,
        record.temperature1,
        record.relative_humidity,
        record.absolute_pressure,
    )
}

fn unify_with_indoor(
    record: &EvaRecord,
    indoor: IndoorSource,
    stats: &mut MergeStats,
) -> SensorRecord {
    match indoor {
        IndoorSource::None => {
            stats.indoor_missed += 1;
            external_only(record)
        }
        IndoorSource::Fallback {
            temperature,
            humidity,
        } => {
            stats.indoor_matched += 1;
            SensorRecord::with_internal(
                record.timestamp,
                record.temperature1,
                record.relative_humidity,
                record.absolute_pressure,
                temperature,
                humidity,
            )
        }
        IndoorSource::Log(log) => match log.nearest_record(record.timestamp) {
            Some(indoor_record) => {
                stats.indoor_matched += 1;
                SensorRecord::with_internal(
                    record.timestamp,
                    record.temperature1,
                    record.relative_humidity,
                    record.absolute_pressure,
                    indoor_record.temperature,
                    indoor_record.relative_humidity,
                )
            }
            None => {
                stats.indoor_missed += 1;
                external_only(record)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{SensorBouquet, Timestamped};
    use chrono::{DateTime, NaiveDate, Utc};

    fn ts(h: u32, mi: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2021, 5, 1)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
            .and_utc()
    }

    fn eva(h: u32, mi: u32, temperature1: f64) -> EvaRecord {
        EvaRecord {
            timestamp: ts(h, mi),
            temperature1,
            temperature2: temperature1 + 0.1,
            absolute_pressure: 980.5,
            relative_humidity: 55.0,
            absolute_humidity: 6.0,
            dewpoint: 2.0,
            mixing_ratio: 5.0,
            frostpoint: -3.0,
            air_flow: 12.0,
            fan_power: 50.0,
        }
    }

    fn vaisala(h: u32, mi: u32, temperature: f64) -> VaisalaRecord {
        VaisalaRecord {
            timestamp: ts(h, mi),
            temperature,
            relative_humidity: 41.0,
        }
    }

    #[test]
    fn test_cctf_merge_attaches_matching_indoor_channels() {
        let mut outdoor = DataLog::from_records("eva", vec![eva(10, 0, 10.1), eva(10, 10, 9.9)]);
        let indoor = DataLog::from_records("vaisala", vec![vaisala(10, 1, 23.2)]);

        let outcome = merge(&mut outdoor, IndoorSource::Log(&indoor), RinexVariant::Cctf);

        assert_eq!(
            outcome.stats,
            MergeStats {
                outdoor_records: 2,
                indoor_matched: 1,
                indoor_missed: 1,
            }
        );

        let mut log = outcome.log;
        let records = log.records();
        assert_eq!(records[0].bouquet(), SensorBouquet::ExternalAndInternal);
        assert_eq!(records[0].internal_temperature(), 23.2);
        // The 10:10 record is more than 120 s from any indoor reading
        assert_eq!(records[1].bouquet(), SensorBouquet::ExternalOnly);
    }

    #[test]
    fn test_non_cctf_merge_ignores_indoor_log() {
        let mut outdoor = DataLog::from_records("eva", vec![eva(10, 0, 10.1)]);
        let indoor = DataLog::from_records("vaisala", vec![vaisala(10, 0, 23.2)]);

        let outcome = merge(
            &mut outdoor,
            IndoorSource::Log(&indoor),
            RinexVariant::Version3,
        );

        let mut log = outcome.log;
        assert_eq!(log.records()[0].bouquet(), SensorBouquet::ExternalOnly);
        assert_eq!(outcome.stats.indoor_matched, 0);
        assert_eq!(outcome.stats.indoor_missed, 0);
    }

    #[test]
    fn test_cctf_merge_with_fallback_values() {
        let mut outdoor = DataLog::from_records("eva", vec![eva(10, 0, 10.1), eva(10, 10, 9.9)]);

        let outcome = merge(
            &mut outdoor,
            IndoorSource::Fallback {
                temperature: 23.0,
                humidity: 40.0,
            },
            RinexVariant::Cctf,
        );

        let mut log = outcome.log;
        for record in log.records() {
            assert_eq!(record.bouquet(), SensorBouquet::ExternalAndInternal);
            assert_eq!(record.internal_temperature(), 23.0);
            assert_eq!(record.internal_humidity(), 40.0);
        }
        assert_eq!(outcome.stats.indoor_matched, 2);
    }

    #[test]
    fn test_cctf_merge_without_indoor_source() {
        let mut outdoor = DataLog::from_records("eva", vec![eva(10, 0, 10.1)]);

        let outcome = merge(&mut outdoor, IndoorSource::None, RinexVariant::Cctf);

        let mut log = outcome.log;
        assert_eq!(log.records()[0].bouquet(), SensorBouquet::ExternalOnly);
        assert_eq!(outcome.stats.indoor_missed, 1);
    }

    #[test]
    fn test_output_preserves_outdoor_timestamps() {
        let mut outdoor = DataLog::from_records("eva", vec![eva(10, 10, 9.9), eva(10, 0, 10.1)]);

        let outcome = merge(&mut outdoor, IndoorSource::None, RinexVariant::Bipm);

        let mut log = outcome.log;
        let stamps: Vec<DateTime<Utc>> = log.records().iter().map(|r| r.timestamp()).collect();
        assert_eq!(stamps, vec![ts(10, 0), ts(10, 10)]);
    }
}
