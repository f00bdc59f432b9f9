//! Convert command implementation
//!
//! The complete conversion workflow for one calendar day: configuration
//! loading, reading and parsing the sensor logs, merging, header rendering
//! and writing the RINEX output file. All file I/O lives here; the service
//! layer only transforms data already in memory.

use super::shared::{
    create_progress_bar, load_configuration, report_summary, setup_logging, ConvertStats,
};
use crate::app::services::data_log::DataLog;
use crate::app::services::eva_parser::{parse_eva_lines, parse_vaisala_lines, ParseStats};
use crate::app::services::merger::{merge, IndoorSource, MergeOutcome};
use crate::app::models::VaisalaRecord;
use crate::app::services::rinex::{render_records, rinex_file_name, StationMetadata};
use crate::cli::args::ConvertArgs;
use crate::constants::{eva_input_file_name, vaisala_input_file_name};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert command runner
///
/// Orchestrates the workflow:
/// 1. Set up logging and layered configuration
/// 2. Read and parse the outdoor log (and the indoor log for CCTF output)
/// 3. Merge into unified records and render header and data lines
/// 4. Write the RINEX file and report statistics
pub fn run_convert(args: ConvertArgs) -> Result<ConvertStats> {
    let start_time = Instant::now();

    setup_logging(&args)?;

    info!("Starting eva2rinex");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let date = args.parse_date()?;
    let variant = config.variant();
    let now = Utc::now();

    info!("Converting {} to {:?} output", date, variant);

    // Outdoor log
    let eva_file_name = eva_input_file_name(date);
    let eva_path = config.input_directory.join(&eva_file_name);
    info!("Reading outdoor log: {}", eva_path.display());
    let outdoor_text = std::fs::read_to_string(&eva_path).map_err(|e| {
        Error::io(
            format!("Failed to read outdoor log {}", eva_path.display()),
            e,
        )
    })?;
    let outdoor_lines: Vec<&str> = outdoor_text.lines().collect();

    let progress = args
        .show_progress()
        .then(|| create_progress_bar(outdoor_lines.len() as u64, "Parsing outdoor log"));
    let (outdoor_records, outdoor_stats) = parse_eva_lines(
        outdoor_lines.iter().map(|line| {
            if let Some(pb) = &progress {
                pb.inc(1);
            }
            *line
        }),
        now,
    );
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        "Parsed {} of {} outdoor lines ({:.1}% valid)",
        outdoor_stats.records_parsed,
        outdoor_stats.total_lines,
        outdoor_stats.success_rate()
    );
    if outdoor_stats.lines_rejected > 0 {
        warn!("Dropped {} malformed outdoor lines", outdoor_stats.lines_rejected);
        for rejection in &outdoor_stats.rejections {
            debug!("outdoor {}", rejection);
        }
    }
    if outdoor_records.is_empty() {
        warn!("No valid outdoor records; the output file will carry no data lines");
    }

    let mut outdoor = DataLog::from_records(eva_file_name.as_str(), outdoor_records);

    // Indoor log (CCTF only)
    let indoor_file_name = vaisala_input_file_name(date);
    let indoor_path = config.indoor_input_directory.join(&indoor_file_name);
    let indoor = if variant.carries_indoor_channels() {
        load_indoor_log(&indoor_path, now)?
    } else {
        None
    };

    let indoor_source = match &indoor {
        Some((log, _)) => IndoorSource::Log(log),
        None if variant.carries_indoor_channels() => match config.fallback_internal {
            Some(fallback) => {
                warn!(
                    "No indoor log at {}, using configured fallback lab values",
                    indoor_path.display()
                );
                IndoorSource::Fallback {
                    temperature: fallback.temperature,
                    humidity: fallback.humidity,
                }
            }
            None => {
                warn!(
                    "No indoor log at {}, records keep external channels only",
                    indoor_path.display()
                );
                IndoorSource::None
            }
        },
        None => IndoorSource::None,
    };

    // Merge and render
    let MergeOutcome {
        log: mut merged,
        stats: merge_stats,
    } = merge(&mut outdoor, indoor_source, variant);

    let mut metadata = StationMetadata::bev(variant);
    if let Some(agency) = &config.agency_name {
        metadata.agency_name = agency.clone();
    }
    if let Some(station) = &config.station_name {
        metadata.station_name = station.clone();
    }
    metadata.add_comment("External sensor located close to GNSS antenna");
    metadata.add_comment(&format!("Input file name: {}", eva_file_name));
    if variant.carries_indoor_channels() {
        metadata.add_comment(&format!(
            "Internal (indoor) sensor data file: {}",
            indoor_file_name
        ));
    }

    let header = metadata.to_rinex(now);
    if header.is_empty() {
        return Err(Error::empty_header());
    }

    let day_records = merged.records_on_day(date);
    let records_written = day_records.len();
    let body = render_records(&day_records);

    // Write the output file
    let output_file_name = rinex_file_name(date, variant);
    let output_path = config.output_directory.join(&output_file_name);
    std::fs::create_dir_all(&config.output_directory).map_err(|e| {
        Error::io(
            format!(
                "Failed to create output directory {}",
                config.output_directory.display()
            ),
            e,
        )
    })?;
    std::fs::write(&output_path, format!("{}{}", header, body)).map_err(|e| {
        Error::io(
            format!("Failed to write output file {}", output_path.display()),
            e,
        )
    })?;

    info!(
        "Wrote {} ({} data lines)",
        output_path.display(),
        records_written
    );

    let stats = ConvertStats {
        lines_read: outdoor_stats.total_lines,
        records_parsed: outdoor_stats.records_parsed,
        lines_rejected: outdoor_stats.lines_rejected,
        indoor_records_parsed: indoor
            .as_ref()
            .map(|(_, stats)| stats.records_parsed)
            .unwrap_or(0),
        indoor_matched: merge_stats.indoor_matched,
        indoor_missed: merge_stats.indoor_missed,
        records_written,
        output_file: output_path,
        processing_time: start_time.elapsed(),
    };

    report_summary(&stats, args.quiet);

    Ok(stats)
}

/// Read and parse the indoor log if one exists for the day.
///
/// A missing file is not an error; the caller falls back to configured lab
/// values or to external-only records.
fn load_indoor_log(
    path: &Path,
    now: DateTime<Utc>,
) -> Result<Option<(DataLog<VaisalaRecord>, ParseStats)>> {
    if !path.is_file() {
        return Ok(None);
    }

    info!("Reading indoor log: {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::io(format!("Failed to read indoor log {}", path.display()), e)
    })?;

    let (records, stats) = parse_vaisala_lines(text.lines(), now);
    info!(
        "Parsed {} of {} indoor lines",
        stats.records_parsed, stats.total_lines
    );
    if stats.lines_rejected > 0 {
        warn!("Dropped {} malformed indoor lines", stats.lines_rejected);
        for rejection in &stats.rejections {
            debug!("indoor {}", rejection);
        }
    }

    let title = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some((DataLog::from_records(title, records), stats)))
}
