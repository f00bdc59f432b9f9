//! The RINEX output dialects and their per-variant rules
//!
//! All variant-specific behavior hangs off [`RinexVariant`]: header
//! template literals, creation-date layout, marker and position emission,
//! and the file-naming patterns. Rendering code asks the variant instead of
//! branching on it in every function.

use crate::constants::{serial_date_epoch, SERIAL_TO_MJD_OFFSET};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// The supported RINEX meteorological output dialects.
///
/// CCTF is the current standard for time-laboratory data exchange; the
/// remaining variants are kept for legacy consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RinexVariant {
    /// Unrecognized settings token; renders placeholder header text and an
    /// empty file name
    #[default]
    Unknown,
    /// RINEX version 2.11
    Version2,
    /// RINEX version 3.03
    Version3,
    /// BIPM meteorological data exchange layout
    Bipm,
    /// CCTF V1.0 layout, adds the indoor TI/HI sensor channels
    Cctf,
}

impl RinexVariant {
    /// Map a settings token to a variant. Matching is case-insensitive and
    /// ignores surrounding whitespace; anything unrecognized is `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_uppercase().as_str() {
            "VERSION2" => Self::Version2,
            "VERSION3" => Self::Version3,
            "BIPM" => Self::Bipm,
            "CCTF" => Self::Cctf,
            _ => Self::Unknown,
        }
    }

    /// The fixed first header line (version/type or data-type line).
    pub fn data_type_line(&self) -> &'static str {
        match self {
            Self::Version3 => {
                "     3.03           METEOROLOGICAL DATA                     RINEX VERSION / TYPE"
            }
            Self::Version2 => {
                "     2.11           METEOROLOGICAL DATA                     RINEX VERSION / TYPE"
            }
            Self::Bipm => {
                "METEOROLOGICAL DATA                                         DATA TYPE"
            }
            Self::Cctf => {
                "METEOROLOGICAL DATA  CCTF V1.0                              DATA TYPE"
            }
            Self::Unknown => {
                "< UNKNOWN TYPE >                                            DATA TYPE"
            }
        }
    }

    /// File creation date in the layout the variant requires: Version3 uses
    /// `yyyymmdd hhmmss UTC`, the others an upper-cased `dd-MMM-yy HH:mm`.
    pub fn creation_date(&self, now: DateTime<Utc>) -> String {
        match self {
            Self::Version3 => format!("{} UTC", now.format("%Y%m%d %H%M%S")),
            Self::Version2 | Self::Bipm | Self::Cctf => {
                now.format("%d-%b-%y %H:%M").to_string().to_uppercase()
            }
            Self::Unknown => String::new(),
        }
    }

    /// Whether the header carries MARKER NAME / MARKER NUMBER lines.
    pub fn emits_marker(&self) -> bool {
        matches!(self, Self::Version2 | Self::Version3)
    }

    /// Whether the header carries the `PR SENSOR POS XYZ/H` line. The BIPM
    /// and CCTF layouts omit it and fold the sensor height into a comment
    /// instead.
    pub fn emits_sensor_position(&self) -> bool {
        matches!(self, Self::Version2 | Self::Version3)
    }

    /// Whether the LAB NAME line carries the BIPM station code rather than
    /// the agency name.
    pub fn uses_bipm_station_code(&self) -> bool {
        matches!(self, Self::Bipm | Self::Cctf)
    }

    /// Whether output records carry the indoor TI/HI channels.
    pub fn carries_indoor_channels(&self) -> bool {
        *self == Self::Cctf
    }
}

/// Modified Julian Date of a calendar day, as a double.
///
/// Computed from the legacy date serial number (days since 1899-12-30) plus
/// the fixed offset to the MJD epoch. The offset must be reproduced exactly;
/// the BIPM/CCTF file-naming schemes slice digits out of this number.
pub fn modified_julian_date(date: NaiveDate) -> f64 {
    (date - serial_date_epoch()).num_days() as f64 + SERIAL_TO_MJD_OFFSET
}

/// The integer part of the MJD as a string, e.g. `"59215"`.
pub fn mjd_string(date: NaiveDate) -> String {
    format!("{:.0}", modified_julian_date(date))
}

/// Derive the output file name for a day according to the variant's naming
/// scheme. The BIPM/CCTF templates slice digits out of the MJD and require
/// it to have five of them (1941 through 2132); other days yield an empty
/// name, like the Unknown variant.
///
/// Version2 and Version3 deliberately share the same template.
pub fn rinex_file_name(date: NaiveDate, variant: RinexVariant) -> String {
    let ddd = format!("{:03}", date.ordinal());
    let yy = date.format("%y");

    match variant {
        RinexVariant::Unknown => String::new(),
        RinexVariant::Version2 | RinexVariant::Version3 => format!("BEV0{}0.{}M", ddd, yy),
        RinexVariant::Bipm | RinexVariant::Cctf => {
            if !(10_000.0..100_000.0).contains(&modified_julian_date(date)) {
                return String::new();
            }
            let mjd = mjd_string(date);
            let mj = &mjd[..2];
            let day = &mjd[mjd.len() - 3..];
            if variant == RinexVariant::Bipm {
                format!("BEmet_{}.{}", mj, day)
            } else {
                format!("metBE{}.{}", mj, day)
            }
        }
    }
}
