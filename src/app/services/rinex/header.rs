//! Station metadata and RINEX header rendering
//!
//! [`StationMetadata`] holds the program/agency/station identifiers, the
//! sensor reference position, the accumulated comment lines and the sensor
//! descriptions for the selected output variant, and renders the complete
//! fixed-order header block as a single string.

use crate::app::services::rinex::format::{consolidate, consolidate_default};
use crate::app::services::rinex::variant::RinexVariant;
use crate::constants::{HEADER_TEXT_WIDTH, MIN_HEADER_SENSORS};
use chrono::{DateTime, Utc};

/// Placeholder observation code for descriptions that do not fit the layout
const UNKNOWN_OBSERVATION: &str = "??";

/// Description of one meteorological sensor channel as it appears in the
/// `SENSOR MOD/TYPE/ACC` header lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDescription {
    observation_type: String,
    model: String,
    sensor_type: String,
    accuracy: f64,
}

impl SensorDescription {
    /// A new sensor description. The observation code is trimmed and
    /// upper-cased; codes longer than 4 characters are replaced by the
    /// unknown placeholder. Model and serial/type strings are consolidated
    /// to the default field width at construction.
    pub fn new(observation_type: &str, model: &str, sensor_type: &str, accuracy: f64) -> Self {
        let mut observation_type = observation_type.trim().to_uppercase();
        if observation_type.len() > 4 {
            observation_type = UNKNOWN_OBSERVATION.to_string();
        }
        Self {
            observation_type,
            model: consolidate_default(model),
            sensor_type: consolidate_default(sensor_type),
            accuracy,
        }
    }

    /// The observation code as emitted for the given variant: two characters
    /// for Version2/Version3/BIPM (anything else degrades to `??`), a
    /// 4-character consolidated field for CCTF.
    pub fn observation_code(&self, variant: RinexVariant) -> String {
        match variant {
            RinexVariant::Unknown => UNKNOWN_OBSERVATION.to_string(),
            RinexVariant::Version2 | RinexVariant::Version3 | RinexVariant::Bipm => {
                if self.observation_type.len() == 2 {
                    self.observation_type.clone()
                } else {
                    UNKNOWN_OBSERVATION.to_string()
                }
            }
            RinexVariant::Cctf => consolidate(&self.observation_type, 4),
        }
    }

    /// One `SENSOR MOD/TYPE/ACC` header line (without newline). Empty for
    /// the Unknown variant.
    pub fn to_rinex(&self, variant: RinexVariant) -> String {
        match variant {
            RinexVariant::Unknown => String::new(),
            RinexVariant::Version2 | RinexVariant::Version3 | RinexVariant::Bipm => format!(
                "{}{}      {:7.1}    {} SENSOR MOD/TYPE/ACC",
                self.model,
                self.sensor_type,
                self.accuracy,
                self.observation_code(variant)
            ),
            RinexVariant::Cctf => format!(
                "{}{}      {:7.1}  {} SENSOR MOD/TYPE/ACC",
                self.model,
                self.sensor_type,
                self.accuracy,
                self.observation_code(variant)
            ),
        }
    }
}

/// Station and sensor metadata rendered into the RINEX header block.
///
/// Created once per run; only comment-append mutates it, and nothing mutates
/// it once rendering has begun.
#[derive(Debug, Clone)]
pub struct StationMetadata {
    pub program_name: String,
    pub agency_name: String,
    pub station_name: String,
    pub station_number: String,
    /// Reference position of the pressure sensor (ECEF, metres)
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
    /// Sensor height in metres
    pub position_h: f64,
    variant: RinexVariant,
    bipm_station_code: String,
    comments: Vec<String>,
    sensors: Vec<SensorDescription>,
}

impl StationMetadata {
    /// Metadata preconfigured for the BEV station: identifiers, the
    /// PPP-derived antenna reference position (GP/TM.281, 21.08.2018) and
    /// the EVA700 sensor set. CCTF output adds the indoor Vaisala HMT331
    /// channels, for five sensors instead of three.
    pub fn bev(variant: RinexVariant) -> Self {
        let sensors = if variant == RinexVariant::Cctf {
            // The external/internal sensor distinction was introduced in CCTF
            vec![
                SensorDescription::new("TE", "KRONEIS EVA700", "SN:700.092-12590592", 0.1),
                SensorDescription::new("HE", "KRONEIS EVA700", "SN:700.092-12590592", 2.0),
                SensorDescription::new("PR", "KRONEIS EVA700", "SN:700.092-12590592", 0.3),
                SensorDescription::new("TI", "VAISALA HMT331", "SN:S2220318", 0.1),
                SensorDescription::new("HI", "VAISALA HMT331", "SN:S2220318", 1.5),
            ]
        } else {
            vec![
                SensorDescription::new("TD", "KRONEIS EVA700", "SN:700.092-12590592", 0.1),
                SensorDescription::new("HR", "KRONEIS EVA700", "SN:700.092-12590592", 2.0),
                SensorDescription::new("PR", "KRONEIS EVA700", "SN:700.092-12590592", 0.3),
            ]
        };

        Self {
            program_name: format!("{} V{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            agency_name: "BEV".to_string(),
            station_name: "BEV".to_string(),
            station_number: "3".to_string(),
            position_x: 4_087_027.3000,
            position_y: 1_196_557.4300,
            position_z: 4_732_637.1000,
            position_h: 291.8,
            variant,
            bipm_station_code: "BE1_".to_string(),
            comments: Vec::new(),
            sensors,
        }
    }

    pub fn variant(&self) -> RinexVariant {
        self.variant
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Append a free-text comment line. Must be called before rendering.
    pub fn add_comment(&mut self, comment: &str) {
        self.comments.push(comment.trim().to_string());
    }

    /// Render the complete header block, each line newline-terminated.
    ///
    /// Returns an empty string when fewer than the minimum of 3 sensor
    /// descriptions are configured; the caller decides whether that is
    /// fatal. `created` is the file creation time stamped into the
    /// PGM / RUN BY / DATE line.
    pub fn to_rinex(&self, created: DateTime<Utc>) -> String {
        if self.sensors.len() < MIN_HEADER_SENSORS {
            return String::new();
        }

        // The BIPM and CCTF layouts have no position line; the height matters
        // for barometric readings, so it travels as a comment instead. The
        // list is extended before any comment is rendered.
        let mut comments = self.comments.clone();
        if !self.variant.emits_sensor_position() && self.variant != RinexVariant::Unknown {
            comments.push(format!("Height of PR sensor {:.1} m", self.position_h));
        }

        let mut header = String::new();
        let mut push_line = |line: &str| {
            header.push_str(line);
            header.push('\n');
        };

        push_line(self.variant.data_type_line());
        push_line(&self.program_line(created));

        if self.variant.emits_marker() {
            push_line(&self.labelled(&self.station_name, "MARKER NAME"));
            if !self.station_number.trim().is_empty() {
                push_line(&self.labelled(&self.station_number, "MARKER NUMBER"));
            }
        }

        for comment in &comments {
            push_line(&self.labelled(comment, "COMMENT"));
        }

        push_line(&self.lab_name_line());
        push_line(&self.observation_types_line());
        for sensor in &self.sensors {
            push_line(&sensor.to_rinex(self.variant));
        }

        if self.variant.emits_sensor_position() {
            push_line(&format!(
                "{:14.4}{:14.4}{:14.4}{:14.4} PR SENSOR POS XYZ/H",
                self.position_x, self.position_y, self.position_z, self.position_h
            ));
        }

        push_line(&format!("{:60}END OF HEADER", ""));
        header
    }

    /// Consolidate a free-text field to the header text width and attach
    /// the right-hand label.
    fn labelled(&self, text: &str, label: &str) -> String {
        format!("{}{}", consolidate(text, HEADER_TEXT_WIDTH), label)
    }

    fn program_line(&self, created: DateTime<Utc>) -> String {
        format!(
            "{}{}{}PGM / RUN BY / DATE",
            consolidate_default(&self.program_name),
            consolidate_default(&self.agency_name),
            consolidate_default(&self.variant.creation_date(created)),
        )
    }

    fn lab_name_line(&self) -> String {
        let name = if self.variant.uses_bipm_station_code() {
            &self.bipm_station_code
        } else if self.variant == RinexVariant::Unknown {
            "< UNDEFINED >"
        } else {
            &self.agency_name
        };
        self.labelled(name, "LAB NAME")
    }

    /// The `# / TYPES OF OBSERV` line: sensor count right-justified to 6,
    /// then each observation code right-justified to 4 behind two spaces.
    fn observation_types_line(&self) -> String {
        let mut line = format!("{:6}", self.sensors.len());
        for sensor in &self.sensors {
            line.push_str(&format!("  {:>4}", sensor.observation_code(self.variant)));
        }
        format!("{:<60}# / TYPES OF OBSERV", line)
    }
}
