//! Analysis configuration
//!
//! Message types and fields consulted by each analysis stage, the mode
//! enumeration, and the default extraction set.

use crate::analysis::modes::ModeTable;
use crate::error::AnalyzerError;
use std::fmt;
use std::str::FromStr;

/// Message type whose first record fixes the reference time
pub const DEFAULT_FORMAT_TYPE: &str = "FMTU";
pub const DEFAULT_MODE_TYPE: &str = "MODE";
pub const DEFAULT_MODE_FIELD: &str = "Mode";

/// A message type and field pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub type_tag: String,
    pub field: String,
}

impl FieldRef {
    pub fn new(type_tag: &str, field: &str) -> Self {
        Self {
            type_tag: type_tag.to_string(),
            field: field.to_string(),
        }
    }
}

/// Where the metrics pass reads speed, altitude and position from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSources {
    pub speed: FieldRef,
    pub altitude: FieldRef,
    pub position_type: String,
    pub latitude_field: String,
    pub longitude_field: String,
}

impl Default for MetricSources {
    fn default() -> Self {
        Self {
            speed: FieldRef::new("GPS", "Spd"),
            altitude: FieldRef::new("AHR2", "Alt"),
            position_type: "GPS".to_string(),
            latitude_field: "Lat".to_string(),
            longitude_field: "Lng".to_string(),
        }
    }
}

/// Message type plus optional field projection
///
/// Parses from `TYPE` (all fields) or `TYPE:F1,F2,...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub type_tag: String,
    pub fields: Option<Vec<String>>,
}

impl ExtractionRequest {
    pub fn new(type_tag: &str, fields: &[&str]) -> Self {
        Self {
            type_tag: type_tag.to_string(),
            fields: Some(fields.iter().map(|f| f.to_string()).collect()),
        }
    }

    pub fn all_fields(type_tag: &str) -> Self {
        Self {
            type_tag: type_tag.to_string(),
            fields: None,
        }
    }

    /// Field selection, with an empty list treated as "all fields"
    pub fn field_selection(&self) -> Option<&[String]> {
        self.fields.as_deref().filter(|f| !f.is_empty())
    }
}

impl FromStr for ExtractionRequest {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (type_tag, fields) = match s.split_once(':') {
            Some((t, f)) => (t.trim(), Some(f)),
            None => (s.trim(), None),
        };

        if type_tag.is_empty() {
            return Err(AnalyzerError::InvalidRequest(format!(
                "missing message type in '{}'",
                s
            )));
        }

        let fields = fields.map(|f| {
            f.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            type_tag: type_tag.to_string(),
            fields,
        })
    }
}

impl fmt::Display for ExtractionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fields {
            Some(fields) => write!(f, "{}:{}", self.type_tag, fields.join(",")),
            None => write!(f, "{}", self.type_tag),
        }
    }
}

/// Extractions performed when none are requested explicitly
pub fn default_extractions() -> Vec<ExtractionRequest> {
    vec![
        ExtractionRequest::new("AHR2", &["TimeUS", "Roll", "Pitch", "Yaw", "Alt"]),
        ExtractionRequest::new("GPS", &["TimeUS", "Spd"]),
        ExtractionRequest::new("RCOU", &["TimeUS", "C5", "C6", "C7", "C8"]),
        ExtractionRequest::new("BAT", &["TimeUS", "Volt"]),
    ]
}

/// Session-wide analysis configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub format_type: String,
    pub mode_type: String,
    pub mode_field: String,
    pub mode_table: ModeTable,
    pub metric_sources: MetricSources,
    pub extractions: Vec<ExtractionRequest>,
    /// Fan all extractions out over one pass instead of one rewind per type
    pub single_pass: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            format_type: DEFAULT_FORMAT_TYPE.to_string(),
            mode_type: DEFAULT_MODE_TYPE.to_string(),
            mode_field: DEFAULT_MODE_FIELD.to_string(),
            mode_table: ModeTable::default(),
            metric_sources: MetricSources::default(),
            extractions: default_extractions(),
            single_pass: false,
        }
    }
}
