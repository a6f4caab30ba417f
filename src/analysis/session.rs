use crate::analysis::extract::{extract_many, extract_rows, ExtractedSeries};
use crate::analysis::metrics::accumulate_metrics;
use crate::analysis::modes::ModeEvents;
use crate::analysis::time::{establish_reference_time, ReferenceTime};
use crate::config::{AnalysisConfig, ExtractionRequest};
use crate::source::{RecordCursor, TextLogCursor};
use crate::types::{FlightMetrics, ModeEvent, Row};
use crate::Result;
use std::path::Path;
use tracing::info;

/// Caller-owned analysis state: the record cursor, the configuration and
/// the reference time fixed when the session was opened.
///
/// Every operation rewinds the cursor and performs its own full scan.
pub struct AnalysisSession<C: RecordCursor> {
    cursor: C,
    config: AnalysisConfig,
    reference: ReferenceTime,
}

impl<C: RecordCursor> AnalysisSession<C> {
    /// Establish t0 and take ownership of the cursor
    pub fn new(mut cursor: C, config: AnalysisConfig) -> Result<Self> {
        let reference = establish_reference_time(&mut cursor, &config.format_type)?;
        info!("Log start time: {}", reference.t0_us);
        Ok(Self {
            cursor,
            config,
            reference,
        })
    }

    pub fn reference_time(&self) -> ReferenceTime {
        self.reference
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Rows of one message type, optionally projected onto `fields`
    pub fn extract(&mut self, type_tag: &str, fields: Option<&[String]>) -> Result<Vec<Row>> {
        self.cursor.restart()?;
        extract_rows(&mut self.cursor, type_tag, fields, &self.reference)
    }

    pub fn extract_request(&mut self, request: &ExtractionRequest) -> Result<Vec<Row>> {
        self.extract(&request.type_tag, request.field_selection())
    }

    /// Run every configured extraction, one rewind per request or a single
    /// fan-out pass depending on `single_pass`
    pub fn extract_configured(&mut self) -> Result<Vec<ExtractedSeries>> {
        let requests = self.config.extractions.clone();
        self.extract_all(&requests)
    }

    pub fn extract_all(&mut self, requests: &[ExtractionRequest]) -> Result<Vec<ExtractedSeries>> {
        if self.config.single_pass {
            self.cursor.restart()?;
            return extract_many(&mut self.cursor, requests, &self.reference);
        }

        requests
            .iter()
            .map(|request| {
                Ok(ExtractedSeries {
                    request: request.clone(),
                    rows: self.extract_request(request)?,
                })
            })
            .collect()
    }

    /// Lazy mode-change stream over a freshly rewound cursor
    pub fn mode_changes(&mut self) -> Result<ModeEvents<'_, C>> {
        self.cursor.restart()?;
        Ok(ModeEvents::new(
            &mut self.cursor,
            &self.config.mode_table,
            self.reference,
            &self.config.mode_type,
            &self.config.mode_field,
        ))
    }

    pub fn collect_mode_changes(&mut self) -> Result<Vec<ModeEvent>> {
        self.mode_changes()?.collect()
    }

    /// One forward pass over the whole log
    pub fn metrics(&mut self) -> Result<FlightMetrics> {
        self.cursor.restart()?;
        accumulate_metrics(&mut self.cursor, &self.config.metric_sources)
    }

    /// Rewound access to the underlying cursor, e.g. for a raw dump
    pub fn rewound_cursor(&mut self) -> Result<&mut C> {
        self.cursor.restart()?;
        Ok(&mut self.cursor)
    }

    pub fn into_cursor(self) -> C {
        self.cursor
    }
}

/// Open a text DataFlash log and establish its reference time
pub fn open_log_file(path: &Path, config: AnalysisConfig) -> Result<AnalysisSession<TextLogCursor>> {
    let cursor = TextLogCursor::open(path)?;
    AnalysisSession::new(cursor, config)
}
