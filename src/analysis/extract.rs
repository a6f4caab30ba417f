//! Per-message-type field extraction
//!
//! Projects records of one type onto flat rows. Projection is lenient:
//! requested fields missing from a record are left out of its row.

use crate::analysis::time::ReferenceTime;
use crate::config::ExtractionRequest;
use crate::source::{RecordCursor, TIME_US_FIELD};
use crate::types::{FieldValue, Record, Row, TIMESTAMP_COLUMN};
use crate::Result;
use tracing::debug;

/// Rows extracted for one request, in log order
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSeries {
    pub request: ExtractionRequest,
    pub rows: Vec<Row>,
}

impl ExtractedSeries {
    pub fn type_tag(&self) -> &str {
        &self.request.type_tag
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build a row from a record
///
/// With no selection (or an empty one) every field is copied. With a
/// selection, only present fields are copied, and an extracted `TimeUS`
/// adds `Timestamp(s)` relative to t0.
pub fn project_record(record: &Record, fields: Option<&[String]>, reference: &ReferenceTime) -> Row {
    let mut row = Row::new();

    match fields.filter(|f| !f.is_empty()) {
        None => {
            for (name, value) in record.iter() {
                row.insert(name, value.clone());
            }
        }
        Some(fields) => {
            for name in fields {
                if let Some(value) = record.get(name) {
                    row.insert(name, value.clone());
                }
            }
            if let Some(time_us) = row.get_f64(TIME_US_FIELD) {
                row.insert(
                    TIMESTAMP_COLUMN,
                    FieldValue::Float(reference.relative_seconds_f64(time_us)),
                );
            }
        }
    }

    row
}

/// Extract rows of `type_tag` from the cursor's current position to
/// end-of-stream. The caller rewinds the cursor first; nothing already
/// consumed is revisited.
pub fn extract_rows<C: RecordCursor + ?Sized>(
    cursor: &mut C,
    type_tag: &str,
    fields: Option<&[String]>,
    reference: &ReferenceTime,
) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    while let Some(record) = cursor.next_matching(Some(type_tag))? {
        rows.push(project_record(&record, fields, reference));
    }
    debug!("Extracted {} {} rows", rows.len(), type_tag);
    Ok(rows)
}

/// Serve several extraction requests from a single pass over the cursor
///
/// Output order follows `requests`; each series keeps log order.
pub fn extract_many<C: RecordCursor + ?Sized>(
    cursor: &mut C,
    requests: &[ExtractionRequest],
    reference: &ReferenceTime,
) -> Result<Vec<ExtractedSeries>> {
    let mut series: Vec<ExtractedSeries> = requests
        .iter()
        .map(|request| ExtractedSeries {
            request: request.clone(),
            rows: Vec::new(),
        })
        .collect();

    while let Some(record) = cursor.next_record()? {
        for entry in series.iter_mut() {
            if record.is_type(&entry.request.type_tag) {
                let row = project_record(&record, entry.request.field_selection(), reference);
                entry.rows.push(row);
            }
        }
    }

    for entry in &series {
        debug!("Extracted {} {} rows", entry.rows.len(), entry.type_tag());
    }
    Ok(series)
}
