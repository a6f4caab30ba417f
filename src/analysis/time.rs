use crate::conversion::relative_seconds;
use crate::error::AnalyzerError;
use crate::source::RecordCursor;
use crate::Result;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Session reference time (t0), fixed once before any extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceTime {
    /// Raw timestamp every relative time is measured from
    pub t0_us: u64,
    /// Raw timestamp of the very first record, whatever its type
    pub first_record_us: u64,
    /// Whether t0 came from a format record rather than the first-record fallback
    pub from_format_record: bool,
}

impl ReferenceTime {
    /// Seconds between t0 and a raw microsecond timestamp
    pub fn relative_seconds(&self, raw_us: u64) -> f64 {
        relative_seconds(raw_us as f64, self.t0_us)
    }

    /// Same as `relative_seconds` for a decoded `TimeUS` field value
    pub fn relative_seconds_f64(&self, raw_us: f64) -> f64 {
        relative_seconds(raw_us, self.t0_us)
    }
}

/// Establish t0 from the first record of `format_type`, falling back to the
/// first record of any type. Rewinds the cursor before scanning; the scan
/// stops at the first format record.
pub fn establish_reference_time<C: RecordCursor + ?Sized>(
    cursor: &mut C,
    format_type: &str,
) -> Result<ReferenceTime> {
    cursor.restart()?;

    let mut first_record_us = None;
    while let Some(record) = cursor.next_record()? {
        let first = *first_record_us.get_or_insert(record.timestamp_us);
        if record.is_type(format_type) {
            debug!("Log start time: {} ({} record)", record.timestamp_us, format_type);
            return Ok(ReferenceTime {
                t0_us: record.timestamp_us,
                first_record_us: first,
                from_format_record: true,
            });
        }
    }

    match first_record_us {
        Some(first) => {
            debug!(
                "No {} record found, using first record time {} as log start",
                format_type, first
            );
            Ok(ReferenceTime {
                t0_us: first,
                first_record_us: first,
                from_format_record: false,
            })
        }
        None => Err(AnalyzerError::EmptySource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryCursor;
    use crate::types::Record;

    #[test]
    fn test_format_record_sets_t0() {
        let mut cursor = MemoryCursor::new(vec![
            Record::new("PARM", 500),
            Record::new("FMTU", 1000),
            Record::new("FMTU", 1100),
            Record::new("GPS", 2000),
        ]);
        let reference = establish_reference_time(&mut cursor, "FMTU").unwrap();
        assert_eq!(reference.t0_us, 1000);
        assert_eq!(reference.first_record_us, 500);
        assert!(reference.from_format_record);
    }

    #[test]
    fn test_falls_back_to_first_record() {
        let mut cursor =
            MemoryCursor::new(vec![Record::new("GPS", 2000), Record::new("AHR2", 2500)]);
        let reference = establish_reference_time(&mut cursor, "FMTU").unwrap();
        assert_eq!(reference.t0_us, 2000);
        assert_eq!(reference.first_record_us, 2000);
        assert!(!reference.from_format_record);
    }

    #[test]
    fn test_empty_source_fails() {
        let mut cursor = MemoryCursor::new(Vec::new());
        let err = establish_reference_time(&mut cursor, "FMTU").unwrap_err();
        assert!(matches!(err, AnalyzerError::EmptySource));
    }

    #[test]
    fn test_relative_seconds_before_t0_is_negative() {
        let reference = ReferenceTime {
            t0_us: 1_000_000,
            first_record_us: 0,
            from_format_record: true,
        };
        assert_eq!(reference.relative_seconds(3_000_000), 2.0);
        assert_eq!(reference.relative_seconds(500_000), -0.5);
    }
}
