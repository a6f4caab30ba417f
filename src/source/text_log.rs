//! Text DataFlash log reader
//!
//! Reads the ASCII rendition of ArduPilot DataFlash logs, where every line is
//! a comma-separated message and `FMT` lines describe the columns of each
//! message type:
//!
//! ```text
//! FMT, 130, 45, GPS, QBIHBcLLeffffB, TimeUS,I,Status,GMS,GWk,NSats,HDop,Lat,Lng,Alt,Spd,GCrs,VZ,Yaw,U
//! GPS, 2000, 0, 3, 0, 0, 12, 0.7, -35.3632, 149.1652, 584.1, 0.1, 0, 0, 0, 1
//! ```

use crate::error::AnalyzerError;
use crate::source::cursor::RecordCursor;
use crate::types::{FieldValue, Record};
use crate::Result;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Message type carrying column definitions
pub const FMT_MESSAGE: &str = "FMT";

/// Column holding the raw microsecond timestamp
pub const TIME_US_FIELD: &str = "TimeUS";

/// FMT type characters for fixed-width string columns
const STRING_FORMAT_CHARS: [char; 3] = ['n', 'N', 'Z'];

/// Column layout of one message type, as declared by its `FMT` line
#[derive(Debug, Clone)]
struct MessageSchema {
    format: String,
    columns: Vec<String>,
}

impl MessageSchema {
    /// Whether the last column is a string that may swallow unquoted commas
    fn last_column_is_text(&self) -> bool {
        self.columns
            .len()
            .checked_sub(1)
            .and_then(|i| self.format.chars().nth(i))
            .is_some_and(|c| STRING_FORMAT_CHARS.contains(&c))
    }
}

/// Stateful line parser; holds the message definitions seen so far
#[derive(Debug, Default)]
pub struct TextLogParser {
    schemas: HashMap<String, MessageSchema>,
    last_timestamp_us: u64,
    skipped_lines: usize,
}

impl TextLogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line; `Ok(None)` for schema lines, blank lines and
    /// messages with no known definition.
    pub fn parse_line(&mut self, line: &str, line_number: usize) -> Result<Option<Record>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
        let type_tag = tokens[0];

        if type_tag == FMT_MESSAGE {
            self.parse_format_line(&tokens, line_number)?;
            return Ok(None);
        }

        let Some(schema) = self.schemas.get(type_tag) else {
            trace!("Line {}: no FMT definition for '{}'", line_number, type_tag);
            self.skipped_lines += 1;
            return Ok(None);
        };

        let columns = &schema.columns;
        let values = &tokens[1..];
        let join_overflow = values.len() > columns.len() && schema.last_column_is_text();
        if values.len() > columns.len() && !join_overflow {
            trace!(
                "Line {}: ignoring {} values beyond the {} columns of {}",
                line_number,
                values.len() - columns.len(),
                columns.len(),
                type_tag
            );
        }

        let mut record = Record::new(type_tag, self.last_timestamp_us);
        for (i, (column, raw)) in columns.iter().zip(values).enumerate() {
            // String columns (e.g. MSG.Message) may themselves contain commas
            let value = if join_overflow && i + 1 == columns.len() {
                FieldValue::Text(values[i..].join(","))
            } else {
                FieldValue::parse(raw)
            };
            record.set(column, value);
        }

        if let Some(time_us) = record.get(TIME_US_FIELD).and_then(FieldValue::as_i64) {
            let time_us = u64::try_from(time_us).map_err(|_| AnalyzerError::Parse {
                line: line_number,
                message: format!("negative {} value {}", TIME_US_FIELD, time_us),
            })?;
            record.timestamp_us = time_us;
            self.last_timestamp_us = time_us;
        }

        Ok(Some(record))
    }

    fn parse_format_line(&mut self, tokens: &[&str], line_number: usize) -> Result<()> {
        // FMT, Type, Length, Name, Format, Columns...
        if tokens.len() < 5 {
            return Err(AnalyzerError::Parse {
                line: line_number,
                message: format!("FMT line has {} fields, expected at least 5", tokens.len()),
            });
        }

        let name = tokens[3].to_string();
        let format = tokens[4].to_string();
        let columns: Vec<String> = tokens[5..]
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();

        trace!("Line {}: FMT {} with {} columns", line_number, name, columns.len());
        self.schemas.insert(name, MessageSchema { format, columns });
        Ok(())
    }

    /// Columns defined for a message type
    pub fn columns(&self, type_tag: &str) -> Option<&[String]> {
        self.schemas.get(type_tag).map(|schema| schema.columns.as_slice())
    }

    /// Number of data lines dropped for lack of a definition
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

/// Cursor over a text DataFlash file; rewinds by re-opening the file
pub struct TextLogCursor {
    path: PathBuf,
    reader: BufReader<File>,
    parser: TextLogParser,
    line_number: usize,
    buffer: String,
}

impl TextLogCursor {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        debug!("Opened text log {:?}", path);
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            parser: TextLogParser::new(),
            line_number: 0,
            buffer: String::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parser(&self) -> &TextLogParser {
        &self.parser
    }
}

impl RecordCursor for TextLogCursor {
    fn next_matching(&mut self, type_tag: Option<&str>) -> Result<Option<Record>> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let Some(record) = self.parser.parse_line(&self.buffer, self.line_number)? else {
                continue;
            };
            if type_tag.map_or(true, |tag| record.is_type(tag)) {
                return Ok(Some(record));
            }
        }
    }

    fn restart(&mut self) -> Result<()> {
        let file = File::open(&self.path)?;
        self.reader = BufReader::new(file);
        self.parser = TextLogParser::new();
        self.line_number = 0;
        debug!("Rewound text log {:?}", self.path);
        Ok(())
    }
}
