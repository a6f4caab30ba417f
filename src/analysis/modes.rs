//! Flight-mode transition detection
//!
//! Mode codes resolve through a `ModeTable`. Codes missing from the table
//! produce an `Unknown Mode: <code>` label instead of an error.

use crate::analysis::time::ReferenceTime;
use crate::source::RecordCursor;
use crate::types::ModeEvent;
use crate::Result;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Integer mode code to symbolic name mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTable {
    names: BTreeMap<i64, String>,
}

impl ModeTable {
    pub fn empty() -> Self {
        Self {
            names: BTreeMap::new(),
        }
    }

    /// Known plane modes: AUTO, FBWB and the QuadPlane hover modes
    pub fn ardupilot_plane() -> Self {
        let mut table = Self::empty();
        table.insert(10, "AUTO");
        table.insert(17, "FBWB");
        table.insert(18, "QHOVER");
        table.insert(19, "QLOITER");
        table
    }

    /// Add or rename a mode code
    pub fn insert(&mut self, code: i64, name: &str) {
        self.names.insert(code, name.to_string());
    }

    pub fn get(&self, code: i64) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    /// Symbolic name, never failing on unknown codes
    pub fn lookup(&self, code: i64) -> String {
        match self.get(code) {
            Some(name) => name.to_string(),
            None => format!("Unknown Mode: {}", code),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parse a `CODE=NAME` override as given on the command line
    pub fn parse_entry(entry: &str) -> Option<(i64, String)> {
        let (code, name) = entry.split_once('=')?;
        let code = code.trim().parse().ok()?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((code, name.to_string()))
    }
}

impl Default for ModeTable {
    fn default() -> Self {
        Self::ardupilot_plane()
    }
}

/// Lazy stream of mode changes in log order
///
/// Finite and single-use: restarting requires rewinding the cursor and
/// building a new iterator.
pub struct ModeEvents<'a, C: RecordCursor + ?Sized> {
    cursor: &'a mut C,
    table: &'a ModeTable,
    reference: ReferenceTime,
    mode_type: &'a str,
    mode_field: &'a str,
    done: bool,
}

impl<'a, C: RecordCursor + ?Sized> ModeEvents<'a, C> {
    pub fn new(
        cursor: &'a mut C,
        table: &'a ModeTable,
        reference: ReferenceTime,
        mode_type: &'a str,
        mode_field: &'a str,
    ) -> Self {
        Self {
            cursor,
            table,
            reference,
            mode_type,
            mode_field,
            done: false,
        }
    }
}

impl<'a, C: RecordCursor + ?Sized> Iterator for ModeEvents<'a, C> {
    type Item = Result<ModeEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let record = match self.cursor.next_matching(Some(self.mode_type)) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            let Some(code) = record.get(self.mode_field).and_then(|v| v.as_i64()) else {
                warn!(
                    "{} record at {} has no integer '{}' field, skipping",
                    self.mode_type, record.timestamp_us, self.mode_field
                );
                continue;
            };

            let event = ModeEvent {
                relative_time: self.reference.relative_seconds(record.timestamp_us),
                mode_code: code,
                mode_name: self.table.lookup(code),
            };
            info!("{}", event);
            return Some(Ok(event));
        }
        None
    }
}

/// Collect all mode changes from the cursor's current position
pub fn detect_mode_changes<C: RecordCursor + ?Sized>(
    cursor: &mut C,
    table: &ModeTable,
    reference: ReferenceTime,
    mode_type: &str,
    mode_field: &str,
) -> Result<Vec<ModeEvent>> {
    ModeEvents::new(cursor, table, reference, mode_type, mode_field).collect()
}
