use crate::types::Record;
use crate::Result;

/// Rewindable sequential cursor over decoded telemetry records
///
/// Implementations hold only the current position; every full scan starts
/// with `restart()`.
pub trait RecordCursor {
    /// Next record whose type matches `type_tag` (any type when `None`).
    /// `Ok(None)` signals end-of-stream.
    fn next_matching(&mut self, type_tag: Option<&str>) -> Result<Option<Record>>;

    /// Reposition the cursor at the first record
    fn restart(&mut self) -> Result<()>;

    /// Next record of any type
    fn next_record(&mut self) -> Result<Option<Record>> {
        self.next_matching(None)
    }
}

impl<C: RecordCursor + ?Sized> RecordCursor for &mut C {
    fn next_matching(&mut self, type_tag: Option<&str>) -> Result<Option<Record>> {
        (**self).next_matching(type_tag)
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }
}

impl<C: RecordCursor + ?Sized> RecordCursor for Box<C> {
    fn next_matching(&mut self, type_tag: Option<&str>) -> Result<Option<Record>> {
        (**self).next_matching(type_tag)
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }
}

/// In-memory record source, used for synthetic logs and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    records: Vec<Record>,
    pos: usize,
    restarts: usize,
}

impl MemoryCursor {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            pos: 0,
            restarts: 0,
        }
    }

    /// Number of times `restart()` has been called
    pub fn restart_count(&self) -> usize {
        self.restarts
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl RecordCursor for MemoryCursor {
    fn next_matching(&mut self, type_tag: Option<&str>) -> Result<Option<Record>> {
        while self.pos < self.records.len() {
            let record = &self.records[self.pos];
            self.pos += 1;
            if type_tag.map_or(true, |tag| record.is_type(tag)) {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    fn restart(&mut self) -> Result<()> {
        self.pos = 0;
        self.restarts += 1;
        Ok(())
    }
}

impl From<Vec<Record>> for MemoryCursor {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}
