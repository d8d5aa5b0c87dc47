//! Where status records go.
//!
//! Rendering is entirely the front end's concern. The session only appends
//! records and clears the sink wholesale.

use peerseek_core::StatusRecord;

pub trait StatusSink: Send {
    /// Discard everything shown so far.
    fn reset(&mut self);

    fn append(&mut self, record: StatusRecord);
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn append(&mut self, record: StatusRecord) {
        (**self).append(record)
    }
}

/// One call received by a `RecordingSink`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEntry {
    Reset,
    Record(StatusRecord),
}

/// Sink that keeps every call in order. Useful for headless callers and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Vec<SinkEntry>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reset and record, oldest first.
    pub fn entries(&self) -> &[SinkEntry] {
        &self.entries
    }

    /// Records appended since the last reset, i.e. what a screen would show.
    pub fn visible(&self) -> Vec<&StatusRecord> {
        let start = self
            .entries
            .iter()
            .rposition(|e| matches!(e, SinkEntry::Reset))
            .map_or(0, |i| i + 1);
        self.entries[start..]
            .iter()
            .filter_map(|e| match e {
                SinkEntry::Record(r) => Some(r),
                SinkEntry::Reset => None,
            })
            .collect()
    }

    /// Every record ever appended, ignoring resets.
    pub fn records(&self) -> Vec<&StatusRecord> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                SinkEntry::Record(r) => Some(r),
                SinkEntry::Reset => None,
            })
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn reset(&mut self) {
        self.entries.push(SinkEntry::Reset);
    }

    fn append(&mut self, record: StatusRecord) {
        self.entries.push(SinkEntry::Record(record));
    }
}
