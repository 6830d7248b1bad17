// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sinks that receive dispatch records at flush time.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::aggregator::DispatchMap;
use crate::error::DispatchError;

/// Receiver of flushed dispatch records.
#[cfg_attr(test, mockall::automock)]
pub trait DispatchSink: Send + Sync {
    fn dispatch(&self, record: &DispatchMap) -> Result<(), DispatchError>;
}

/// Logs every record through `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DispatchSink for TracingSink {
    fn dispatch(&self, record: &DispatchMap) -> Result<(), DispatchError> {
        let body = serde_json::to_string(record)?;
        tracing::info!(fields = record.len(), record = %body, "Dispatching telemetry record");
        Ok(())
    }
}

/// Writes each record as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> DispatchSink for JsonLinesSink<W> {
    fn dispatch(&self, record: &DispatchMap) -> Result<(), DispatchError> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps every dispatched record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<DispatchMap>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, oldest first.
    pub fn records(&self) -> Vec<DispatchMap> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DispatchSink for MemorySink {
    fn dispatch(&self, record: &DispatchMap) -> Result<(), DispatchError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PropertyKey;

    fn record() -> DispatchMap {
        let mut record = DispatchMap::new();
        record.insert(PropertyKey::HttpEventCount, "2");
        record.insert(PropertyKey::HttpResponseCode, "");
        record
    }

    #[test]
    fn test_json_lines_sink_writes_one_line_per_record() {
        let sink = JsonLinesSink::new(Vec::new());
        sink.dispatch(&record()).unwrap();
        sink.dispatch(&DispatchMap::new()).unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"authtel.response_code":"","authtel.http_event_count":"2"}"#
        );
        assert_eq!(lines[1], "{}");
    }

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.dispatch(&record()).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0], record());
    }

    #[test]
    fn test_tracing_sink_accepts_record() {
        assert!(TracingSink.dispatch(&record()).is_ok());
    }
}
