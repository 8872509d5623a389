use crate::error::Result;
use crate::MetricSink;
use async_trait::async_trait;
use elbmon_common::types::OutputRecord;

/// Keeps records in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<OutputRecord>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

#[async_trait]
impl MetricSink for MemorySink {
    async fn write(&mut self, record: &OutputRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "memory"
    }
}
