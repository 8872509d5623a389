use crate::error::Result;
use crate::graphite::encode_line;
use crate::MetricSink;
use async_trait::async_trait;
use elbmon_common::types::OutputRecord;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Graphite plaintext over any async writer.
pub struct WriterSink<W: AsyncWrite + Unpin + Send> {
    name: &'static str,
    writer: BufWriter<W>,
}

impl WriterSink<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new("stdout", tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> WriterSink<W> {
    pub fn new(name: &'static str, writer: W) -> Self {
        Self {
            name,
            writer: BufWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> MetricSink for WriterSink<W> {
    async fn write(&mut self, record: &OutputRecord) -> Result<()> {
        self.writer
            .write_all(encode_line(record).as_bytes())
            .await?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    fn sink_name(&self) -> &str {
        self.name
    }
}
