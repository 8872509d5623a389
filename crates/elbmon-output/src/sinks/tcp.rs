use super::WriterSink;
use crate::error::Result;
use crate::MetricSink;
use async_trait::async_trait;
use elbmon_common::types::OutputRecord;
use tokio::net::TcpStream;

/// Carbon plaintext listener, usually on port 2003.
pub struct TcpSink {
    addr: String,
    inner: WriterSink<TcpStream>,
}

impl TcpSink {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        tracing::info!(addr = %addr, "Connected to carbon listener");
        Ok(Self {
            addr: addr.to_string(),
            inner: WriterSink::new("tcp", stream),
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl MetricSink for TcpSink {
    async fn write(&mut self, record: &OutputRecord) -> Result<()> {
        self.inner.write(record).await
    }

    async fn flush(&mut self) -> Result<()> {
        self.inner.flush().await
    }

    fn sink_name(&self) -> &str {
        self.inner.sink_name()
    }
}
