use crate::metrics::ElbMetric;
use anyhow::{Context, Result};
use elbmon_common::types::{Datapoint, OutputRecord};
use elbmon_output::MetricSink;

/// Record path: `<prefix><load_balancer>.<metric in lowercase>`.
///
/// The prefix is prepended verbatim, so it carries its own separator.
///
/// # Examples
///
/// ```
/// use elbmon_cloud::emitter::metric_path;
/// use elbmon_cloud::metrics::ElbMetric;
///
/// assert_eq!(
///     metric_path("prod.", "app-lb", ElbMetric::HttpCodeBackend5xx),
///     "prod.app-lb.httpcode_backend_5xx"
/// );
/// ```
pub fn metric_path(prefix: &str, load_balancer: &str, metric: ElbMetric) -> String {
    format!(
        "{prefix}{load_balancer}.{}",
        metric.name().to_lowercase()
    )
}

pub fn build_record(
    prefix: &str,
    load_balancer: &str,
    metric: ElbMetric,
    datapoint: &Datapoint,
) -> OutputRecord {
    OutputRecord::new(
        metric_path(prefix, load_balancer, metric),
        datapoint.value,
        datapoint.timestamp.timestamp(),
    )
}

/// Assembles records under a fixed prefix and writes them to a sink.
pub struct RecordEmitter<'a> {
    prefix: &'a str,
    sink: &'a mut dyn MetricSink,
    emitted: usize,
}

impl<'a> RecordEmitter<'a> {
    pub fn new(prefix: &'a str, sink: &'a mut dyn MetricSink) -> Self {
        Self {
            prefix,
            sink,
            emitted: 0,
        }
    }

    pub async fn emit(
        &mut self,
        load_balancer: &str,
        metric: ElbMetric,
        datapoint: &Datapoint,
    ) -> Result<()> {
        let record = build_record(self.prefix, load_balancer, metric, datapoint);
        self.sink
            .write(&record)
            .await
            .with_context(|| format!("Failed to write {} to {}", record.path, self.sink.sink_name()))?;
        self.emitted += 1;
        Ok(())
    }

    pub async fn finish(self) -> Result<usize> {
        self.sink
            .flush()
            .await
            .with_context(|| format!("Failed to flush {}", self.sink.sink_name()))?;
        Ok(self.emitted)
    }
}
