use crate::emitter::RecordEmitter;
use crate::fetcher::fetch_datapoint;
use crate::metrics::ElbMetric;
use crate::resources::resolve_load_balancers;
use crate::window::TimeWindow;
use crate::{CollectorConfig, MetricsProvider};
use anyhow::Result;
use chrono::{DateTime, Utc};
use elbmon_common::types::{CheckOutcome, Datapoint};
use elbmon_output::MetricSink;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};

/// Upper bound on `concurrency`; larger values cannot back a semaphore.
pub const MAX_CONCURRENCY: usize = Semaphore::MAX_PERMITS;

type FetchResult = Result<(String, ElbMetric, Option<Datapoint>)>;

/// Single-shot collection of every load balancer metric for one window.
pub struct ElbCollector {
    provider: Arc<dyn MetricsProvider>,
    config: CollectorConfig,
}

impl ElbCollector {
    pub fn new(provider: Arc<dyn MetricsProvider>, config: CollectorConfig) -> Self {
        Self { provider, config }
    }

    /// Collect and emit, folding any error into a failed outcome.
    ///
    /// Records written before a failure stay written.
    pub async fn run(&self, sink: &mut dyn MetricSink, now: DateTime<Utc>) -> CheckOutcome {
        match self.collect(sink, now).await {
            Ok(count) => {
                tracing::info!(records = count, "Load balancer metrics collected");
                CheckOutcome::ok(format!("{count} metric records emitted"))
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Load balancer metrics collection failed");
                CheckOutcome::critical(format!("Error: {e:#}"))
            }
        }
    }

    /// Collect and emit, returning the number of records written.
    pub async fn collect(&self, sink: &mut dyn MetricSink, now: DateTime<Utc>) -> Result<usize> {
        let window = TimeWindow::ending_before(now, self.config.fetch_age_secs)?;
        tracing::debug!(
            start = %window.start_rfc3339(),
            end = %window.end_rfc3339(),
            length_secs = window.length_secs(),
            "Computed query window"
        );

        let load_balancers =
            resolve_load_balancers(&self.config.load_balancers, self.provider.as_ref()).await?;

        let mut emitter = RecordEmitter::new(&self.config.scheme, sink);
        let walked = if load_balancers.is_empty() {
            tracing::warn!("No load balancers to query");
            Ok(())
        } else if self.config.concurrency <= 1 {
            self.collect_serial(&load_balancers, &window, &mut emitter)
                .await
        } else {
            self.collect_concurrent(&load_balancers, &window, &mut emitter)
                .await
        };

        // Flush even on failure so already-emitted records reach the sink
        let flushed = emitter.finish().await;
        walked?;
        flushed
    }

    async fn collect_serial(
        &self,
        load_balancers: &[String],
        window: &TimeWindow,
        emitter: &mut RecordEmitter<'_>,
    ) -> Result<()> {
        for load_balancer in load_balancers {
            for metric in ElbMetric::ALL {
                let point =
                    fetch_datapoint(self.provider.as_ref(), load_balancer, metric, window).await?;
                if let Some(point) = point {
                    emitter.emit(load_balancer, metric, &point).await?;
                }
            }
        }
        Ok(())
    }

    /// Fetches run with bounded fan-out; emission follows the serial order.
    async fn collect_concurrent(
        &self,
        load_balancers: &[String],
        window: &TimeWindow,
        emitter: &mut RecordEmitter<'_>,
    ) -> Result<()> {
        let semaphore = Arc::new(Semaphore::new(
            self.config.concurrency.min(MAX_CONCURRENCY),
        ));
        let mut tasks: Vec<JoinHandle<FetchResult>> =
            Vec::with_capacity(load_balancers.len() * ElbMetric::ALL.len());

        for load_balancer in load_balancers {
            for metric in ElbMetric::ALL {
                let sem = Arc::clone(&semaphore);
                let provider = Arc::clone(&self.provider);
                let load_balancer = load_balancer.clone();
                let window = *window;

                tasks.push(tokio::spawn(async move {
                    let _permit = sem.acquire_owned().await?;
                    let point =
                        fetch_datapoint(provider.as_ref(), &load_balancer, metric, &window).await?;
                    Ok::<_, anyhow::Error>((load_balancer, metric, point))
                }));
            }
        }

        tracing::debug!(
            tasks = tasks.len(),
            concurrency = self.config.concurrency,
            "Spawned metric fetches"
        );

        let mut pending = tasks.into_iter();
        while let Some(task) = pending.next() {
            if let Err(e) = emit_joined(task.await, emitter).await {
                pending.by_ref().for_each(|t| t.abort());
                return Err(e);
            }
        }
        Ok(())
    }
}

async fn emit_joined(
    joined: std::result::Result<FetchResult, JoinError>,
    emitter: &mut RecordEmitter<'_>,
) -> Result<()> {
    let fetched = joined.map_err(|e| anyhow::anyhow!("Metric fetch task failed: {e}"))?;
    if let (load_balancer, metric, Some(point)) = fetched? {
        emitter.emit(&load_balancer, metric, &point).await?;
    }
    Ok(())
}
