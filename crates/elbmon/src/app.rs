use crate::cli::Cli;
use crate::config::{ElbmonConfig, ResolvedConfig};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use elbmon_cloud::collector::ElbCollector;
use elbmon_cloud::{build_provider, MetricsProvider};
use elbmon_common::types::CheckOutcome;
use elbmon_output::{build_sink, MetricSink};
use std::sync::Arc;

/// Run one check end to end: config, provider, sink, collection.
///
/// Setup failures are reported the same way as collection failures.
pub async fn run(cli: &Cli) -> CheckOutcome {
    let resolved = match load_config(cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Invalid configuration");
            return CheckOutcome::critical(format!("Error: {e:#}"));
        }
    };

    let (provider, mut sink) = match connect(&resolved).await {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Failed to initialise provider or output");
            return CheckOutcome::critical(format!("Error: {e:#}"));
        }
    };

    tracing::info!(
        provider = provider.name(),
        output = sink.sink_name(),
        load_balancers = resolved.collector.load_balancers.len(),
        fetch_age_secs = resolved.collector.fetch_age_secs,
        "elbmon starting"
    );

    run_check(&resolved, provider, sink.as_mut(), Utc::now()).await
}

pub fn load_config(cli: &Cli) -> Result<ResolvedConfig> {
    ElbmonConfig::load_optional(cli.config.as_deref())?.resolve(cli)
}

async fn connect(
    resolved: &ResolvedConfig,
) -> Result<(Arc<dyn MetricsProvider>, Box<dyn MetricSink>)> {
    let provider: Arc<dyn MetricsProvider> = build_provider("aws", resolved.account.clone())
        .context("Failed to build AWS provider")?
        .into();
    let sink = build_sink(&resolved.output)
        .await
        .with_context(|| format!("Failed to open output '{}'", resolved.output))?;
    Ok((provider, sink))
}

/// Collect with an already-built provider and sink at a fixed `now`.
pub async fn run_check(
    resolved: &ResolvedConfig,
    provider: Arc<dyn MetricsProvider>,
    sink: &mut dyn MetricSink,
    now: DateTime<Utc>,
) -> CheckOutcome {
    ElbCollector::new(provider, resolved.collector.clone())
        .run(sink, now)
        .await
}
