use crate::metrics::ElbMetric;
use crate::window::{TimeWindow, WINDOW_SECS};
use crate::{MetricQuery, MetricsProvider, ELB_NAMESPACE, LOAD_BALANCER_DIMENSION};
use anyhow::{Context, Result};
use elbmon_common::types::Datapoint;

/// Query for one metric of one load balancer over `window`.
pub fn build_query(load_balancer: &str, metric: ElbMetric, window: &TimeWindow) -> MetricQuery {
    MetricQuery {
        namespace: ELB_NAMESPACE.to_string(),
        dimension_name: LOAD_BALANCER_DIMENSION.to_string(),
        dimension_value: load_balancer.to_string(),
        metric_name: metric.name().to_string(),
        statistic: metric.statistic(),
        start: window.start,
        end: window.end,
        period_secs: WINDOW_SECS,
    }
}

/// Fetch the datapoint for `metric` on `load_balancer`, if the provider has one.
///
/// With a period equal to the window length at most one datapoint is
/// expected; if several come back the earliest wins.
pub async fn fetch_datapoint(
    provider: &dyn MetricsProvider,
    load_balancer: &str,
    metric: ElbMetric,
    window: &TimeWindow,
) -> Result<Option<Datapoint>> {
    let query = build_query(load_balancer, metric, window);
    let points = provider
        .get_metric_statistics(&query)
        .await
        .with_context(|| format!("Failed to fetch {metric} for {load_balancer}"))?;

    let point = points.into_iter().min_by_key(|p| p.timestamp);
    if point.is_none() {
        tracing::debug!(load_balancer, metric = %metric, "No datapoint in window");
    }
    Ok(point)
}
