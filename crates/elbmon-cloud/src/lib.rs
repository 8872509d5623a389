//! Classic load balancer metric collection.
//!
//! A [`MetricsProvider`] lists load balancers and answers single-statistic
//! metric queries; the [`collector::ElbCollector`] walks every load balancer
//! and every [`metrics::ElbMetric`], turning each returned datapoint into a
//! flat record for the output sink.

pub mod aws;
pub mod collector;
pub mod emitter;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod resources;
pub mod sigv4;
pub mod window;


use chrono::{DateTime, Utc};
use elbmon_common::types::{Datapoint, Statistic};
use serde::{Deserialize, Deserializer, Serialize};

/// Namespace holding the classic load balancer metrics.
pub const ELB_NAMESPACE: &str = "AWS/ELB";

/// Dimension that scopes a metric to a single load balancer.
pub const LOAD_BALANCER_DIMENSION: &str = "LoadBalancerName";

/// Account and endpoint settings for the AWS provider.
///
/// Credentials are always passed in explicitly; nothing in this crate reads
/// them from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsAccountConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    /// Overrides `https://monitoring.<region>.amazonaws.com`
    #[serde(default)]
    pub cloudwatch_endpoint: Option<String>,
    /// Overrides `https://elasticloadbalancing.<region>.amazonaws.com`
    #[serde(default)]
    pub elb_endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

pub fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// What to collect and how to name it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Explicit load balancer names. Empty means "list them from the provider".
    #[serde(
        default,
        alias = "load_balancer",
        alias = "elbname",
        deserialize_with = "deserialize_names"
    )]
    pub load_balancers: Vec<String>,
    /// Prefix prepended verbatim to every record path.
    #[serde(default)]
    pub scheme: String,
    #[serde(default = "default_fetch_age")]
    pub fetch_age_secs: u64,
    /// Maximum queries in flight. 1 keeps the run fully serial.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            load_balancers: Vec::new(),
            scheme: String::new(),
            fetch_age_secs: default_fetch_age(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_fetch_age() -> u64 {
    window::DEFAULT_FETCH_AGE_SECS
}

fn default_concurrency() -> usize {
    1
}

fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NamesInput {
        One(String),
        Many(Vec<String>),
    }

    match NamesInput::deserialize(deserializer)? {
        NamesInput::One(names) => Ok(resources::split_names(&names)),
        NamesInput::Many(names) => Ok(names
            .iter()
            .flat_map(|n| resources::split_names(n))
            .collect()),
    }
}

/// A single-statistic metric query over one window.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub namespace: String,
    pub dimension_name: String,
    pub dimension_value: String,
    pub metric_name: String,
    pub statistic: Statistic,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_secs: i64,
}

/// Source of load balancer names and metric statistics.
#[async_trait::async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Provider name used in logs (e.g. `"aws:us-east-1"`).
    fn name(&self) -> &str;

    /// Names of every load balancer visible to the account, in provider order.
    async fn list_load_balancers(&self) -> error::Result<Vec<String>>;

    /// Datapoints for `query`. An empty vector means no data for the window.
    async fn get_metric_statistics(&self, query: &MetricQuery) -> error::Result<Vec<Datapoint>>;
}

/// Build a metrics provider from account configuration.
///
/// # Errors
///
/// Returns [`error::CloudProviderError::UnsupportedProvider`] if `provider_type`
/// is not `"aws"`.
/// Returns [`error::CloudProviderError::ConfigError`] if the account config is invalid.
pub fn build_provider(
    provider_type: &str,
    config: AwsAccountConfig,
) -> error::Result<Box<dyn MetricsProvider>> {
    match provider_type {
        "aws" => Ok(Box::new(aws::AwsProvider::new(config)?)),
        _ => Err(error::CloudProviderError::UnsupportedProvider(
            provider_type.to_string(),
        )),
    }
}
