use crate::cli::Cli;
use anyhow::{bail, Context, Result};
use elbmon_cloud::collector::MAX_CONCURRENCY;
use elbmon_cloud::resources::split_names;
use elbmon_cloud::{default_region, AwsAccountConfig, CollectorConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/elbmon.toml";

/// Contents of the TOML config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ElbmonConfig {
    #[serde(default)]
    pub aws: AwsFileConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    /// `stdout` or `tcp://host:port`
    pub output: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AwsFileConfig {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub region: Option<String>,
    pub cloudwatch_endpoint: Option<String>,
    pub elb_endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully merged settings handed to the collector.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub account: AwsAccountConfig,
    pub collector: CollectorConfig,
    pub output: String,
}

impl ElbmonConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), otherwise the default path
    /// when present, otherwise an empty config.
    pub fn load_optional(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "Using default config file");
            return Self::load(&default_path);
        }
        Ok(Self::default())
    }

    /// Merge with command-line flags. A flag (or its environment variable)
    /// wins over the file, the file wins over built-in defaults.
    pub fn resolve(self, cli: &Cli) -> Result<ResolvedConfig> {
        let aws = self.aws;

        let access_key_id = cli
            .aws_access_key
            .clone()
            .or(aws.access_key_id)
            .filter(|v| !v.trim().is_empty());
        let secret_access_key = cli
            .aws_secret_access_key
            .clone()
            .or(aws.secret_access_key)
            .filter(|v| !v.trim().is_empty());
        let (Some(access_key_id), Some(secret_access_key)) = (access_key_id, secret_access_key)
        else {
            bail!("AWS credentials are required: set --aws-access-key and --aws-secret-access-key, [aws] in the config file, or AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY");
        };

        let region = cli
            .aws_region
            .clone()
            .or(aws.region)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_region);

        let account = AwsAccountConfig {
            access_key_id,
            secret_access_key,
            session_token: cli
                .aws_session_token
                .clone()
                .or(aws.session_token)
                .filter(|v| !v.is_empty()),
            region,
            cloudwatch_endpoint: aws.cloudwatch_endpoint,
            elb_endpoint: aws.elb_endpoint,
            timeout_secs: cli.timeout_secs.or(aws.timeout_secs).unwrap_or(30),
        };

        let mut collector = self.collector;
        if let Some(names) = &cli.elbname {
            collector.load_balancers = split_names(names);
        }
        if let Some(scheme) = &cli.scheme {
            collector.scheme = scheme.clone();
        }
        if let Some(fetch_age) = cli.fetch_age {
            collector.fetch_age_secs = fetch_age;
        }
        if let Some(concurrency) = cli.concurrency {
            collector.concurrency = concurrency;
        }
        if collector.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if collector.concurrency > MAX_CONCURRENCY {
            bail!("concurrency must be at most {MAX_CONCURRENCY}");
        }

        let output = cli
            .output
            .clone()
            .or(self.output)
            .unwrap_or_else(|| "stdout".to_string());

        Ok(ResolvedConfig {
            account,
            collector,
            output,
        })
    }
}
