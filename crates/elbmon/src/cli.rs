use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "elbmon")]
#[command(about = "Poll classic load balancer metrics and emit them as Graphite plaintext")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (default: config/elbmon.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// AWS access key id
    #[arg(short = 'a', long = "aws-access-key", env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key: Option<String>,

    /// AWS secret access key
    #[arg(short = 'k', long = "aws-secret-access-key", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_access_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long = "aws-session-token", env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub aws_session_token: Option<String>,

    /// AWS region (default: us-east-1)
    #[arg(short = 'r', long = "aws-region", env = "AWS_REGION")]
    pub aws_region: Option<String>,

    /// Load balancer name(s), space-delimited. Omit to query all of them.
    #[arg(short = 'l', long = "elbname")]
    pub elbname: Option<String>,

    /// Prefix prepended to every metric path, e.g. "prod.elb."
    #[arg(short = 's', long)]
    pub scheme: Option<String>,

    /// Seconds to back-date the query window, covering reporting delay
    #[arg(short = 'f', long = "fetch-age")]
    pub fetch_age: Option<u64>,

    /// Maximum metric queries in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output target: "stdout" or "tcp://host:port"
    #[arg(short, long)]
    pub output: Option<String>,

    /// HTTP timeout for provider requests, in seconds
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
