use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregation applied by the provider over a query period.
///
/// # Examples
///
/// ```
/// use elbmon_common::types::Statistic;
///
/// let stat = Statistic::Maximum;
/// assert_eq!(stat.as_str(), "Maximum");
/// assert_eq!(stat.to_string(), "Maximum");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Average,
    Sum,
    Maximum,
}

impl Statistic {
    /// Provider spelling, also the key of the value in a returned datapoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Sum => "Sum",
            Statistic::Maximum => "Maximum",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aggregated value returned by a metric query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// A flat record ready for a time-series store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub path: String,
    pub value: f64,
    /// Unix timestamp in whole seconds
    pub timestamp: i64,
}

impl OutputRecord {
    pub fn new(path: impl Into<String>, value: f64, timestamp: i64) -> Self {
        Self {
            path: path.into(),
            value,
            timestamp,
        }
    }
}

/// Final status of one check invocation.
///
/// # Examples
///
/// ```
/// use elbmon_common::types::CheckStatus;
///
/// assert_eq!(CheckStatus::Ok.exit_code(), 0);
/// assert_eq!(CheckStatus::Critical.exit_code(), 2);
/// assert_eq!(CheckStatus::Critical.to_string(), "CRITICAL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Critical,
}

impl CheckStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckStatus::Ok => 0,
            CheckStatus::Critical => 2,
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "OK"),
            CheckStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Outcome reported once at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Ok,
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Critical,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CheckStatus::Ok
    }
}
