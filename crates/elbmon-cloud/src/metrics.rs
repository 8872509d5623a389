use crate::error::CloudProviderError;
use elbmon_common::types::Statistic;

/// Classic load balancer metrics collected on every run, in emission order.
///
/// The set is closed: each variant carries the statistic the provider must
/// aggregate with, and there is no fallback for names outside it.
///
/// # Examples
///
/// ```
/// use elbmon_cloud::metrics::ElbMetric;
/// use elbmon_common::types::Statistic;
///
/// let metric: ElbMetric = "httpcode_backend_5xx".parse().unwrap();
/// assert_eq!(metric, ElbMetric::HttpCodeBackend5xx);
/// assert_eq!(metric.name(), "HTTPCode_Backend_5XX");
/// assert_eq!(metric.statistic(), Statistic::Sum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElbMetric {
    Latency,
    RequestCount,
    UnHealthyHostCount,
    HealthyHostCount,
    HttpCodeBackend2xx,
    HttpCodeBackend4xx,
    HttpCodeBackend5xx,
    HttpCodeElb4xx,
    HttpCodeElb5xx,
    BackendConnectionErrors,
    SurgeQueueLength,
    SpilloverCount,
}

impl ElbMetric {
    pub const ALL: [ElbMetric; 12] = [
        ElbMetric::Latency,
        ElbMetric::RequestCount,
        ElbMetric::UnHealthyHostCount,
        ElbMetric::HealthyHostCount,
        ElbMetric::HttpCodeBackend2xx,
        ElbMetric::HttpCodeBackend4xx,
        ElbMetric::HttpCodeBackend5xx,
        ElbMetric::HttpCodeElb4xx,
        ElbMetric::HttpCodeElb5xx,
        ElbMetric::BackendConnectionErrors,
        ElbMetric::SurgeQueueLength,
        ElbMetric::SpilloverCount,
    ];

    /// Metric name as the provider spells it.
    pub fn name(&self) -> &'static str {
        match self {
            ElbMetric::Latency => "Latency",
            ElbMetric::RequestCount => "RequestCount",
            ElbMetric::UnHealthyHostCount => "UnHealthyHostCount",
            ElbMetric::HealthyHostCount => "HealthyHostCount",
            ElbMetric::HttpCodeBackend2xx => "HTTPCode_Backend_2XX",
            ElbMetric::HttpCodeBackend4xx => "HTTPCode_Backend_4XX",
            ElbMetric::HttpCodeBackend5xx => "HTTPCode_Backend_5XX",
            ElbMetric::HttpCodeElb4xx => "HTTPCode_ELB_4XX",
            ElbMetric::HttpCodeElb5xx => "HTTPCode_ELB_5XX",
            ElbMetric::BackendConnectionErrors => "BackendConnectionErrors",
            ElbMetric::SurgeQueueLength => "SurgeQueueLength",
            ElbMetric::SpilloverCount => "SpilloverCount",
        }
    }

    pub fn statistic(&self) -> Statistic {
        match self {
            ElbMetric::Latency | ElbMetric::UnHealthyHostCount | ElbMetric::HealthyHostCount => {
                Statistic::Average
            }
            ElbMetric::SurgeQueueLength => Statistic::Maximum,
            ElbMetric::RequestCount
            | ElbMetric::HttpCodeBackend2xx
            | ElbMetric::HttpCodeBackend4xx
            | ElbMetric::HttpCodeBackend5xx
            | ElbMetric::HttpCodeElb4xx
            | ElbMetric::HttpCodeElb5xx
            | ElbMetric::BackendConnectionErrors
            | ElbMetric::SpilloverCount => Statistic::Sum,
        }
    }
}

impl std::fmt::Display for ElbMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ElbMetric {
    type Err = CloudProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElbMetric::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CloudProviderError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metric_maps_to_its_statistic() {
        let expected = [
            ("Latency", Statistic::Average),
            ("RequestCount", Statistic::Sum),
            ("UnHealthyHostCount", Statistic::Average),
            ("HealthyHostCount", Statistic::Average),
            ("HTTPCode_Backend_2XX", Statistic::Sum),
            ("HTTPCode_Backend_4XX", Statistic::Sum),
            ("HTTPCode_Backend_5XX", Statistic::Sum),
            ("HTTPCode_ELB_4XX", Statistic::Sum),
            ("HTTPCode_ELB_5XX", Statistic::Sum),
            ("BackendConnectionErrors", Statistic::Sum),
            ("SurgeQueueLength", Statistic::Maximum),
            ("SpilloverCount", Statistic::Sum),
        ];

        assert_eq!(ElbMetric::ALL.len(), expected.len());
        for (metric, (name, statistic)) in ElbMetric::ALL.iter().zip(expected) {
            assert_eq!(metric.name(), name);
            assert_eq!(metric.statistic(), statistic);
            // Stable across calls
            assert_eq!(metric.statistic(), metric.statistic());
        }
    }

    #[test]
    fn parse_round_trips_through_name() {
        for metric in ElbMetric::ALL {
            assert_eq!(metric.name().parse::<ElbMetric>().unwrap(), metric);
        }
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let err = "EstimatedALBActiveConnectionCount"
            .parse::<ElbMetric>()
            .unwrap_err();
        assert!(matches!(err, CloudProviderError::UnknownMetric(_)));
    }
}
