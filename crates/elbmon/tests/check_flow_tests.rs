mod common;

use chrono::{TimeZone, Utc};
use common::{
    describe_load_balancers_xml, error_xml, metric_statistics_xml, resolved_for, spawn_fake_aws,
};
use elbmon::app::run_check;
use elbmon_cloud::{build_provider, CollectorConfig, MetricsProvider};
use elbmon_common::types::{CheckStatus, OutputRecord};
use elbmon_output::sinks::{MemorySink, WriterSink};
use std::sync::Arc;

fn provider_for(resolved: &elbmon::config::ResolvedConfig) -> Arc<dyn MetricsProvider> {
    build_provider("aws", resolved.account.clone())
        .expect("provider should build")
        .into()
}

/// Latency 12.5 at t=1000 for every load balancer, nothing else.
fn latency_only(body: &str) -> (u16, String) {
    if body.contains("Action=DescribeLoadBalancers") {
        if body.contains("Marker=page-2") {
            (200, describe_load_balancers_xml(&["lb2"], None))
        } else {
            (200, describe_load_balancers_xml(&["lb1"], Some("page-2")))
        }
    } else if body.contains("MetricName=Latency") {
        (
            200,
            metric_statistics_xml("Average", &[("1970-01-01T00:16:40Z", 12.5)]),
        )
    } else {
        (200, metric_statistics_xml("Sum", &[]))
    }
}

#[tokio::test]
async fn discovers_all_pages_and_emits_latency_for_each() {
    let fake = spawn_fake_aws(latency_only).await;
    let resolved = resolved_for(&fake.endpoint, CollectorConfig::default());
    let mut sink = MemorySink::new();

    let outcome = run_check(
        &resolved,
        provider_for(&resolved),
        &mut sink,
        Utc.timestamp_opt(1_120, 0).unwrap(),
    )
    .await;

    assert_eq!(outcome.status, CheckStatus::Ok, "{}", outcome.message);
    assert_eq!(
        sink.records(),
        &[
            OutputRecord::new("lb1.latency", 12.5, 1000),
            OutputRecord::new("lb2.latency", 12.5, 1000),
        ]
    );

    assert_eq!(fake.bodies_with_action("DescribeLoadBalancers").len(), 2);
    let metric_calls = fake.bodies_with_action("GetMetricStatistics");
    assert_eq!(metric_calls.len(), 24);
    let first = &metric_calls[0];
    assert!(first.contains("Namespace=AWS%2FELB"));
    assert!(first.contains("Dimensions.member.1.Name=LoadBalancerName"));
    assert!(first.contains("Dimensions.member.1.Value=lb1"));
    assert!(first.contains("StartTime=1970-01-01T00%3A16%3A40Z"));
    assert!(first.contains("EndTime=1970-01-01T00%3A17%3A40Z"));
    assert!(first.contains("Period=60"));
    assert!(first.contains("Statistics.member.1=Average"));
}

#[tokio::test]
async fn requests_are_signed() {
    let fake = spawn_fake_aws(latency_only).await;
    let collector = CollectorConfig {
        load_balancers: vec!["lb1".to_string()],
        ..Default::default()
    };
    let resolved = resolved_for(&fake.endpoint, collector);
    let mut sink = MemorySink::new();

    run_check(&resolved, provider_for(&resolved), &mut sink, Utc::now()).await;

    let requests = fake.requests();
    assert!(!requests.is_empty());
    for request in requests {
        let auth = request.header("authorization").expect("signed request");
        assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(auth.contains("/us-east-1/monitoring/aws4_request"));
        assert!(request.header("x-amz-date").is_some());
        assert!(request.header("x-amz-security-token").is_none());
    }
}

#[tokio::test]
async fn graphite_output_uses_scheme_prefix() {
    let fake = spawn_fake_aws(latency_only).await;
    let collector = CollectorConfig {
        load_balancers: vec!["app-lb".to_string()],
        scheme: "prod.elb.".to_string(),
        ..Default::default()
    };
    let resolved = resolved_for(&fake.endpoint, collector);
    let mut sink = WriterSink::new("buffer", Vec::new());

    let outcome = run_check(
        &resolved,
        provider_for(&resolved),
        &mut sink,
        Utc.timestamp_opt(1_120, 0).unwrap(),
    )
    .await;

    assert!(outcome.is_ok());
    let written = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(written, "prod.elb.app-lb.latency 12.5 1000\n");
    assert!(fake.bodies_with_action("DescribeLoadBalancers").is_empty());
}

#[tokio::test]
async fn provider_error_is_reported_as_critical() {
    let fake = spawn_fake_aws(|_body: &str| {
        (
            403,
            error_xml(
                "InvalidClientTokenId",
                "The security token included in the request is invalid.",
            ),
        )
    })
    .await;
    let resolved = resolved_for(&fake.endpoint, CollectorConfig::default());
    let mut sink = MemorySink::new();

    let outcome = run_check(&resolved, provider_for(&resolved), &mut sink, Utc::now()).await;

    assert_eq!(outcome.status, CheckStatus::Critical);
    assert!(outcome.message.contains("InvalidClientTokenId"));
    assert!(outcome
        .message
        .contains("The security token included in the request is invalid."));
    assert!(sink.records().is_empty());
    assert!(fake.bodies_with_action("GetMetricStatistics").is_empty());
}

#[tokio::test]
async fn quiet_minute_is_still_ok() {
    let fake = spawn_fake_aws(|body: &str| {
        if body.contains("Action=DescribeLoadBalancers") {
            (200, describe_load_balancers_xml(&["idle-lb"], None))
        } else {
            (200, metric_statistics_xml("Sum", &[]))
        }
    })
    .await;
    let resolved = resolved_for(&fake.endpoint, CollectorConfig::default());
    let mut sink = MemorySink::new();

    let outcome = run_check(&resolved, provider_for(&resolved), &mut sink, Utc::now()).await;

    assert!(outcome.is_ok());
    assert_eq!(outcome.message, "0 metric records emitted");
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn concurrent_run_matches_serial_output() {
    let fake = spawn_fake_aws(latency_only).await;
    let collector = CollectorConfig {
        load_balancers: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        concurrency: 5,
        ..Default::default()
    };
    let resolved = resolved_for(&fake.endpoint, collector);
    let mut sink = MemorySink::new();

    let outcome = run_check(
        &resolved,
        provider_for(&resolved),
        &mut sink,
        Utc.timestamp_opt(1_120, 0).unwrap(),
    )
    .await;

    assert!(outcome.is_ok());
    let paths: Vec<&str> = sink.records().iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["a.latency", "b.latency", "c.latency"]);
}
