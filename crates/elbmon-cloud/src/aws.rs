use crate::error::{CloudProviderError, Result};
use crate::sigv4::{self, Credentials, RequestTarget};
use crate::{AwsAccountConfig, MetricQuery, MetricsProvider};
use chrono::{DateTime, SecondsFormat, Utc};
use elbmon_common::types::{Datapoint, Statistic};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

const CLOUDWATCH_SERVICE: &str = "monitoring";
const CLOUDWATCH_VERSION: &str = "2010-08-01";
const ELB_SERVICE: &str = "elasticloadbalancing";
const ELB_VERSION: &str = "2012-06-01";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// CloudWatch and classic ELB client speaking the AWS query protocol.
pub struct AwsProvider {
    name: String,
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    region: String,
    cloudwatch_url: Url,
    elb_url: Url,
    client: Client,
}

impl AwsProvider {
    pub fn new(config: AwsAccountConfig) -> Result<Self> {
        if config.access_key_id.trim().is_empty() || config.secret_access_key.trim().is_empty() {
            return Err(CloudProviderError::ConfigError(
                "access key id and secret access key are required".to_string(),
            ));
        }
        if config.region.trim().is_empty() {
            return Err(CloudProviderError::ConfigError(
                "region is required".to_string(),
            ));
        }

        let cloudwatch_url = service_url(
            config.cloudwatch_endpoint.as_deref(),
            CLOUDWATCH_SERVICE,
            &config.region,
        )?;
        let elb_url = service_url(config.elb_endpoint.as_deref(), ELB_SERVICE, &config.region)?;

        let client = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            name: format!("aws:{}", config.region),
            access_key_id: config.access_key_id,
            secret_access_key: config.secret_access_key,
            session_token: config.session_token,
            region: config.region,
            cloudwatch_url,
            elb_url,
            client,
        })
    }

    /// POST a signed query-protocol request and return the raw XML body.
    async fn call_api(
        &self,
        url: &Url,
        service: &str,
        action: &str,
        version: &str,
        extra_params: BTreeMap<String, String>,
    ) -> Result<String> {
        let mut params = extra_params;
        params.insert("Action".to_string(), action.to_string());
        params.insert("Version".to_string(), version.to_string());
        let payload = encode_form(&params);

        let host = host_header(url)?;
        let credentials = Credentials {
            access_key_id: &self.access_key_id,
            secret_access_key: &self.secret_access_key,
            session_token: self.session_token.as_deref(),
        };
        let target = RequestTarget {
            host: &host,
            path: url.path(),
            region: &self.region,
            service,
            content_type: FORM_CONTENT_TYPE,
            payload: &payload,
        };
        let signed = sigv4::sign_post(&credentials, &target, Utc::now())?;

        let mut request = self
            .client
            .post(url.clone())
            .header("Content-Type", FORM_CONTENT_TYPE)
            .header("X-Amz-Date", &signed.amz_date)
            .header("Authorization", &signed.authorization);
        if let Some(token) = &signed.security_token {
            request = request.header("X-Amz-Security-Token", token);
        }

        tracing::debug!(service, action, "Calling AWS API");
        let response = request.body(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(service, status.as_u16(), body));
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl MetricsProvider for AwsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_load_balancers(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut params = BTreeMap::new();
            if let Some(m) = &marker {
                params.insert("Marker".to_string(), m.clone());
            }

            let body = self
                .call_api(
                    &self.elb_url,
                    ELB_SERVICE,
                    "DescribeLoadBalancers",
                    ELB_VERSION,
                    params,
                )
                .await?;
            let page = parse_describe_load_balancers(&body)?;
            names.extend(page.names);

            match page.next_marker {
                Some(next) if !next.is_empty() => marker = Some(next),
                _ => break,
            }
        }

        tracing::debug!(count = names.len(), region = %self.region, "Listed load balancers");
        Ok(names)
    }

    async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>> {
        let body = self
            .call_api(
                &self.cloudwatch_url,
                CLOUDWATCH_SERVICE,
                "GetMetricStatistics",
                CLOUDWATCH_VERSION,
                metric_query_params(query),
            )
            .await?;
        parse_metric_statistics(&body, query.statistic)
    }
}

/// Query-protocol parameters for `GetMetricStatistics`.
pub fn metric_query_params(query: &MetricQuery) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("Namespace".to_string(), query.namespace.clone());
    params.insert("MetricName".to_string(), query.metric_name.clone());
    params.insert(
        "Dimensions.member.1.Name".to_string(),
        query.dimension_name.clone(),
    );
    params.insert(
        "Dimensions.member.1.Value".to_string(),
        query.dimension_value.clone(),
    );
    params.insert(
        "StartTime".to_string(),
        query.start.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    params.insert(
        "EndTime".to_string(),
        query.end.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    params.insert("Period".to_string(), query.period_secs.to_string());
    params.insert(
        "Statistics.member.1".to_string(),
        query.statistic.as_str().to_string(),
    );
    params
}

/// RFC 3986 form encoding of sorted parameters.
fn encode_form(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn service_url(endpoint: Option<&str>, service: &str, region: &str) -> Result<Url> {
    let raw = match endpoint {
        Some(e) if !e.trim().is_empty() => e.trim().to_string(),
        _ => format!("https://{service}.{region}.amazonaws.com/"),
    };
    Url::parse(&raw)
        .map_err(|e| CloudProviderError::ConfigError(format!("invalid {service} endpoint '{raw}': {e}")))
}

fn host_header(url: &Url) -> Result<String> {
    let host = url.host_str().ok_or_else(|| {
        CloudProviderError::ConfigError(format!("endpoint has no host: {url}"))
    })?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

// ---- Response documents ----

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Error")]
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GetMetricStatisticsResponse {
    #[serde(rename = "GetMetricStatisticsResult")]
    result: GetMetricStatisticsResult,
}

#[derive(Debug, Deserialize)]
struct GetMetricStatisticsResult {
    #[serde(rename = "Datapoints", default)]
    datapoints: MemberList<DatapointXml>,
}

#[derive(Debug, Deserialize)]
struct MemberList<T> {
    #[serde(rename = "member", default = "Vec::new")]
    members: Vec<T>,
}

impl<T> Default for MemberList<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatapointXml {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Average")]
    average: Option<f64>,
    #[serde(rename = "Sum")]
    sum: Option<f64>,
    #[serde(rename = "Maximum")]
    maximum: Option<f64>,
}

impl DatapointXml {
    fn value(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::Average => self.average,
            Statistic::Sum => self.sum,
            Statistic::Maximum => self.maximum,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DescribeLoadBalancersResponse {
    #[serde(rename = "DescribeLoadBalancersResult")]
    result: DescribeLoadBalancersResult,
}

#[derive(Debug, Deserialize)]
struct DescribeLoadBalancersResult {
    #[serde(rename = "LoadBalancerDescriptions", default)]
    descriptions: MemberList<LoadBalancerDescription>,
    #[serde(rename = "NextMarker")]
    next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoadBalancerDescription {
    #[serde(rename = "LoadBalancerName")]
    name: String,
}

/// One page of `DescribeLoadBalancers`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBalancerPage {
    pub names: Vec<String>,
    pub next_marker: Option<String>,
}

pub fn parse_describe_load_balancers(body: &str) -> Result<LoadBalancerPage> {
    let doc: DescribeLoadBalancersResponse = quick_xml::de::from_str(body)?;
    Ok(LoadBalancerPage {
        names: doc
            .result
            .descriptions
            .members
            .into_iter()
            .map(|d| d.name)
            .collect(),
        next_marker: doc.result.next_marker,
    })
}

/// Datapoints carrying a value for `statistic`, earliest first.
pub fn parse_metric_statistics(body: &str, statistic: Statistic) -> Result<Vec<Datapoint>> {
    let doc: GetMetricStatisticsResponse = quick_xml::de::from_str(body)?;
    let mut points = Vec::with_capacity(doc.result.datapoints.members.len());

    for member in doc.result.datapoints.members {
        let Some(value) = member.value(statistic) else {
            continue;
        };
        let timestamp = DateTime::parse_from_rfc3339(member.timestamp.trim())
            .map_err(|e| CloudProviderError::MalformedResponse {
                service: CLOUDWATCH_SERVICE.to_string(),
                detail: format!("bad datapoint timestamp '{}': {e}", member.timestamp),
            })?
            .with_timezone(&Utc);
        points.push(Datapoint { value, timestamp });
    }

    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

/// Map a non-2xx response to the most specific error available.
fn api_error(service: &str, status: u16, body: String) -> CloudProviderError {
    match quick_xml::de::from_str::<ErrorResponse>(&body) {
        Ok(doc) if is_throttling(&doc.error.code) => CloudProviderError::RateLimited {
            service: service.to_string(),
            message: doc.error.message,
        },
        Ok(doc) => CloudProviderError::ApiResponseError {
            service: service.to_string(),
            code: doc.error.code,
            message: doc.error.message,
        },
        Err(_) => CloudProviderError::HttpError {
            service: service.to_string(),
            status,
            body,
        },
    }
}

fn is_throttling(code: &str) -> bool {
    matches!(
        code,
        "Throttling" | "ThrottlingException" | "RequestLimitExceeded" | "TooManyRequestsException"
    )
}
