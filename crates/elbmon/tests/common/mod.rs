#![allow(dead_code)]

use elbmon::cli::Cli;
use elbmon::config::ResolvedConfig;
use elbmon_cloud::{AwsAccountConfig, CollectorConfig};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// One request received by the fake AWS endpoint.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Minimal HTTP/1.1 endpoint answering query-protocol calls.
pub struct FakeAws {
    pub endpoint: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeAws {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bodies_with_action(&self, action: &str) -> Vec<String> {
        let needle = format!("Action={action}");
        self.requests()
            .into_iter()
            .map(|r| r.body)
            .filter(|b| b.contains(&needle))
            .collect()
    }
}

pub async fn spawn_fake_aws<F>(respond: F) -> FakeAws
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let seen = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let respond = Arc::clone(&respond);
            let seen = Arc::clone(&seen);
            tokio::spawn(async move {
                let _ = read_request(socket, respond.as_ref(), &seen).await;
            });
        }
    });

    FakeAws { endpoint, requests }
}

async fn read_request<F>(
    socket: TcpStream,
    respond: &F,
    seen: &Mutex<Vec<RecordedRequest>>,
) -> Option<()>
where
    F: Fn(&str) -> (u16, String),
{
    let mut reader = BufReader::new(socket);
    let mut headers = Vec::new();
    let mut content_length = 0usize;

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.ok()?;

    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':')?;
        let (name, value) = (name.trim().to_string(), value.trim().to_string());
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value.parse().ok()?;
        }
        headers.push((name, value));
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await.ok()?;
    let body = String::from_utf8(body).ok()?;

    let (status, payload) = respond(&body);
    seen.lock().unwrap().push(RecordedRequest { headers, body });

    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        if status < 400 { "OK" } else { "Error" },
        payload.len()
    );
    let mut socket = reader.into_inner();
    socket.write_all(response.as_bytes()).await.ok()?;
    socket.shutdown().await.ok()?;
    Some(())
}

pub fn describe_load_balancers_xml(names: &[&str], next_marker: Option<&str>) -> String {
    let members: String = names
        .iter()
        .map(|n| format!("<member><LoadBalancerName>{n}</LoadBalancerName></member>"))
        .collect();
    let marker = next_marker
        .map(|m| format!("<NextMarker>{m}</NextMarker>"))
        .unwrap_or_default();
    format!(
        "<DescribeLoadBalancersResponse xmlns=\"http://elasticloadbalancing.amazonaws.com/doc/2012-06-01/\">\
         <DescribeLoadBalancersResult>{marker}<LoadBalancerDescriptions>{members}</LoadBalancerDescriptions></DescribeLoadBalancersResult>\
         </DescribeLoadBalancersResponse>"
    )
}

pub fn metric_statistics_xml(statistic: &str, points: &[(&str, f64)]) -> String {
    let members: String = points
        .iter()
        .map(|(ts, v)| format!("<member><Timestamp>{ts}</Timestamp><{statistic}>{v}</{statistic}><Unit>None</Unit></member>"))
        .collect();
    format!(
        "<GetMetricStatisticsResponse xmlns=\"http://monitoring.amazonaws.com/doc/2010-08-01/\">\
         <GetMetricStatisticsResult><Datapoints>{members}</Datapoints><Label>metric</Label></GetMetricStatisticsResult>\
         </GetMetricStatisticsResponse>"
    )
}

pub fn error_xml(code: &str, message: &str) -> String {
    format!(
        "<ErrorResponse><Error><Type>Sender</Type><Code>{code}</Code><Message>{message}</Message></Error><RequestId>test</RequestId></ErrorResponse>"
    )
}

/// A CLI with no flags set, independent of the process environment.
pub fn empty_cli() -> Cli {
    Cli {
        config: None,
        aws_access_key: None,
        aws_secret_access_key: None,
        aws_session_token: None,
        aws_region: None,
        elbname: None,
        scheme: None,
        fetch_age: None,
        concurrency: None,
        output: None,
        timeout_secs: None,
        verbose: false,
    }
}

pub fn resolved_for(endpoint: &str, collector: CollectorConfig) -> ResolvedConfig {
    ResolvedConfig {
        account: AwsAccountConfig {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: None,
            region: "us-east-1".to_string(),
            cloudwatch_endpoint: Some(endpoint.to_string()),
            elb_endpoint: Some(endpoint.to_string()),
            timeout_secs: 5,
        },
        collector,
        output: "stdout".to_string(),
    }
}
