//! Prometheus HTTP API client
//!
//! Implements [`QueryExecutor`] on top of the `/api/v1/query` instant query
//! endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::executor::{QueryError, QueryExecutor, Sample};

/// Instant query endpoint path
const QUERY_PATH: &str = "/api/v1/query";

/// Top-level Prometheus API envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    status: String,
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    result_type: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// One element of a `vector` result
#[derive(Debug, Deserialize)]
struct VectorSample {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    value: (f64, String),
}

/// Prometheus client for instant queries
#[derive(Clone)]
pub struct PrometheusClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl PrometheusClient {
    /// Create a new client for the given server URL
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_secs,
        })
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), QUERY_PATH)
    }
}

#[async_trait]
impl QueryExecutor for PrometheusClient {
    async fn query(&self, query: &str, time: DateTime<Utc>) -> Result<Vec<Sample>, QueryError> {
        let url = self.query_url();
        let time_param = format_time(time);
        debug!("Querying {} at {}: {}", url, time_param, query);

        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("time", time_param.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    QueryError::Timeout(self.timeout_secs)
                } else {
                    QueryError::Request(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| QueryError::Request(e.to_string()))?;

        let samples = parse_response(status, &body)?;
        debug!("Query returned {} samples", samples.len());
        Ok(samples)
    }
}

/// Render a timestamp as Prometheus expects it (unix seconds, millisecond precision)
fn format_time(time: DateTime<Utc>) -> String {
    let millis = time.timestamp_millis();
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}

/// Decode an instant query response body into samples
fn parse_response(status: u16, body: &str) -> Result<Vec<Sample>, QueryError> {
    let response: ApiResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(_) if !(200..300).contains(&status) => {
            return Err(QueryError::Status {
                status,
                body: body.to_string(),
            })
        }
        Err(e) => return Err(QueryError::Decode(e.to_string())),
    };

    if response.status != "success" {
        return Err(QueryError::Backend {
            error_type: response.error_type.unwrap_or_else(|| "unknown".to_string()),
            error: response.error.unwrap_or_default(),
        });
    }

    let data = response
        .data
        .ok_or_else(|| QueryError::Decode("missing data field".to_string()))?;

    if data.result_type != "vector" {
        return Err(QueryError::UnexpectedResultType(data.result_type));
    }

    let vector: Vec<VectorSample> =
        serde_json::from_value(data.result).map_err(|e| QueryError::Decode(e.to_string()))?;

    vector
        .into_iter()
        .map(|v| {
            let (ts, raw) = v.value;
            Ok(Sample {
                metric: v.metric,
                value: parse_value(&raw)?,
                timestamp: DateTime::<Utc>::from_timestamp_millis((ts * 1000.0).round() as i64),
            })
        })
        .collect()
}

/// Parse a sample value string, including the special float spellings
fn parse_value(raw: &str) -> Result<f64, QueryError> {
    match raw {
        "NaN" => Ok(f64::NAN),
        "+Inf" | "Inf" => Ok(f64::INFINITY),
        "-Inf" => Ok(f64::NEG_INFINITY),
        other => other
            .parse()
            .map_err(|_| QueryError::Decode(format!("invalid sample value: {other}"))),
    }
}
