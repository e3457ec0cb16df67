//! Query executor capability
//!
//! Defines the interface a metrics backend client must satisfy to feed
//! measurements, plus the sample and error types it produces.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Query execution errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Query failed ({error_type}): {error}")]
    Backend { error_type: String, error: String },

    #[error("Unexpected result type: {0}")]
    UnexpectedResultType(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// A single sampled value returned by a query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Label set identifying the series
    #[serde(default)]
    pub metric: BTreeMap<String, String>,

    /// Sampled value
    pub value: f64,

    /// Evaluation timestamp, when the backend reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Sample {
    /// Create an unlabeled sample
    pub fn new(value: f64) -> Self {
        Self {
            metric: BTreeMap::new(),
            value,
            timestamp: None,
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metric.insert(key.into(), value.into());
        self
    }
}

/// Executes instant queries against a metrics backend
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Evaluate `query` at `time` and return the resulting samples
    async fn query(&self, query: &str, time: DateTime<Utc>) -> Result<Vec<Sample>, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_builder() {
        let sample = Sample::new(0.25).with_label("quantile", "0.5");
        assert_eq!(sample.value, 0.25);
        assert_eq!(sample.metric.get("quantile").map(String::as_str), Some("0.5"));
        assert!(sample.timestamp.is_none());
    }

    #[test]
    fn test_query_error_messages() {
        assert_eq!(QueryError::Timeout(30).to_string(), "Timeout after 30 seconds");
        let err = QueryError::Backend {
            error_type: "bad_data".to_string(),
            error: "parse error".to_string(),
        };
        assert_eq!(err.to_string(), "Query failed (bad_data): parse error");
    }
}
