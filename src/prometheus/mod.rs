//! Metrics backend access
//!
//! Provides the query executor capability and its Prometheus HTTP implementation.

mod client;
mod executor;

pub use client::PrometheusClient;
pub use executor::{QueryError, QueryExecutor, Sample};
