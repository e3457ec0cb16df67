//! Configuration module
//!
//! Handles loading and managing configuration. Values are layered: config
//! file first, then `NETPROG_*` environment variables, then CLI flags.

mod env;
mod file;

pub use env::EnvConfig;
pub use file::ConfigFile;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::measurement::netprog::DEFAULT_WINDOW;
use crate::utils::logger::LogLevel;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prometheus server URL
    pub prometheus_url: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,

    /// Lookback window of the latency query in seconds
    pub query_window_secs: u64,

    /// Directory summaries are written to, if any
    pub output_dir: Option<String>,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prometheus_url: "http://localhost:9090".to_string(),
            timeout_secs: 30,
            query_window_secs: DEFAULT_WINDOW.as_secs(),
            output_dir: None,
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    /// Query window as a duration
    pub fn query_window(&self) -> Duration {
        Duration::from_secs(self.query_window_secs)
    }

    /// Overlay values set in the environment
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.prometheus_url {
            self.prometheus_url = url.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(window) = env.window {
            self.query_window_secs = window;
        }
        if let Some(dir) = &env.output_dir {
            self.output_dir = Some(dir.clone());
        }
        if let Some(level) = env.log_level {
            self.log_level = level;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.prometheus_url.trim().is_empty() {
            anyhow::bail!("Prometheus URL must not be empty");
        }
        if !self.prometheus_url.starts_with("http://") && !self.prometheus_url.starts_with("https://") {
            anyhow::bail!("Prometheus URL must use http or https: {}", self.prometheus_url);
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("Timeout must be greater than zero");
        }
        if self.query_window_secs == 0 {
            anyhow::bail!("Query window must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.prometheus_url, "http://localhost:9090");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.query_window(), Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_env() {
        let mut config = AppConfig::default();
        let env = EnvConfig {
            prometheus_url: Some("https://prom.example.com".to_string()),
            window: Some(1800),
            log_level: Some(LogLevel::Debug),
            ..Default::default()
        };
        config.apply_env(&env);

        assert_eq!(config.prometheus_url, "https://prom.example.com");
        assert_eq!(config.query_window_secs, 1800);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AppConfig {
            prometheus_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            prometheus_url: "localhost:9090".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            query_window_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("timeout_secs: 5").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.prometheus_url, "http://localhost:9090");
    }
}
