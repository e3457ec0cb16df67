//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use crate::utils::logger::LogLevel;

/// Environment variable prefix
const ENV_PREFIX: &str = "NETPROG";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Prometheus URL from NETPROG_PROMETHEUS_URL
    pub prometheus_url: Option<String>,
    /// Request timeout from NETPROG_TIMEOUT
    pub timeout: Option<u64>,
    /// Query window in seconds from NETPROG_WINDOW
    pub window: Option<u64>,
    /// Summary output directory from NETPROG_OUTPUT_DIR
    pub output_dir: Option<String>,
    /// Config file from NETPROG_CONFIG
    pub config_file: Option<String>,
    /// Log level from NETPROG_LOG_LEVEL
    pub log_level: Option<LogLevel>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            prometheus_url: get_env("PROMETHEUS_URL"),
            timeout: get_env_parse("TIMEOUT"),
            window: get_env_parse("WINDOW"),
            output_dir: get_env("OUTPUT_DIR"),
            config_file: get_env("CONFIG"),
            log_level: get_env("LOG_LEVEL").and_then(|v| LogLevel::from_str(&v)),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.prometheus_url.is_some()
            || self.timeout.is_some()
            || self.window.is_some()
            || self.output_dir.is_some()
            || self.config_file.is_some()
            || self.log_level.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_PROMETHEUS_URL: {:?}", ENV_PREFIX, self.prometheus_url);
        println!("  {}_TIMEOUT:        {:?}", ENV_PREFIX, self.timeout);
        println!("  {}_WINDOW:         {:?}", ENV_PREFIX, self.window);
        println!("  {}_OUTPUT_DIR:     {:?}", ENV_PREFIX, self.output_dir);
        println!("  {}_CONFIG:         {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_LOG_LEVEL:      {:?}", ENV_PREFIX, self.log_level);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub(crate) struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl EnvGuard {
    /// Set prefixed variables, restoring the previous values on drop
    pub(crate) fn set(vars: &[(&str, &str)]) -> Self {
        let previous = vars
            .iter()
            .map(|(name, value)| {
                let key = format!("{ENV_PREFIX}_{name}");
                let old = env::var(&key).ok();
                env::set_var(&key, value);
                (key, old)
            })
            .collect();

        Self { previous }
    }
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
