//! netprog-latency - Network Programming Latency Measurement
//!
//! A CLI tool that gathers the kube-proxy network programming latency
//! quantiles from Prometheus at the end of a cluster load test and emits
//! them as a perf-dash summary.
//!
//! ## Usage
//!
//! ```bash
//! # Gather at the current time and print the summary
//! netprog-latency gather --prometheus-url http://prometheus:9090
//!
//! # Gather at a given time over a one hour window and save the summary
//! netprog-latency gather --time 2024-01-02T03:04:05Z --window 3600 --output ./results
//!
//! # Create and inspect configuration
//! netprog-latency config init
//! netprog-latency config show
//! ```

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod measurement;
mod prometheus;
mod results;
mod utils;

use cli::{Args, GatherArgs};
use config::{AppConfig, ConfigFile, EnvConfig};
use measurement::netprog::NETPROG_MEASUREMENT;
use measurement::NetProgGatherer;
use prometheus::PrometheusClient;
use results::SummaryWriter;
use utils::logger::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        cli::Command::Gather(gather_args) => {
            run_gather(gather_args, args.verbose).await?;
        }
        cli::Command::Config(config_args) => {
            init_logger(if args.verbose { LogLevel::Debug } else { LogLevel::Info });
            manage_config(config_args)?;
        }
    }

    Ok(())
}

async fn run_gather(args: GatherArgs, verbose: bool) -> Result<()> {
    let config = resolve_config(&args, &EnvConfig::load())?;
    init_logger(if verbose { LogLevel::Debug } else { config.log_level });

    let client = PrometheusClient::new(&config.prometheus_url, config.timeout_secs)?;
    let gatherer = NetProgGatherer::new(config.query_window());
    let time = args.time.unwrap_or_else(Utc::now);

    info!(
        "Gathering {} from {} ({}s window)",
        NETPROG_MEASUREMENT,
        client.base_url(),
        config.query_window_secs
    );

    let summary = gatherer.gather(&client, time).await?;
    println!("{}", summary.content());

    if let Some(dir) = &config.output_dir {
        SummaryWriter::new(dir).write(&summary)?;
    }

    Ok(())
}

/// Resolve configuration: file, then environment, then command-line flags
fn resolve_config(args: &GatherArgs, env: &EnvConfig) -> Result<AppConfig> {
    let file = read_config_file(args.config.as_ref().or(env.config_file.as_ref()))?;
    file.validate_version()?;

    let mut config = file.app;
    config.apply_env(env);

    if let Some(url) = &args.prometheus_url {
        config.prometheus_url = url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(window) = args.window {
        config.query_window_secs = window;
    }
    if let Some(output) = &args.output {
        config.output_dir = Some(output.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Read the given or default config file; values are validated after layering
fn read_config_file(path: Option<&String>) -> Result<ConfigFile> {
    match path {
        Some(path) => ConfigFile::parse(path),
        None => ConfigFile::parse_default(),
    }
}

/// Config file as `gather` would see it before command-line flags
fn effective_config_file(env: &EnvConfig) -> Result<ConfigFile> {
    let mut config = read_config_file(env.config_file.as_ref())?;
    config.app.apply_env(env);
    Ok(config)
}

fn manage_config(args: cli::ConfigArgs) -> Result<()> {
    use std::path::Path;

    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            ConfigFile::example().save(path)?;
            println!("✓ Configuration file created: {output}");
        }

        cli::ConfigAction::Show { env, format } => {
            let env_config = EnvConfig::load();
            if env {
                if env_config.has_any() {
                    env_config.print_summary();
                } else {
                    println!("No NETPROG_* environment variables are set");
                }
            } else {
                let config = effective_config_file(&env_config)?;
                let output = if format == "json" {
                    serde_json::to_string_pretty(&config)?
                } else {
                    serde_yaml::to_string(&config)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file.unwrap_or_else(|| {
                ConfigFile::find()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|| "./netprog-latency.yaml".to_string())
            });

            match ConfigFile::load(&path) {
                Ok(_) => {
                    println!("✓ Configuration file is valid: {path}");
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_config_precedence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "app:\n  prometheus_url: http://file:9090\n  timeout_secs: 10\n  query_window_secs: 120\n",
        )
        .unwrap();

        let env = EnvConfig {
            timeout: Some(20),
            window: Some(240),
            ..Default::default()
        };
        let args = GatherArgs {
            window: Some(480),
            config: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };

        let config = resolve_config(&args, &env).unwrap();
        assert_eq!(config.prometheus_url, "http://file:9090");
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.query_window_secs, 480);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_resolve_config_flags_override_invalid_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "app:\n  prometheus_url: \"\"\n  timeout_secs: 0\n").unwrap();

        let args = GatherArgs {
            prometheus_url: Some("http://prom:9090".to_string()),
            timeout: Some(5),
            config: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };

        let config = resolve_config(&args, &EnvConfig::default()).unwrap();
        assert_eq!(config.prometheus_url, "http://prom:9090");
        assert_eq!(config.timeout_secs, 5);

        let without_flags = GatherArgs {
            config: args.config.clone(),
            ..Default::default()
        };
        assert!(resolve_config(&without_flags, &EnvConfig::default()).is_err());
    }

    #[test]
    fn test_resolve_config_env_overrides_invalid_file_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "app:\n  query_window_secs: 0\n").unwrap();

        let env = EnvConfig {
            window: Some(900),
            config_file: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };

        let config = resolve_config(&GatherArgs::default(), &env).unwrap();
        assert_eq!(config.query_window_secs, 900);
    }

    #[test]
    fn test_effective_config_file_uses_env_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"app": {"prometheus_url": "http://from-env-file:9090", "timeout_secs": 7}}"#,
        )
        .unwrap();

        let env = EnvConfig {
            config_file: Some(path.to_string_lossy().to_string()),
            timeout: Some(12),
            ..Default::default()
        };

        let config = effective_config_file(&env).unwrap();
        assert_eq!(config.app.prometheus_url, "http://from-env-file:9090");
        assert_eq!(config.app.timeout_secs, 12);
    }

    #[test]
    fn test_resolve_config_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "version: \"2.0\"\n").unwrap();

        let args = GatherArgs {
            config: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };
        assert!(resolve_config(&args, &EnvConfig::default()).is_err());
    }

    #[test]
    fn test_resolve_config_rejects_invalid_flags() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "version: \"1.0\"\n").unwrap();

        let args = GatherArgs {
            window: Some(0),
            config: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        };
        assert!(resolve_config(&args, &EnvConfig::default()).is_err());
    }
}
