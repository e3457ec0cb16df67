//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Network programming latency measurement for cluster load tests
#[derive(Parser, Debug)]
#[command(name = "netprog-latency")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Gather kube-proxy network programming latency from Prometheus")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Gather the network programming latency summary
    Gather(GatherArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for gather command
#[derive(Parser, Debug, Default)]
pub struct GatherArgs {
    /// Prometheus server URL
    #[arg(short, long)]
    pub prometheus_url: Option<String>,

    /// Evaluation time (RFC 3339), defaults to now
    #[arg(short, long)]
    pub time: Option<DateTime<Utc>>,

    /// Query lookback window in seconds
    #[arg(short, long)]
    pub window: Option<u64>,

    /// Directory to write the summary to
    #[arg(short, long)]
    pub output: Option<String>,

    /// Timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create an example configuration file
    Init {
        /// Output file path
        #[arg(short, long, default_value = "./netprog-latency.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variables instead
        #[arg(short, long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file (defaults to the first one found)
        #[arg(short, long)]
        file: Option<String>,
    },
}
