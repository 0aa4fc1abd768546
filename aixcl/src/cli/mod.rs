//! CLI module for aixcl
//!
//! Provides command-line interface for managing the local LLM stack.

pub mod clean;
pub mod cleanup;
pub mod logs;
pub mod restart;
pub mod start;
pub mod stats;
pub mod status;
pub mod stop;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AIXCL - Manage the local LLM stack (model server, web UI, database)
#[derive(Parser, Debug)]
#[command(name = "aixcl")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    AIXCL_CONFIG            Stack config file (YAML)
    AIXCL_COMPOSE_FILE      Compose file (fallback: COMPOSE_FILE, default: docker-compose.yml)
    AIXCL_PROJECT_NAME      Compose project name (fallback: COMPOSE_PROJECT_NAME)
    AIXCL_DOCKER_BIN        Docker binary (default: docker)
    AIXCL_STARTUP_ATTEMPTS  Readiness rounds for start (default: 30)
    AIXCL_STARTUP_INTERVAL  Seconds between readiness rounds (default: 2)
    AIXCL_STOP_TIMEOUT      Graceful stop timeout in seconds (default: 30)
    AIXCL_LOG_LEVEL         Log level (fallback: RUST_LOG, default: warn)
"#)]
pub struct Cli {
    /// Stack config file (YAML)
    #[arg(short, long, global = true, env = "AIXCL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start all services and wait until they are ready
    Start(start::StartArgs),
    /// Stop all services
    Stop(stop::StopArgs),
    /// Stop, then start all services
    Restart(restart::RestartArgs),
    /// Show service logs
    Logs(logs::LogsArgs),
    /// Remove the stack's containers, networks and volumes
    Clean(clean::CleanArgs),
    /// Reclaim unused Docker resources host-wide
    Cleanup,
    /// Show resource usage of running services
    Stats,
    /// Show container states and service health
    Status(status::StatusArgs),
}
