//! status subcommand
//!
//! Displays container states and the result of a single health check round.

use crate::health::report::{render_containers, render_results, ContainerRow};
use crate::health::ReadinessProber;
use crate::types::ProbeResults;
use crate::AppContext;
use aixcl_common::RunState;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

/// Arguments for the status subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// JSON output of the status subcommand
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Run state of every managed container
    pub containers: Vec<ContainerRow>,
    /// Health check results in configured order
    pub health: ProbeResults,
    /// When the checks ran
    pub checked_at: DateTime<Utc>,
}

/// Collect container states and run every health check once
pub async fn collect(ctx: &AppContext) -> Result<StatusReport, anyhow::Error> {
    let mut containers = Vec::with_capacity(ctx.config.services.len());
    for service in &ctx.config.services {
        let inspected = ctx.docker.inspect_state(&service.container).await?;
        containers.push(ContainerRow {
            service: service.name.clone(),
            container: service.container.clone(),
            state: inspected
                .as_ref()
                .map(RunState::from)
                .unwrap_or(RunState::Missing),
            health: inspected
                .and_then(|state| state.health)
                .map(|health| health.to_string()),
        });
    }

    let checks = ctx.health_checks();
    let health = if checks.is_empty() {
        ProbeResults::default()
    } else {
        ReadinessProber::new().check_once(&checks).await?
    };

    Ok(StatusReport {
        containers,
        health,
        checked_at: Utc::now(),
    })
}

/// Execute the status command
///
/// Unhealthy services are reported, not treated as errors.
pub async fn execute(args: &StatusArgs, ctx: &AppContext) -> Result<(), anyhow::Error> {
    let report = collect(ctx).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render_containers(&report.containers));
    if !report.health.is_empty() {
        println!();
        println!("Health checks:");
        print!("{}", render_results(&report.health));
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runtime::test_utils::write_fake_docker;
    use crate::types::ProbeStatus;
    use aixcl_common::{ProbeConfig, ServiceConfig, StackConfig};
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_collect_reports_states_and_health() {
        let dir = tempfile::tempdir().unwrap();
        let script = r#"case "$1" in
  inspect)
    case "$6" in
      postgres) echo '{"Status":"running","Running":true,"Paused":false,"Restarting":false,"ExitCode":0,"Health":{"Status":"healthy","FailingStreak":0}}' ;;
      *) echo "Error: No such object: $6" >&2; exit 1 ;;
    esac ;;
  exec) echo "/var/run/postgresql:5432 - accepting connections" ;;
  logs) echo "database system is ready to accept connections" ;;
esac
exit 0
"#;
        let docker = write_fake_docker(dir.path(), script);
        let ctx = AppContext::new(StackConfig {
            docker_bin: docker.to_string_lossy().into_owned(),
            services: vec![
                ServiceConfig {
                    name: "database".to_string(),
                    container: "postgres".to_string(),
                    probe: Some(ProbeConfig::Exec {
                        command: vec!["pg_isready".to_string()],
                        timeout_secs: 5,
                    }),
                },
                ServiceConfig {
                    name: "auto-updater".to_string(),
                    container: "watchtower".to_string(),
                    probe: None,
                },
            ],
            ..StackConfig::default()
        });

        let report = collect(&ctx).await.unwrap();

        assert_eq!(report.containers.len(), 2);
        assert_eq!(report.containers[0].state, RunState::Running);
        assert_eq!(report.containers[0].health.as_deref(), Some("healthy"));
        assert_eq!(report.containers[1].state, RunState::Missing);
        assert_eq!(report.containers[1].health, None);

        let db = report.health.get("database").unwrap();
        assert_eq!(db.status, ProbeStatus::Passed);
        // check_once attaches diagnostics to passing checks too
        assert!(db.diagnostic.is_some());
    }

    #[tokio::test]
    #[serial]
    async fn test_collect_fails_when_docker_missing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::new(StackConfig {
            docker_bin: dir.path().join("no-docker").to_string_lossy().into_owned(),
            ..StackConfig::default()
        });

        assert!(collect(&ctx).await.is_err());
    }
}
