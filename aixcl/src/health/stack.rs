//! 管理スタック用ヘルスチェックの構築
//!
//! `StackConfig` のサービス定義からプローブを組み立てる。

use super::probe::{ContainerLogs, ContainerProbe, ExecProbe, HttpProbe};
use super::prober::HealthCheck;
use crate::runtime::DockerCli;
use aixcl_common::{ProbeConfig, StackConfig};
use reqwest::Client;
use std::sync::Arc;

/// 設定からヘルスチェック一覧を作成する（プローブ未定義のサービスは除外）
pub fn build_health_checks(
    config: &StackConfig,
    docker: &DockerCli,
    client: &Client,
) -> Vec<HealthCheck> {
    config
        .probed_services()
        .filter_map(|service| {
            let probe = service.probe.as_ref()?;
            let timeout = probe.timeout();
            let check = match probe {
                ProbeConfig::Http { url, .. } => HealthCheck::new(
                    service.name.clone(),
                    Arc::new(HttpProbe::new(client.clone(), url.clone(), timeout)),
                ),
                ProbeConfig::Exec { command, .. } => HealthCheck::new(
                    service.name.clone(),
                    Arc::new(ExecProbe::new(
                        docker.clone(),
                        service.container.clone(),
                        command.clone(),
                        timeout,
                    )),
                ),
                ProbeConfig::Running { .. } => HealthCheck::new(
                    service.name.clone(),
                    Arc::new(ContainerProbe::new(
                        docker.clone(),
                        service.container.clone(),
                        timeout,
                    )),
                ),
            };
            // 診断用のログ取得にもプローブと同じ上限を適用する
            Some(check.with_diagnostics(Arc::new(ContainerLogs::new(
                docker.clone(),
                service.container.clone(),
                config.log_tail_lines,
                timeout,
            ))))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aixcl_common::ServiceConfig;

    #[test]
    fn test_default_stack_checks() {
        let config = StackConfig::default();
        let checks = build_health_checks(&config, &DockerCli::default(), &Client::new());

        let names: Vec<&str> = checks.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["model-server", "web-ui", "database"]);
    }

    #[test]
    fn test_services_without_probe_are_skipped() {
        let config = StackConfig {
            services: vec![ServiceConfig {
                name: "auto-updater".to_string(),
                container: "watchtower".to_string(),
                probe: None,
            }],
            ..StackConfig::default()
        };
        let checks = build_health_checks(&config, &DockerCli::default(), &Client::new());
        assert!(checks.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial_test::serial]
    async fn test_hung_docker_does_not_block_polling() {
        use crate::health::ReadinessProber;
        use crate::runtime::test_utils::write_fake_docker;
        use crate::types::{PollPolicy, ProbeStatus};
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let bin = write_fake_docker(dir.path(), "sleep 30");
        let config = StackConfig {
            services: vec![ServiceConfig {
                name: "database".to_string(),
                container: "postgres".to_string(),
                probe: Some(ProbeConfig::Exec {
                    command: vec!["pg_isready".to_string()],
                    timeout_secs: 1,
                }),
            }],
            ..StackConfig::default()
        };
        let checks = build_health_checks(
            &config,
            &DockerCli::new(bin.to_string_lossy()),
            &Client::new(),
        );

        let report = tokio::time::timeout(
            Duration::from_secs(5),
            ReadinessProber::new().poll_until_ready(&checks, PollPolicy::new(1, Duration::ZERO)),
        )
        .await
        .expect("polling must finish within the probe timeouts")
        .unwrap();

        assert!(!report.overall);
        let result = report.results.get("database").unwrap();
        assert_eq!(result.status, ProbeStatus::Failed);
        assert_eq!(result.detail.as_deref(), Some("timed out"));
        assert_eq!(
            result.diagnostic.as_deref(),
            Some("(logs unavailable: timed out)")
        );
    }
}
