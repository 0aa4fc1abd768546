//! stop サブコマンド
//!
//! 管理対象プロジェクトのサービスを停止します。

use crate::AppContext;
use clap::Args;
use tracing::warn;

/// stop サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct StopArgs {
    /// Seconds to wait for a graceful stop (default: stop_timeout_secs from config, 30)
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

/// stop コマンドを実行
pub async fn execute(args: &StopArgs, ctx: &AppContext) -> Result<(), anyhow::Error> {
    let timeout = args.timeout.unwrap_or(ctx.config.stop_timeout_secs);

    println!("Stopping services...");
    if let Err(e) = ctx.compose.stop(timeout).await {
        if e.is_spawn_failure() {
            return Err(e.into());
        }
        // 強制停止もcomposeプロジェクト内に限定する
        warn!(error = %e, "Graceful stop failed, killing project containers");
        println!("Warning: Graceful stop failed, killing project containers");
        ctx.compose.kill().await?;
    }
    ctx.compose.down(false).await?;

    let still_running = running_containers(ctx).await;
    if !still_running.is_empty() {
        anyhow::bail!(
            "containers still running after stop: {}",
            still_running.join(", ")
        );
    }

    println!("All services stopped");
    Ok(())
}

/// 稼働中の管理対象コンテナ名（状態取得に失敗したものは除く）
pub(crate) async fn running_containers(ctx: &AppContext) -> Vec<String> {
    let mut running = Vec::new();
    for service in &ctx.config.services {
        match ctx.docker.run_state(&service.container).await {
            Ok(state) if state.is_running() => running.push(service.container.clone()),
            Ok(_) => {}
            Err(e) => {
                warn!(container = %service.container, error = %e, "Failed to inspect container");
            }
        }
    }
    running
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runtime::test_utils::write_fake_docker;
    use aixcl_common::StackConfig;
    use serial_test::serial;

    fn context(program: &std::path::Path) -> AppContext {
        AppContext::new(StackConfig {
            docker_bin: program.to_string_lossy().into_owned(),
            ..StackConfig::default()
        })
    }

    #[tokio::test]
    #[serial]
    async fn test_stop_falls_back_to_kill() {
        let dir = tempfile::tempdir().unwrap();
        let calls = dir.path().join("calls");
        let script = format!(
            r#"echo "$@" >> {calls}
case "$*" in
  *" stop "*) echo "stop failed" >&2; exit 1 ;;
  inspect*) echo "Error: No such object: $7" >&2; exit 1 ;;
esac
exit 0
"#,
            calls = calls.display()
        );
        let docker = write_fake_docker(dir.path(), &script);

        execute(&StopArgs { timeout: Some(5) }, &context(&docker))
            .await
            .unwrap();

        let log = std::fs::read_to_string(&calls).unwrap();
        assert!(log.contains("stop -t 5"));
        assert!(log.contains("kill"));
        assert!(log.contains("down --remove-orphans"));
    }

    #[tokio::test]
    #[serial]
    async fn test_graceful_stop_does_not_kill() {
        let dir = tempfile::tempdir().unwrap();
        let calls = dir.path().join("calls");
        let script = format!(
            r#"echo "$@" >> {calls}
case "$1" in
  inspect) echo "Error: No such object: $6" >&2; exit 1 ;;
esac
exit 0
"#,
            calls = calls.display()
        );
        let docker = write_fake_docker(dir.path(), &script);

        execute(&StopArgs::default(), &context(&docker)).await.unwrap();

        let log = std::fs::read_to_string(&calls).unwrap();
        let commands: Vec<&str> = log.lines().collect();
        assert_eq!(commands[0], "compose -f docker-compose.yml stop -t 30");
        assert_eq!(commands[1], "compose -f docker-compose.yml down --remove-orphans");
        assert!(!log.contains("kill"));
        // 残りは停止確認の inspect のみ
        assert!(commands[2..].iter().all(|c| c.starts_with("inspect ")));
    }

    #[tokio::test]
    #[serial]
    async fn test_stop_reports_containers_still_running() {
        let dir = tempfile::tempdir().unwrap();
        let script = r#"case "$1" in
  inspect) echo '{"Status":"running","Running":true,"Paused":false,"Restarting":false,"ExitCode":0}' ;;
esac
exit 0
"#;
        let docker = write_fake_docker(dir.path(), script);

        let result = execute(&StopArgs::default(), &context(&docker)).await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("ollama"));
    }
}
