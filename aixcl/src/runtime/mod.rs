//! コンテナランタイム呼び出し
//!
//! `docker` / `docker compose` をサブプロセスとして実行する薄いラッパー。
//! 稼働状態の取得は `docker inspect` のJSON出力を使い、表形式テキストは解析しない。

pub mod compose;
pub mod docker;

pub use compose::{Compose, LogsOptions};
pub use docker::{DockerCli, ExecOutput, PruneTarget};

use crate::error::RuntimeError;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// キャプチャしたコマンド出力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// 終了コード（シグナル終了時はNone）
    pub code: Option<i32>,
    /// 標準出力
    pub stdout: String,
    /// 標準エラー出力
    pub stderr: String,
}

impl CommandOutput {
    /// 終了コード0か
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// コマンドを実行して出力をキャプチャする（終了コードは検査しない）
pub(crate) async fn run_captured(
    program: &str,
    args: &[String],
) -> Result<CommandOutput, RuntimeError> {
    debug!(command = %command_line(program, args), "Running command");

    // 呼び出し側がタイムアウトで打ち切った場合に子プロセスを残さない
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| RuntimeError::Spawn {
            program: program.to_string(),
            source,
        })?;

    Ok(CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// コマンドを実行し、非ゼロ終了を `CommandFailed` に変換する
pub(crate) async fn run_checked(
    program: &str,
    args: &[String],
) -> Result<CommandOutput, RuntimeError> {
    let output = run_captured(program, args).await?;
    if output.success() {
        Ok(output)
    } else {
        Err(RuntimeError::CommandFailed {
            command: command_line(program, args),
            code: output.code,
            stderr: output.stderr.trim_end().to_string(),
        })
    }
}

/// 標準入出力を引き継いでコマンドを実行する（`logs -f` や `stats` 用）
pub(crate) async fn run_inherited(program: &str, args: &[String]) -> Result<(), RuntimeError> {
    debug!(command = %command_line(program, args), "Running command (inherited stdio)");

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|source| RuntimeError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(RuntimeError::CommandFailed {
            command: command_line(program, args),
            code: status.code(),
            stderr: String::new(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_formatting() {
        let args = vec!["compose".to_string(), "up".to_string(), "-d".to_string()];
        assert_eq!(command_line("docker", &args), "docker compose up -d");
    }

    #[tokio::test]
    async fn test_run_captured_missing_program_is_spawn_error() {
        let result = run_captured("/nonexistent/aixcl-test-docker", &[]).await;
        assert!(matches!(result, Err(RuntimeError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_checked_reports_failure() {
        let args = vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()];
        let err = run_checked("sh", &args).await.unwrap_err();
        match err {
            RuntimeError::CommandFailed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captured_collects_stdout() {
        let args = vec!["-c".to_string(), "echo hello".to_string()];
        let output = run_captured("sh", &args).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }
}
