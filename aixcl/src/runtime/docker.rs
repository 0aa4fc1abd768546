//! docker CLI ラッパー
//!
//! コンテナ単位の問い合わせ（inspect / exec / logs / stats）と
//! システム全体のリソース解放（prune）を提供する。

use super::{run_captured, run_checked, run_inherited, CommandOutput};
use crate::error::RuntimeError;
use aixcl_common::{ContainerState, RunState};

/// `docker exec` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// 終了コード
    pub code: Option<i32>,
    /// 標準出力と標準エラー出力を連結したもの
    pub output: String,
}

impl ExecOutput {
    /// 終了コード0か
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// システム全体で解放するリソース種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneTarget {
    /// 停止済みコンテナ
    Containers,
    /// 未使用イメージ（タグ付きを含む）
    Images,
    /// 未使用ボリューム
    Volumes,
    /// 未使用ネットワーク
    Networks,
    /// ビルドキャッシュ
    BuildCache,
}

impl PruneTarget {
    /// 実行順
    pub const ALL: [PruneTarget; 5] = [
        PruneTarget::Containers,
        PruneTarget::Images,
        PruneTarget::Volumes,
        PruneTarget::Networks,
        PruneTarget::BuildCache,
    ];

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            PruneTarget::Containers => "stopped containers",
            PruneTarget::Images => "unused images",
            PruneTarget::Volumes => "unused volumes",
            PruneTarget::Networks => "unused networks",
            PruneTarget::BuildCache => "build cache",
        }
    }

    fn args(&self) -> &'static [&'static str] {
        match self {
            PruneTarget::Containers => &["container", "prune", "-f"],
            PruneTarget::Images => &["image", "prune", "-a", "-f"],
            PruneTarget::Volumes => &["volume", "prune", "-f"],
            PruneTarget::Networks => &["network", "prune", "-f"],
            PruneTarget::BuildCache => &["builder", "prune", "-f"],
        }
    }
}

/// prune出力から解放容量を抜き出す
///
/// `docker * prune` は "Total reclaimed space: 1.2GB"、
/// `docker builder prune` は "Total:\t1.2GB" を出力する。
pub fn reclaimed_space(output: &str) -> Option<&str> {
    output.lines().find_map(|line| {
        let line = line.trim();
        line.strip_prefix("Total reclaimed space:")
            .or_else(|| line.strip_prefix("Total:"))
            .map(str::trim)
    })
}

/// docker CLI クライアント
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    /// 使用するdockerバイナリを指定して作成
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// dockerバイナリ
    pub fn program(&self) -> &str {
        &self.program
    }

    /// コンテナの状態を構造化データで取得する
    ///
    /// コンテナが存在しない場合は `Ok(None)`。
    /// デーモンに接続できない等のランタイム障害はエラーとして返す。
    pub async fn inspect_state(
        &self,
        container: &str,
    ) -> Result<Option<ContainerState>, RuntimeError> {
        let args = vec![
            "inspect".to_string(),
            "--type".to_string(),
            "container".to_string(),
            "--format".to_string(),
            "{{json .State}}".to_string(),
            container.to_string(),
        ];
        let output = run_captured(&self.program, &args).await?;

        if !output.success() {
            if output.stderr.contains("No such object") || output.stderr.contains("No such container")
            {
                return Ok(None);
            }
            return Err(RuntimeError::CommandFailed {
                command: format!("{} inspect {}", self.program, container),
                code: output.code,
                stderr: output.stderr.trim_end().to_string(),
            });
        }

        serde_json::from_str(output.stdout.trim())
            .map(Some)
            .map_err(|e| RuntimeError::Parse(format!("container {}: {}", container, e)))
    }

    /// コンテナの稼働状態（存在しない場合は `RunState::Missing`）
    pub async fn run_state(&self, container: &str) -> Result<RunState, RuntimeError> {
        Ok(self
            .inspect_state(container)
            .await?
            .map(|state| RunState::from(&state))
            .unwrap_or(RunState::Missing))
    }

    /// コンテナ内でコマンドを実行する
    ///
    /// 非ゼロ終了はエラーではなく `ExecOutput` として返す。
    pub async fn exec(
        &self,
        container: &str,
        command: &[String],
    ) -> Result<ExecOutput, RuntimeError> {
        let mut args = vec!["exec".to_string(), container.to_string()];
        args.extend(command.iter().cloned());

        let CommandOutput {
            code,
            stdout,
            stderr,
        } = run_captured(&self.program, &args).await?;

        let mut output = stdout;
        if !stderr.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&stderr);
        }
        Ok(ExecOutput { code, output })
    }

    /// コンテナログの末尾を取得する
    pub async fn logs_tail(&self, container: &str, lines: u32) -> Result<String, RuntimeError> {
        let args = vec![
            "logs".to_string(),
            "--tail".to_string(),
            lines.to_string(),
            container.to_string(),
        ];
        let output = run_checked(&self.program, &args).await?;

        // コンテナのstderrはdocker logsのstderrに出力される
        let mut combined = output.stdout;
        combined.push_str(&output.stderr);
        Ok(combined.trim_end().to_string())
    }

    /// リソース使用状況を一度だけ表示する
    pub async fn stats(&self, containers: &[&str]) -> Result<(), RuntimeError> {
        let mut args = vec!["stats".to_string(), "--no-stream".to_string()];
        args.extend(containers.iter().map(|c| c.to_string()));
        run_inherited(&self.program, &args).await
    }

    /// 指定種別のリソースを解放する
    pub async fn prune(&self, target: PruneTarget) -> Result<CommandOutput, RuntimeError> {
        let args: Vec<String> = target.args().iter().map(|a| a.to_string()).collect();
        run_checked(&self.program, &args).await
    }

    /// ディスク使用量の概要を表示する
    pub async fn system_df(&self) -> Result<(), RuntimeError> {
        run_inherited(&self.program, &["system".to_string(), "df".to_string()]).await
    }
}
