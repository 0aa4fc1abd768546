//! docker compose ラッパー
//!
//! 管理対象プロジェクトに限定した操作のみを提供する。

use super::{run_checked, run_inherited};
use crate::error::RuntimeError;
use std::path::{Path, PathBuf};

/// `docker compose` クライアント
#[derive(Debug, Clone)]
pub struct Compose {
    program: String,
    compose_file: PathBuf,
    project_name: Option<String>,
}

/// `compose logs` のオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogsOptions {
    /// 対象サービス（未指定時は全サービス）
    pub service: Option<String>,
    /// 末尾から表示する行数
    pub tail: Option<u32>,
    /// 追従表示するか
    pub follow: bool,
}

impl Compose {
    /// 新しいクライアントを作成
    pub fn new(
        program: impl Into<String>,
        compose_file: impl Into<PathBuf>,
        project_name: Option<String>,
    ) -> Self {
        Self {
            program: program.into(),
            compose_file: compose_file.into(),
            project_name,
        }
    }

    /// composeファイルのパス
    pub fn compose_file(&self) -> &Path {
        &self.compose_file
    }

    fn args(&self, subcommand: &[&str]) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "-f".to_string(),
            self.compose_file.to_string_lossy().into_owned(),
        ];
        if let Some(project) = &self.project_name {
            args.push("-p".to_string());
            args.push(project.clone());
        }
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args
    }

    /// サービスをバックグラウンドで起動
    pub async fn up_detached(&self) -> Result<(), RuntimeError> {
        run_inherited(&self.program, &self.args(&["up", "-d"])).await
    }

    /// サービスをgracefulに停止
    pub async fn stop(&self, timeout_secs: u64) -> Result<(), RuntimeError> {
        let timeout = timeout_secs.to_string();
        run_checked(&self.program, &self.args(&["stop", "-t", timeout.as_str()]))
            .await
            .map(|_| ())
    }

    /// プロジェクト内のコンテナを強制停止
    pub async fn kill(&self) -> Result<(), RuntimeError> {
        run_checked(&self.program, &self.args(&["kill"]))
            .await
            .map(|_| ())
    }

    /// コンテナとネットワークを削除（`volumes` 指定時はボリュームも）
    pub async fn down(&self, volumes: bool) -> Result<(), RuntimeError> {
        let mut sub = vec!["down", "--remove-orphans"];
        if volumes {
            sub.push("--volumes");
        }
        run_checked(&self.program, &self.args(&sub))
            .await
            .map(|_| ())
    }

    /// ログを表示
    pub async fn logs(&self, options: &LogsOptions) -> Result<(), RuntimeError> {
        run_inherited(&self.program, &self.logs_args(options)).await
    }

    fn logs_args(&self, options: &LogsOptions) -> Vec<String> {
        let tail = options.tail.map(|n| n.to_string());
        let mut sub = vec!["logs"];
        if let Some(tail) = tail.as_deref() {
            sub.push("--tail");
            sub.push(tail);
        }
        if options.follow {
            sub.push("--follow");
        }
        if let Some(service) = options.service.as_deref() {
            sub.push(service);
        }
        self.args(&sub)
    }
}
