//! AIXCL stack manager
//!
//! ローカルLLMスタック（docker compose）の起動・停止と、
//! 全サービスの起動完了を待つreadiness判定を提供する。

#![warn(missing_docs)]

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型
pub mod error;

/// ヘルスチェック（readiness判定）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// dockerコマンドラッパー
pub mod runtime;

/// 中断要求（Ctrl-C）の伝搬
pub mod shutdown;

/// 型定義
pub mod types;

use aixcl_common::StackConfig;
use health::HealthCheck;
use runtime::{Compose, DockerCli};

/// サブコマンド間で共有するクライアント一式
#[derive(Debug, Clone)]
pub struct AppContext {
    /// スタック設定
    pub config: StackConfig,
    /// dockerクライアント
    pub docker: DockerCli,
    /// docker composeクライアント
    pub compose: Compose,
    /// HTTPプローブ用クライアント
    pub http_client: reqwest::Client,
}

impl AppContext {
    /// 設定からコンテキストを作成
    pub fn new(config: StackConfig) -> Self {
        let docker = DockerCli::new(config.docker_bin.clone());
        let compose = Compose::new(
            config.docker_bin.clone(),
            config.compose_file.clone(),
            config.project_name.clone(),
        );
        Self {
            config,
            docker,
            compose,
            http_client: reqwest::Client::new(),
        }
    }

    /// 設定ファイル（任意）と環境変数からコンテキストを作成
    pub fn load(config_path: Option<std::path::PathBuf>) -> Result<Self, anyhow::Error> {
        let config = config::load_stack_config(config_path)?;
        Ok(Self::new(config))
    }

    /// 設定済みサービスのヘルスチェック一覧
    pub fn health_checks(&self) -> Vec<HealthCheck> {
        health::build_health_checks(&self.config, &self.docker, &self.http_client)
    }
}
