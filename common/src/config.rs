//! 設定管理
//!
//! StackConfig, ServiceConfig等の設定構造体

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定読み込みエラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 設定ファイルの読み込みに失敗
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// 設定ファイルのパス
        path: PathBuf,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// YAMLのパースに失敗
    #[error("Invalid config file {path}: {source}")]
    Parse {
        /// 設定ファイルのパス
        path: PathBuf,
        /// 元のパースエラー
        #[source]
        source: serde_yaml::Error,
    },

    /// 値の検証に失敗
    #[error("Validation error: {0}")]
    Validation(String),
}

/// スタック全体の設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StackConfig {
    /// docker-composeファイルのパス (デフォルト: "docker-compose.yml")
    #[serde(default = "default_compose_file")]
    pub compose_file: PathBuf,

    /// composeプロジェクト名 (未指定時はcomposeのデフォルト)
    #[serde(default)]
    pub project_name: Option<String>,

    /// dockerバイナリ (デフォルト: "docker")
    #[serde(default = "default_docker_bin")]
    pub docker_bin: String,

    /// 診断用に取得するログ行数 (デフォルト: 10)
    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: u32,

    /// 起動待ちの最大試行回数 (デフォルト: 30)
    #[serde(default = "default_startup_attempts")]
    pub startup_attempts: u32,

    /// 起動待ちのポーリング間隔（秒）(デフォルト: 2)
    #[serde(default = "default_startup_interval")]
    pub startup_interval_secs: u64,

    /// graceful stopのタイムアウト（秒）(デフォルト: 30)
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout_secs: u64,

    /// 管理対象サービス（設定順に表示・チェックされる）
    #[serde(default = "default_services")]
    pub services: Vec<ServiceConfig>,
}

/// 管理対象サービス1件の設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// レポート用の名前 (例: "model-server")
    pub name: String,
    /// コンテナ名 (例: "ollama")
    pub container: String,
    /// ヘルスチェック定義。`None`の場合は稼働状態のみ表示
    #[serde(default)]
    pub probe: Option<ProbeConfig>,
}

/// ヘルスチェック方式
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProbeConfig {
    /// HTTP GETで200を期待する
    Http {
        /// チェック対象URL
        url: String,
        /// リクエストタイムアウト（秒）
        #[serde(default = "default_probe_timeout")]
        timeout_secs: u64,
    },
    /// コンテナ内でコマンドを実行し終了コード0を期待する
    Exec {
        /// 実行するコマンドと引数
        command: Vec<String>,
        /// コマンドのタイムアウト（秒）
        #[serde(default = "default_probe_timeout")]
        timeout_secs: u64,
    },
    /// コンテナが稼働中であることのみ確認する
    Running {
        /// `docker inspect` のタイムアウト（秒）
        #[serde(default = "default_probe_timeout")]
        timeout_secs: u64,
    },
}

impl ProbeConfig {
    /// チェック1回あたりのタイムアウト
    pub fn timeout(&self) -> Duration {
        let secs = match self {
            ProbeConfig::Http { timeout_secs, .. }
            | ProbeConfig::Exec { timeout_secs, .. }
            | ProbeConfig::Running { timeout_secs } => *timeout_secs,
        };
        Duration::from_secs(secs)
    }
}

fn default_compose_file() -> PathBuf {
    PathBuf::from("docker-compose.yml")
}

fn default_docker_bin() -> String {
    "docker".to_string()
}

fn default_log_tail_lines() -> u32 {
    10
}

fn default_startup_attempts() -> u32 {
    30
}

fn default_startup_interval() -> u64 {
    2
}

fn default_stop_timeout() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            name: "model-server".to_string(),
            container: "ollama".to_string(),
            probe: Some(ProbeConfig::Http {
                url: "http://localhost:11434/api/version".to_string(),
                timeout_secs: default_probe_timeout(),
            }),
        },
        ServiceConfig {
            name: "web-ui".to_string(),
            container: "open-webui".to_string(),
            probe: Some(ProbeConfig::Http {
                url: "http://localhost:8080".to_string(),
                timeout_secs: default_probe_timeout(),
            }),
        },
        ServiceConfig {
            name: "database".to_string(),
            container: "postgres".to_string(),
            probe: Some(ProbeConfig::Exec {
                command: vec![
                    "pg_isready".to_string(),
                    "-U".to_string(),
                    "webui".to_string(),
                ],
                timeout_secs: default_probe_timeout(),
            }),
        },
        ServiceConfig {
            name: "db-admin".to_string(),
            container: "pgadmin".to_string(),
            probe: None,
        },
        ServiceConfig {
            name: "auto-updater".to_string(),
            container: "watchtower".to_string(),
            probe: None,
        },
    ]
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            compose_file: default_compose_file(),
            project_name: None,
            docker_bin: default_docker_bin(),
            log_tail_lines: default_log_tail_lines(),
            startup_attempts: default_startup_attempts(),
            startup_interval_secs: default_startup_interval(),
            stop_timeout_secs: default_stop_timeout(),
            services: default_services(),
        }
    }
}

impl StackConfig {
    /// YAMLファイルから読み込む（未指定フィールドはデフォルト値）
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: StackConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 設定値の整合性を検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.startup_attempts == 0 {
            return Err(ConfigError::Validation(
                "startup_attempts must be at least 1".to_string(),
            ));
        }
        if self.services.is_empty() {
            return Err(ConfigError::Validation(
                "at least one service must be configured".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for service in &self.services {
            if !seen.insert(service.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate service name: {}",
                    service.name
                )));
            }
            let Some(probe) = &service.probe else {
                continue;
            };
            if let ProbeConfig::Exec { command, .. } = probe {
                if command.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "exec probe for {} has an empty command",
                        service.name
                    )));
                }
            }
            if probe.timeout().is_zero() {
                return Err(ConfigError::Validation(format!(
                    "probe timeout for {} must be at least 1 second",
                    service.name
                )));
            }
        }
        Ok(())
    }

    /// ヘルスチェック定義を持つサービスのみ返す
    pub fn probed_services(&self) -> impl Iterator<Item = &ServiceConfig> {
        self.services.iter().filter(|s| s.probe.is_some())
    }
}
