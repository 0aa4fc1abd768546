//! プローブ実装
//!
//! 1回分の読み取り専用チェック。失敗（`passed = false`）と
//! 実行不能（`Err(ProbeError)`）を区別して返す。

use crate::error::ProbeError;
use crate::runtime::DockerCli;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// プローブ1回の判定と補足
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// 成功したか
    pub passed: bool,
    /// 補足 ("HTTP 200", "exit code 2" 等)
    pub detail: Option<String>,
}

impl ProbeOutcome {
    /// 成功
    pub fn pass(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            detail: Some(detail.into()),
        }
    }

    /// 失敗
    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: Some(detail.into()),
        }
    }
}

/// 読み取り専用のヘルスチェック
///
/// 実装はシステム状態を変更してはならない。
#[async_trait]
pub trait Probe: Send + Sync {
    /// チェックを1回実行する
    ///
    /// チェック対象が不健全な場合は `Ok(ProbeOutcome { passed: false, .. })`。
    /// チェック手段そのものが使えない場合のみ `Err` を返す。
    async fn check(&self) -> Result<ProbeOutcome, ProbeError>;
}

/// 失敗時の診断情報の取得元
#[async_trait]
pub trait DiagnosticSource: Send + Sync {
    /// 診断情報を取得する（取得できなければNone）
    async fn collect(&self) -> Option<String>;
}

/// HTTP GETで200を期待するプローブ
///
/// 接続拒否・タイムアウトなどの通信失敗は「失敗」として扱い、エラーにはしない。
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    /// 共有クライアントを使ってプローブを作成
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self) -> Result<ProbeOutcome, ProbeError> {
        let response = match self.client.get(&self.url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => return Err(ProbeError::Client(e.to_string())),
            Err(e) => {
                debug!(url = %self.url, error = %e, "HTTP probe request failed");
                let reason = if e.is_timeout() {
                    "timed out"
                } else if e.is_connect() {
                    "connection refused"
                } else {
                    "request failed"
                };
                return Ok(ProbeOutcome::fail(reason));
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            Ok(ProbeOutcome::pass(format!("HTTP {}", status.as_u16())))
        } else {
            Ok(ProbeOutcome::fail(format!("HTTP {}", status.as_u16())))
        }
    }
}

/// タイムアウト時の補足（`HttpProbe` と同じ表記）
const TIMED_OUT: &str = "timed out";

/// コンテナ内でコマンドを実行し、終了コード0を期待するプローブ
///
/// タイムアウトした場合は `docker exec` プロセスを破棄して失敗とする。
#[derive(Debug, Clone)]
pub struct ExecProbe {
    docker: DockerCli,
    container: String,
    command: Vec<String>,
    timeout: Duration,
}

impl ExecProbe {
    /// 新しいプローブを作成
    pub fn new(
        docker: DockerCli,
        container: impl Into<String>,
        command: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            docker,
            container: container.into(),
            command,
            timeout,
        }
    }
}

#[async_trait]
impl Probe for ExecProbe {
    async fn check(&self) -> Result<ProbeOutcome, ProbeError> {
        let exec = self.docker.exec(&self.container, &self.command);
        let output = match tokio::time::timeout(self.timeout, exec).await {
            Ok(output) => output?,
            Err(_) => {
                debug!(container = %self.container, "Exec probe timed out");
                return Ok(ProbeOutcome::fail(TIMED_OUT));
            }
        };

        if output.success() {
            return Ok(ProbeOutcome::pass("exit code 0"));
        }
        let mut detail = match output.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        if let Some(line) = output.output.lines().map(str::trim).find(|l| !l.is_empty()) {
            detail.push_str(": ");
            detail.push_str(line);
        }
        Ok(ProbeOutcome::fail(detail))
    }
}

/// コンテナが稼働中であることを構造化クエリで確認するプローブ
#[derive(Debug, Clone)]
pub struct ContainerProbe {
    docker: DockerCli,
    container: String,
    timeout: Duration,
}

impl ContainerProbe {
    /// 新しいプローブを作成
    pub fn new(docker: DockerCli, container: impl Into<String>, timeout: Duration) -> Self {
        Self {
            docker,
            container: container.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for ContainerProbe {
    async fn check(&self) -> Result<ProbeOutcome, ProbeError> {
        let inspect = self.docker.run_state(&self.container);
        let state = match tokio::time::timeout(self.timeout, inspect).await {
            Ok(state) => state?,
            Err(_) => {
                debug!(container = %self.container, "Container state query timed out");
                return Ok(ProbeOutcome::fail(TIMED_OUT));
            }
        };
        if state.is_running() {
            Ok(ProbeOutcome::pass(state.to_string()))
        } else {
            Ok(ProbeOutcome::fail(state.to_string()))
        }
    }
}

/// コンテナログの末尾を診断情報として取得する
#[derive(Debug, Clone)]
pub struct ContainerLogs {
    docker: DockerCli,
    container: String,
    lines: u32,
    timeout: Duration,
}

impl ContainerLogs {
    /// 新しい取得元を作成
    pub fn new(
        docker: DockerCli,
        container: impl Into<String>,
        lines: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            docker,
            container: container.into(),
            lines,
            timeout,
        }
    }
}

#[async_trait]
impl DiagnosticSource for ContainerLogs {
    async fn collect(&self) -> Option<String> {
        let tail = self.docker.logs_tail(&self.container, self.lines);
        match tokio::time::timeout(self.timeout, tail).await {
            Ok(Ok(logs)) if logs.is_empty() => None,
            Ok(Ok(logs)) => Some(logs),
            Err(_) => Some(format!("(logs unavailable: {})", TIMED_OUT)),
            Ok(Err(e)) => {
                debug!(container = %self.container, error = %e, "Failed to read container logs");
                Some(format!("(logs unavailable: {})", e))
            }
        }
    }
}
