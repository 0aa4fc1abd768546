//! 共通型定義
//!
//! コンテナランタイムから取得する稼働状態の型

use serde::{Deserialize, Serialize};

/// `docker inspect --format '{{json .State}}'` の出力
///
/// 使用するフィールドのみ定義し、その他は無視する。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerState {
    /// ランタイム側の状態文字列 ("running", "exited" 等)
    pub status: String,
    /// 稼働中か
    #[serde(default)]
    pub running: bool,
    /// 一時停止中か
    #[serde(default)]
    pub paused: bool,
    /// 再起動中か
    #[serde(default)]
    pub restarting: bool,
    /// 最後の終了コード
    #[serde(default)]
    pub exit_code: i64,
    /// コンテナ自身のHEALTHCHECK結果（定義されている場合のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<ContainerHealth>,
}

/// コンテナのHEALTHCHECK状態
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerHealth {
    /// "starting" / "healthy" / "unhealthy"
    pub status: String,
    /// 連続失敗回数
    #[serde(default)]
    pub failing_streak: u32,
}

impl std::fmt::Display for ContainerHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.failing_streak > 0 {
            write!(f, "{} ({} failing)", self.status, self.failing_streak)
        } else {
            f.write_str(&self.status)
        }
    }
}

/// 表示用に正規化した稼働状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "detail")]
pub enum RunState {
    /// 稼働中
    Running,
    /// 一時停止中
    Paused,
    /// 再起動ループ中
    Restarting,
    /// 停止済み（終了コード付き）
    Exited(i64),
    /// 作成済みだが未起動
    Created,
    /// コンテナが存在しない
    Missing,
    /// その他のランタイム状態
    Other(String),
}

impl RunState {
    /// 表示用の文字列
    pub fn as_str(&self) -> &str {
        match self {
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Restarting => "restarting",
            RunState::Exited(_) => "exited",
            RunState::Created => "created",
            RunState::Missing => "missing",
            RunState::Other(status) => status.as_str(),
        }
    }

    /// 稼働中か
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

impl From<&ContainerState> for RunState {
    fn from(state: &ContainerState) -> Self {
        // Paused/Restarting のコンテナも Running=true を返すため先に判定する
        if state.paused {
            return RunState::Paused;
        }
        if state.restarting {
            return RunState::Restarting;
        }
        if state.running {
            return RunState::Running;
        }
        match state.status.as_str() {
            "exited" | "dead" => RunState::Exited(state.exit_code),
            "created" => RunState::Created,
            other => RunState::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Exited(code) => write!(f, "exited ({})", code),
            other => f.write_str(other.as_str()),
        }
    }
}
