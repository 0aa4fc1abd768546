//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! ヘルスチェックの失敗（`ProbeStatus::Failed`）はエラーではなく結果として扱う。
//! ここで定義するのは「チェック自体を実行できなかった」場合のエラーのみ。

use thiserror::Error;

/// コンテナランタイム（docker / docker compose）呼び出しのエラー
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// コマンドを起動できなかった（バイナリ不在など）
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        /// 実行しようとしたプログラム
        program: String,
        /// 元のI/Oエラー
        #[source]
        source: std::io::Error,
    },

    /// コマンドが非ゼロで終了した
    #[error("`{command}` exited with status {code:?}: {stderr}")]
    CommandFailed {
        /// 実行したコマンドライン
        command: String,
        /// 終了コード（シグナル終了時はNone）
        code: Option<i32>,
        /// 標準エラー出力（末尾の空白を除去済み）
        stderr: String,
    },

    /// 出力の解析に失敗した
    #[error("Failed to parse runtime output: {0}")]
    Parse(String),
}

impl RuntimeError {
    /// 起動失敗（ツール不在など）かどうか
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, RuntimeError::Spawn { .. })
    }
}

/// プローブ実行エラー
///
/// ヘルスチェックが「失敗した」のではなく「実行できなかった」ことを表す。
#[derive(Debug, Error)]
pub enum ProbeError {
    /// チェックに必要なツールを実行できなかった
    #[error("Probe execution error: {0}")]
    Execution(String),

    /// チェック対象からの応答を解釈できなかった
    #[error("Invalid probe response: {0}")]
    InvalidResponse(String),

    /// HTTPクライアントの初期化に失敗した
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<RuntimeError> for ProbeError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Parse(msg) => ProbeError::InvalidResponse(msg),
            other => ProbeError::Execution(other.to_string()),
        }
    }
}

/// Readiness prober の入力エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProberError {
    /// チェック一覧やポリシーが不正
    #[error("Invalid prober input: {0}")]
    InvalidInput(String),
}
