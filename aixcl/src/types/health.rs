//! ヘルスチェック結果の型定義
//!
//! プローブ1回分の結果と、ポーリング全体の集計結果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// プローブ1回の判定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// チェック成功
    Passed,
    /// チェック失敗（リトライ対象）
    Failed,
    /// チェックを実行できなかった（ラウンドでは失敗として数える）
    Error,
}

impl ProbeStatus {
    /// 表示用の文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Passed => "OK",
            ProbeStatus::Failed => "FAILED",
            ProbeStatus::Error => "ERROR",
        }
    }
}

/// プローブ1回分の結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    /// 判定
    pub status: ProbeStatus,
    /// 判定の補足 ("HTTP 503", "exit code 2" 等)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// 失敗時の診断情報（ログ末尾など）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    /// チェック所要時間（ミリ秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl ProbeResult {
    /// 成功結果を作成
    pub fn passed(detail: Option<String>) -> Self {
        Self {
            status: ProbeStatus::Passed,
            detail,
            diagnostic: None,
            latency_ms: None,
        }
    }

    /// 失敗結果を作成
    pub fn failed(detail: Option<String>) -> Self {
        Self {
            status: ProbeStatus::Failed,
            detail,
            diagnostic: None,
            latency_ms: None,
        }
    }

    /// 実行エラー結果を作成
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Error,
            detail: Some(message.into()),
            diagnostic: None,
            latency_ms: None,
        }
    }

    /// 成功したか
    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Passed
    }
}

/// チェック名 → 結果 の対応（設定順を保持する）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ProbeResults {
    entries: Vec<NamedProbeResult>,
}

/// 名前付きの結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedProbeResult {
    /// チェック名
    pub name: String,
    /// 結果
    #[serde(flatten)]
    pub result: ProbeResult,
}

impl ProbeResults {
    /// 結果を追加（同名があれば置き換える）
    pub fn insert(&mut self, name: impl Into<String>, result: ProbeResult) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.result = result,
            None => self.entries.push(NamedProbeResult { name, result }),
        }
    }

    /// 名前で結果を取得
    pub fn get(&self, name: &str) -> Option<&ProbeResult> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.result)
    }

    /// 名前で結果を可変参照で取得
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ProbeResult> {
        self.entries
            .iter_mut()
            .find(|e| e.name == name)
            .map(|e| &mut e.result)
    }

    /// 設定順に列挙
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProbeResult)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.result))
    }

    /// 成功していないチェック名
    pub fn failing(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.result.is_success())
            .map(|e| e.name.as_str())
            .collect()
    }

    /// 全チェックが成功したか（空の場合はfalse）
    pub fn all_passed(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.result.is_success())
    }

    /// 件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空か
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ProbeResult)> for ProbeResults {
    fn from_iter<I: IntoIterator<Item = (String, ProbeResult)>>(iter: I) -> Self {
        let mut results = ProbeResults::default();
        for (name, result) in iter {
            results.insert(name, result);
        }
        results
    }
}

/// ポーリング方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// 最大ラウンド数（1以上）
    pub max_attempts: u32,
    /// ラウンド間の待機時間
    pub interval: Duration,
}

impl PollPolicy {
    /// 新しいポリシーを作成
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

impl Default for PollPolicy {
    /// `start` の既定値: 30回 × 2秒
    fn default() -> Self {
        Self::new(30, Duration::from_secs(2))
    }
}

/// readinessポーリングの集計結果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessReport {
    /// 全チェックが同一ラウンドで成功したか
    pub overall: bool,
    /// 実行したラウンド数
    pub rounds: u32,
    /// シャットダウン要求で中断したか
    #[serde(default)]
    pub cancelled: bool,
    /// 最終ラウンドの結果
    pub results: ProbeResults,
    /// 判定時刻
    pub checked_at: DateTime<Utc>,
}
