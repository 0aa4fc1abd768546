//! 型定義モジュール
//!
//! ヘルスチェック結果の型定義を提供

/// ヘルスチェック関連の型定義
pub mod health;

pub use health::{
    NamedProbeResult, PollPolicy, ProbeResult, ProbeResults, ProbeStatus, ReadinessReport,
};
