//! AIXCL 共通ライブラリ
//!
//! CLI本体と共有する設定・型定義

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// 共通型定義
pub mod types;

pub use config::{ConfigError, ProbeConfig, ServiceConfig, StackConfig};
pub use types::{ContainerHealth, ContainerState, RunState};
