//! ヘルスチェック
//!
//! 管理対象サービスのreadiness判定
//!
//! `start` は `ReadinessProber::poll_until_ready` で全サービスの起動完了を待ち、
//! `status` は `ReadinessProber::check_once` で1回だけ状態を確認する。
//! プローブの集合は設定から注入され、prober自体は任意の名前付きプローブに対して動作する。

pub mod probe;
pub mod prober;
pub mod report;
pub mod stack;

pub use probe::{
    ContainerLogs, ContainerProbe, DiagnosticSource, ExecProbe, HttpProbe, Probe, ProbeOutcome,
};
pub use prober::{HealthCheck, ReadinessProber};
pub use stack::build_health_checks;
