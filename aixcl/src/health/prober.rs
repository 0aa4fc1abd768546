//! Readiness prober
//!
//! 名前付きプローブの集合を、固定間隔・回数上限つきで全件成功するまで評価する。
//!
//! - 1ラウンド = 全チェックを1回ずつ評価（並行実行、全件の完了を待ってから判定）
//! - 全チェックが同一ラウンドで成功した時点で終了
//! - 上限に達した場合は `overall = false` のレポートを返す（エラーではない）

use super::probe::{DiagnosticSource, Probe};
use crate::error::ProberError;
use crate::shutdown::ShutdownController;
use crate::types::health::{PollPolicy, ProbeResult, ProbeResults, ReadinessReport};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 名前付きヘルスチェック
#[derive(Clone)]
pub struct HealthCheck {
    name: String,
    probe: Arc<dyn Probe>,
    diagnostics: Option<Arc<dyn DiagnosticSource>>,
}

impl HealthCheck {
    /// 新しいチェックを作成
    pub fn new(name: impl Into<String>, probe: Arc<dyn Probe>) -> Self {
        Self {
            name: name.into(),
            probe,
            diagnostics: None,
        }
    }

    /// 失敗時の診断情報取得元を設定
    pub fn with_diagnostics(mut self, source: Arc<dyn DiagnosticSource>) -> Self {
        self.diagnostics = Some(source);
        self
    }

    /// チェック名
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self) -> ProbeResult {
        let start = Instant::now();
        let outcome = self.probe.check().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let mut result = match outcome {
            Ok(outcome) if outcome.passed => ProbeResult::passed(outcome.detail),
            Ok(outcome) => ProbeResult::failed(outcome.detail),
            Err(e) => {
                warn!(
                    check = %self.name,
                    error = %e,
                    "Probe could not be executed"
                );
                ProbeResult::error(e.to_string())
            }
        };
        result.latency_ms = Some(latency_ms);
        result
    }

    async fn diagnose(&self) -> Option<String> {
        match &self.diagnostics {
            Some(source) => source.collect().await,
            None => None,
        }
    }
}

impl std::fmt::Debug for HealthCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheck")
            .field("name", &self.name)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

/// Readiness prober
#[derive(Debug, Clone, Default)]
pub struct ReadinessProber {
    shutdown: Option<ShutdownController>,
}

impl ReadinessProber {
    /// 中断なし（最後まで実行）のproberを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// シャットダウン要求で次のラウンドの前に中断できるようにする
    ///
    /// ラウンド間の待機中に要求されても待機は最後まで行う。
    pub fn with_shutdown(mut self, shutdown: ShutdownController) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// 全チェックが同一ラウンドで成功するまでポーリングする
    pub async fn poll_until_ready(
        &self,
        checks: &[HealthCheck],
        policy: PollPolicy,
    ) -> Result<ReadinessReport, ProberError> {
        validate_checks(checks)?;
        if policy.max_attempts == 0 {
            return Err(ProberError::InvalidInput(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        info!(
            checks = checks.len(),
            max_attempts = policy.max_attempts,
            interval_ms = policy.interval.as_millis() as u64,
            "Waiting for services to become ready"
        );

        let mut rounds = 0;
        let mut cancelled = false;
        let mut results = ProbeResults::default();

        loop {
            if self.is_cancelled() {
                info!(rounds, "Readiness polling cancelled");
                cancelled = true;
                break;
            }

            rounds += 1;
            results = run_round(checks).await;

            if results.all_passed() {
                info!(rounds, "All services are ready");
                return Ok(ReadinessReport {
                    overall: true,
                    rounds,
                    cancelled: false,
                    results,
                    checked_at: Utc::now(),
                });
            }

            debug!(
                round = rounds,
                max_attempts = policy.max_attempts,
                failing = ?results.failing(),
                "Readiness round failed"
            );

            if rounds >= policy.max_attempts {
                break;
            }
            if !policy.interval.is_zero() {
                tokio::time::sleep(policy.interval).await;
            }
        }

        if !cancelled {
            warn!(
                rounds,
                failing = ?results.failing(),
                "Services did not become ready within the attempt budget"
            );
        }

        attach_diagnostics(checks, &mut results, false).await;

        Ok(ReadinessReport {
            overall: false,
            rounds,
            cancelled,
            results,
            checked_at: Utc::now(),
        })
    }

    /// 1ラウンドだけ評価する（リトライなし）
    ///
    /// 成功したチェックも含め、全件に診断情報を付与する。
    pub async fn check_once(&self, checks: &[HealthCheck]) -> Result<ProbeResults, ProberError> {
        validate_checks(checks)?;

        let mut results = run_round(checks).await;
        attach_diagnostics(checks, &mut results, true).await;
        Ok(results)
    }

    fn is_cancelled(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|s| s.is_shutdown_requested())
    }
}

fn validate_checks(checks: &[HealthCheck]) -> Result<(), ProberError> {
    if checks.is_empty() {
        return Err(ProberError::InvalidInput(
            "at least one health check is required".to_string(),
        ));
    }
    let mut seen = std::collections::HashSet::new();
    for check in checks {
        if !seen.insert(check.name()) {
            return Err(ProberError::InvalidInput(format!(
                "duplicate health check name: {}",
                check.name()
            )));
        }
    }
    Ok(())
}

async fn run_round(checks: &[HealthCheck]) -> ProbeResults {
    let outcomes = join_all(checks.iter().map(|check| check.evaluate())).await;
    checks
        .iter()
        .map(|check| check.name().to_string())
        .zip(outcomes)
        .collect()
}

async fn attach_diagnostics(checks: &[HealthCheck], results: &mut ProbeResults, all: bool) {
    let targets: Vec<&HealthCheck> = checks
        .iter()
        .filter(|check| {
            all || results
                .get(check.name())
                .is_some_and(|result| !result.is_success())
        })
        .collect();

    let diagnostics = join_all(targets.iter().map(|check| check.diagnose())).await;
    for (check, diagnostic) in targets.into_iter().zip(diagnostics) {
        if let Some(result) = results.get_mut(check.name()) {
            result.diagnostic = diagnostic;
        }
    }
}
