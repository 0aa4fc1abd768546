//! レポート整形
//!
//! `start` / `status` が標準出力に表示するテキストを組み立てる。

use crate::types::health::{ProbeResult, ProbeResults, ProbeStatus, ReadinessReport};
use aixcl_common::RunState;
use std::fmt::Write;

/// コンテナ稼働状態の1行分
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ContainerRow {
    /// サービス名
    pub service: String,
    /// コンテナ名
    pub container: String,
    /// 稼働状態
    pub state: RunState,
    /// コンテナ自身のHEALTHCHECK結果（定義されている場合のみ）
    pub health: Option<String>,
}

fn status_mark(status: ProbeStatus) -> &'static str {
    match status {
        ProbeStatus::Passed => "✓",
        ProbeStatus::Failed => "✗",
        ProbeStatus::Error => "!",
    }
}

fn write_result(out: &mut String, name: &str, result: &ProbeResult) {
    let _ = write!(
        out,
        "  {} {:<14} {}",
        status_mark(result.status),
        name,
        result.status.as_str()
    );
    if let Some(detail) = &result.detail {
        let _ = write!(out, " ({})", detail);
    }
    if let Some(ms) = result.latency_ms {
        let _ = write!(out, " [{} ms]", ms);
    }
    out.push('\n');

    if let Some(diagnostic) = &result.diagnostic {
        for line in diagnostic.lines() {
            let _ = writeln!(out, "      | {}", line);
        }
    }
}

/// 結果一覧を整形
pub fn render_results(results: &ProbeResults) -> String {
    let mut out = String::new();
    for (name, result) in results.iter() {
        write_result(&mut out, name, result);
    }
    out
}

/// `start` 用のreadinessレポートを整形
pub fn render_readiness(report: &ReadinessReport) -> String {
    let mut out = String::new();
    if report.overall {
        let _ = writeln!(
            out,
            "All services are ready (after {} round{})",
            report.rounds,
            if report.rounds == 1 { "" } else { "s" }
        );
    } else if report.cancelled {
        let _ = writeln!(
            out,
            "Readiness check interrupted after {} round{}",
            report.rounds,
            if report.rounds == 1 { "" } else { "s" }
        );
    } else {
        let _ = writeln!(
            out,
            "Services not ready after {} attempts: {}",
            report.rounds,
            report.results.failing().join(", ")
        );
    }
    out.push_str(&render_results(&report.results));
    out
}

/// コンテナ稼働状態の表を整形
pub fn render_containers(rows: &[ContainerRow]) -> String {
    let mut out = format!(
        "{:<16}{:<16}{:<16}{}\n",
        "SERVICE", "CONTAINER", "STATE", "HEALTH"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<16}{:<16}{:<16}{}",
            row.service,
            row.container,
            row.state.to_string(),
            row.health.as_deref().unwrap_or("-")
        );
    }
    out
}
