//! start サブコマンド
//!
//! サービスを起動し、全サービスのreadinessを待機します。

use crate::health::report::render_readiness;
use crate::health::ReadinessProber;
use crate::shutdown::ShutdownController;
use crate::types::PollPolicy;
use crate::AppContext;
use clap::Args;
use std::time::Duration;

/// start サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Maximum readiness rounds (default: startup_attempts from config, 30)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: Option<u32>,

    /// Seconds to wait between failed rounds (default: startup_interval_secs from config, 2)
    #[arg(long)]
    pub interval: Option<u64>,
}

impl StartArgs {
    /// 引数と設定からポーリング方針を決定
    pub fn poll_policy(&self, ctx: &AppContext) -> PollPolicy {
        PollPolicy::new(
            self.attempts.unwrap_or(ctx.config.startup_attempts),
            Duration::from_secs(self.interval.unwrap_or(ctx.config.startup_interval_secs)),
        )
    }
}

/// start コマンドを実行
pub async fn execute(args: &StartArgs, ctx: &AppContext) -> Result<(), anyhow::Error> {
    println!(
        "Starting services ({})...",
        ctx.compose.compose_file().display()
    );
    ctx.compose.up_detached().await?;

    let checks = ctx.health_checks();
    if checks.is_empty() {
        println!("No health checks configured, skipping readiness wait");
        return Ok(());
    }

    let policy = args.poll_policy(ctx);
    println!(
        "Waiting for {} services (up to {} attempts, {}s interval)...",
        checks.len(),
        policy.max_attempts,
        policy.interval.as_secs()
    );

    // Ctrl-Cで次のラウンドの前に打ち切る
    let shutdown = ShutdownController::new();
    shutdown.request_on_ctrl_c();
    let prober = ReadinessProber::new().with_shutdown(shutdown);

    let report = prober.poll_until_ready(&checks, policy).await?;
    print!("{}", render_readiness(&report));

    if report.cancelled {
        anyhow::bail!("startup interrupted");
    }
    if !report.overall {
        anyhow::bail!(
            "services not ready: {}",
            report.results.failing().join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aixcl_common::StackConfig;

    #[test]
    fn test_poll_policy_defaults_from_config() {
        let ctx = AppContext::new(StackConfig {
            startup_attempts: 12,
            startup_interval_secs: 5,
            ..StackConfig::default()
        });

        let policy = StartArgs::default().poll_policy(&ctx);
        assert_eq!(policy.max_attempts, 12);
        assert_eq!(policy.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_poll_policy_args_override_config() {
        let ctx = AppContext::new(StackConfig::default());
        let args = StartArgs {
            attempts: Some(3),
            interval: Some(0),
        };

        let policy = args.poll_policy(&ctx);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.interval, Duration::ZERO);
    }
}
