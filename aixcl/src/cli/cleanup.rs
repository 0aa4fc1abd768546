//! cleanup サブコマンド
//!
//! 未使用のDockerリソースをホスト全体で解放します。
//! 途中の手順が失敗しても残りの手順は実行します。

use crate::runtime::docker::reclaimed_space;
use crate::runtime::PruneTarget;
use crate::AppContext;
use tracing::warn;

/// cleanup コマンドを実行
pub async fn execute(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let mut failed = Vec::new();

    for target in PruneTarget::ALL {
        println!("Removing {}...", target.label());
        match ctx.docker.prune(target).await {
            Ok(output) => {
                let space = reclaimed_space(&output.stdout).unwrap_or("0B");
                println!("  reclaimed {}", space);
            }
            Err(e) => {
                warn!(step = target.label(), error = %e, "Prune step failed");
                println!("  failed: {}", e);
                failed.push(target.label());
            }
        }
    }

    println!();
    if let Err(e) = ctx.docker.system_df().await {
        warn!(error = %e, "Failed to show disk usage");
    }

    if !failed.is_empty() {
        anyhow::bail!("cleanup steps failed: {}", failed.join(", "));
    }
    Ok(())
}
