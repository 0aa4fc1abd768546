//! clean サブコマンド
//!
//! スタックのコンテナ・ネットワーク・ボリュームを削除します。

use super::cleanup;
use crate::AppContext;
use clap::Args;

/// clean サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct CleanArgs {
    /// Also reclaim unused Docker resources host-wide (same as `cleanup`)
    #[arg(long)]
    pub system: bool,
}

/// clean コマンドを実行
pub async fn execute(args: &CleanArgs, ctx: &AppContext) -> Result<(), anyhow::Error> {
    println!("Removing containers, networks and volumes...");
    ctx.compose.down(true).await?;
    println!("Stack removed");

    if args.system {
        cleanup::execute(ctx).await?;
    }
    Ok(())
}
