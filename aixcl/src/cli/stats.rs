//! stats サブコマンド

use super::stop::running_containers;
use crate::AppContext;

/// stats コマンドを実行（稼働中の管理対象コンテナのみ）
pub async fn execute(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let running = running_containers(ctx).await;
    if running.is_empty() {
        println!("No services are running");
        return Ok(());
    }

    let names: Vec<&str> = running.iter().map(String::as_str).collect();
    ctx.docker.stats(&names).await?;
    Ok(())
}
