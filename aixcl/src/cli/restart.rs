//! restart サブコマンド

use super::{start, stop};
use crate::AppContext;
use clap::Args;

/// restart サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct RestartArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub stop: stop::StopArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub start: start::StartArgs,
}

/// restart コマンドを実行（stop → start）
pub async fn execute(args: &RestartArgs, ctx: &AppContext) -> Result<(), anyhow::Error> {
    stop::execute(&args.stop, ctx).await?;
    start::execute(&args.start, ctx).await
}
