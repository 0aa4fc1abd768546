//! logs サブコマンド

use crate::runtime::LogsOptions;
use crate::AppContext;
use clap::Args;

/// logs サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct LogsArgs {
    /// Compose service to show (default: all services)
    pub service: Option<String>,

    /// Number of lines to show from the end of the logs
    #[arg(short = 'n', long)]
    pub tail: Option<u32>,

    /// Follow log output
    #[arg(short, long)]
    pub follow: bool,
}

impl From<&LogsArgs> for LogsOptions {
    fn from(args: &LogsArgs) -> Self {
        LogsOptions {
            service: args.service.clone(),
            tail: args.tail,
            follow: args.follow,
        }
    }
}

/// logs コマンドを実行
pub async fn execute(args: &LogsArgs, ctx: &AppContext) -> Result<(), anyhow::Error> {
    ctx.compose.logs(&LogsOptions::from(args)).await?;
    Ok(())
}
