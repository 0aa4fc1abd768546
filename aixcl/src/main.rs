//! AIXCL stack manager entry point

use aixcl::cli::{Cli, Commands};
use aixcl::{cli, logging, AppContext};
use clap::{CommandFactory, Parser};

fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let _ = Cli::command().write_help(&mut std::io::stderr());
        std::process::exit(1);
    };

    if let Err(e) = logging::init() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(command, cli.config)) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    config_path: Option<std::path::PathBuf>,
) -> Result<(), anyhow::Error> {
    let ctx = AppContext::load(config_path)?;

    match command {
        Commands::Start(args) => cli::start::execute(&args, &ctx).await,
        Commands::Stop(args) => cli::stop::execute(&args, &ctx).await,
        Commands::Restart(args) => cli::restart::execute(&args, &ctx).await,
        Commands::Logs(args) => cli::logs::execute(&args, &ctx).await,
        Commands::Clean(args) => cli::clean::execute(&args, &ctx).await,
        Commands::Cleanup => cli::cleanup::execute(&ctx).await,
        Commands::Stats => cli::stats::execute(&ctx).await,
        Commands::Status(args) => cli::status::execute(&args, &ctx).await,
    }
}
