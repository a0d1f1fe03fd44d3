use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use linkshelf::cli::{Cli, Commands};
use linkshelf::config::AppConfig;
use linkshelf::errors::LinkshelfError;
use linkshelf::runtime::modes;
use linkshelf::system::init_logging;

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<LinkshelfError>() {
                Some(err) => eprintln!("{}", err.format_colored()),
                None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Commands::Serve);

    // 生成示例配置不需要有效配置
    if let Commands::ConfigGen { output_path, force } = &command {
        return modes::cli::generate_config(output_path.as_deref(), *force);
    }

    let config = AppConfig::load(&cli.config)?;
    let _log_guard = init_logging(&config.logging)?;

    match command {
        Commands::Serve => modes::run_server(&config).await,
        other => modes::run_cli(other, &config).await,
    }
}
