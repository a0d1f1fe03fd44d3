//! One-shot CLI commands

use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;
use tracing::info;

use crate::cli::Commands;
use crate::config::AppConfig;
use crate::media::{CdnUrlBuilder, CloudinaryClient, TransformOptions};

/// 生成示例配置（无需有效配置即可运行）
pub fn generate_config(output_path: Option<&str>, force: bool) -> Result<()> {
    let sample = AppConfig::generate_sample_config();

    let Some(path) = output_path else {
        println!("{}", sample);
        return Ok(());
    };

    if Path::new(path).exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path);
    }
    std::fs::write(path, sample)?;
    println!("{} Sample configuration written to {}", "✓".green(), path);
    Ok(())
}

/// Run a command that needs a loaded configuration
pub async fn run_cli(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::ImageUrl {
            public_id,
            transform,
        } => {
            let builder = CdnUrlBuilder::from_config(&config.media);
            println!(
                "{}",
                builder.build_url(&public_id, &TransformOptions::from(transform))
            );
        }
        Commands::Destroy { public_id } => {
            let client = CloudinaryClient::new(&config.media)?;
            if !client.is_configured() {
                println!(
                    "{} Provider credentials not configured, nothing was deleted",
                    "!".yellow()
                );
            }
            client.destroy(&public_id).await?;
            if client.is_configured() {
                info!("Destroy command finished for {}", public_id);
                println!("{} Deleted {}", "✓".green(), public_id);
            }
        }
        Commands::ConfigGen { output_path, force } => {
            generate_config(output_path.as_deref(), force)?;
        }
        Commands::Serve => bail!("serve is not a one-shot command"),
    }
    Ok(())
}
