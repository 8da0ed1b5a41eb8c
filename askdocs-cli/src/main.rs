use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use askdocs_cli::commands::{self, Cli, Command};
use askdocs_cli::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present, before reading the environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = AppConfig::from_env()?;

    match cli.command {
        Command::Index { source, clear } => commands::run_index(&config, &source, clear).await,
        Command::Query { question, top_k, json } => {
            commands::run_query(&config, &question, top_k, json).await
        }
        Command::Chat => commands::run_chat(&config).await,
        Command::Batch { questions, file, output } => {
            commands::run_batch(&config, &questions, file.as_deref(), output.as_deref()).await
        }
        Command::Info => commands::run_info(&config),
        Command::Clear { yes } => commands::run_clear(&config, yes).await,
    }
}
