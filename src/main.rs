use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use coin_quotes::app::{run_logged, run_scheduled};
use coin_quotes::cli::{Cli, Commands, TickerArgs};
use coin_quotes::config::Config;
use coin_quotes::fetch::RemoteFetcher;
use coin_quotes::records::HistoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = dotenvy::from_path(&cli.env_file) {
        if !err.not_found() {
            warn!("Ignoring {}: {err}", cli.env_file.display());
        }
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    let fetcher = RemoteFetcher::new();

    match cli.command.unwrap_or(Commands::Update(TickerArgs::default())) {
        Commands::Update(args) => {
            let tickers = args.resolve(&config.tickers);
            run_logged(&fetcher, &config, &tickers).await;
        }
        Commands::Watch {
            interval_secs,
            tickers,
        } => {
            let tickers = tickers.resolve(&config.tickers);
            run_scheduled(
                &fetcher,
                &config,
                &tickers,
                Duration::from_secs(interval_secs),
            )
            .await?;
        }
        Commands::Init => {
            let store = HistoryStore::from_config(&config);
            if store.initialize().await? {
                info!("Created empty history file {}", store.path().display());
            } else {
                info!("History file {} already exists", store.path().display());
            }
        }
    }

    Ok(())
}
