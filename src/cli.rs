use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "coin-quotes")]
#[command(about = "Record cryptocurrency quotes into a bounded JSON history")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Environment file loaded before reading configuration; ignored when absent.
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch prices once and append them to the history file
    Update(TickerArgs),

    /// Keep updating on a fixed interval until interrupted
    Watch {
        /// Seconds between update cycles
        #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,

        #[command(flatten)]
        tickers: TickerArgs,
    },

    /// Create an empty history file if none exists
    Init,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TickerArgs {
    /// Asset symbols to track (e.g. BTC ETH); defaults to TICKERS from the environment
    pub tickers: Vec<String>,
}

impl TickerArgs {
    /// Command-line symbols if any were given, otherwise `fallback`.
    pub fn resolve(&self, fallback: &[String]) -> Vec<String> {
        let given: Vec<String> = self
            .tickers
            .iter()
            .flat_map(|arg| crate::config::split_symbols(arg))
            .collect();
        if given.is_empty() {
            fallback.to_vec()
        } else {
            given
        }
    }
}
