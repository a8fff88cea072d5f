use std::collections::HashSet;

use reqwest::Url;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, Context, Result};

use super::RemoteFetcher;

const LISTING_PATH: &str = "data/all/coinlist?summary=true";

/// Requested symbols split by whether the listing knows them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerSelection {
    pub valid: Vec<String>,
    pub unknown: Vec<String>,
}

pub fn listing_url(config: &Config) -> Result<Url> {
    let raw = format!("{}{}", config.api_url, LISTING_PATH);
    Ok(Url::parse(&raw).with_context(|| format!("Invalid ticker listing URL {raw}"))?)
}

/// Download the coin listing and return every symbol it advertises.
pub async fn fetch_valid_tickers(
    fetcher: &RemoteFetcher,
    config: &Config,
) -> Result<HashSet<String>> {
    let body = fetcher.get_text(listing_url(config)?).await?;
    parse_ticker_listing(&body)
}

pub fn parse_ticker_listing(body: &str) -> Result<HashSet<String>> {
    let root: Value = serde_json::from_str(body).context("Failed to parse ticker listing JSON")?;

    let data = root
        .get("Data")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::message("Ticker listing payload has no `Data` object"))?;

    Ok(data.keys().cloned().collect())
}

/// Keep requested symbols present in the listing, in request order and without repeats.
pub fn select_tickers(requested: &[String], valid: &HashSet<String>) -> TickerSelection {
    let mut seen = HashSet::new();
    let mut selection = TickerSelection::default();

    for symbol in requested {
        if !seen.insert(symbol.as_str()) {
            continue;
        }
        if valid.contains(symbol) {
            selection.valid.push(symbol.clone());
        } else {
            selection.unknown.push(symbol.clone());
        }
    }

    selection
}
