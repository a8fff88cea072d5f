use std::collections::BTreeMap;

use reqwest::Url;
use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, Context, Result};

use super::RemoteFetcher;

const PRICE_PATH: &str = "data/pricemulti";

/// Asset symbol -> quote currency -> price.
pub type PriceTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Build the multi-symbol price query for `symbols` against every configured quote currency.
pub fn price_url(config: &Config, symbols: &[String]) -> Result<Url> {
    if symbols.is_empty() {
        return Err(AppError::message(
            "At least one asset symbol is required for a price query",
        ));
    }

    let raw = format!("{}{}", config.api_url, PRICE_PATH);
    let mut url = Url::parse(&raw).with_context(|| format!("Invalid price URL {raw}"))?;
    url.query_pairs_mut()
        .append_pair("tsyms", &config.tsyms_csv())
        .append_pair("api_key", &config.api_key)
        .append_pair("fsyms", &symbols.join(","));
    Ok(url)
}

pub async fn fetch_prices(
    fetcher: &RemoteFetcher,
    config: &Config,
    symbols: &[String],
) -> Result<PriceTable> {
    let body = fetcher.get_text(price_url(config, symbols)?).await?;
    parse_price_response(&body)
}

/// Decode a `pricemulti` payload.
///
/// Entries that are not objects and quotes that are not numbers are dropped, so a
/// currency the API left out is simply absent from the table.
pub fn parse_price_response(body: &str) -> Result<PriceTable> {
    let root: Value = serde_json::from_str(body).context("Failed to parse price JSON")?;

    let object = root
        .as_object()
        .ok_or_else(|| AppError::message("Price payload is not a JSON object"))?;

    if object.get("Response").and_then(Value::as_str) == Some("Error") {
        let message = object
            .get("Message")
            .and_then(Value::as_str)
            .unwrap_or("no message supplied");
        return Err(AppError::Api(message.to_string()));
    }

    let mut table = PriceTable::new();
    for (asset, quotes) in object {
        let Some(quotes) = quotes.as_object() else {
            log::debug!("Skipping non-object price entry for {asset}");
            continue;
        };

        let mut prices = BTreeMap::new();
        for (quote, value) in quotes {
            match value.as_f64() {
                Some(price) => {
                    prices.insert(quote.clone(), price);
                }
                None => log::debug!("Skipping non-numeric {asset}/{quote} price: {value}"),
            }
        }
        table.insert(asset.clone(), prices);
    }

    Ok(table)
}
