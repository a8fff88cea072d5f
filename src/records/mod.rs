use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::fetch::PriceTable;

pub mod history;
pub mod store;

pub use history::HistoryDocument;
pub use store::{HistoryStore, UpdateSummary};

pub const PRICE_FIELD_PREFIX: &str = "price_";

/// One capture of an asset's prices. Serialised flat as
/// `{"timestamp": <ms>, "price_<QUOTE>": <number>, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Keyed by full field name (`price_USD`); quotes the API omitted are absent.
    #[serde(flatten)]
    pub prices: BTreeMap<String, f64>,
}

impl QuoteRecord {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            prices: BTreeMap::new(),
        }
    }

    pub fn price(&self, quote: &str) -> Option<f64> {
        self.prices.get(&price_field(quote)).copied()
    }
}

/// Records captured in one cycle, one per asset.
pub type QuoteBatch = BTreeMap<String, QuoteRecord>;

pub fn price_field(quote: &str) -> String {
    format!("{PRICE_FIELD_PREFIX}{quote}")
}

/// Turn a price table into records sharing the single capture time `captured_at`.
///
/// Only the configured quote currencies are copied, verbatim.
pub fn stamp_quotes(table: &PriceTable, tsyms: &[String], captured_at: i64) -> QuoteBatch {
    table
        .iter()
        .map(|(asset, quotes)| {
            let mut record = QuoteRecord::new(captured_at);
            for tsym in tsyms {
                if let Some(price) = quotes.get(tsym) {
                    record.prices.insert(price_field(tsym), *price);
                }
            }
            (asset.clone(), record)
        })
        .collect()
}

pub fn stamp_quotes_now(table: &PriceTable, tsyms: &[String]) -> QuoteBatch {
    stamp_quotes(table, tsyms, Utc::now().timestamp_millis())
}
