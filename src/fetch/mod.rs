pub mod client;
pub mod prices;
pub mod tickers;

pub use client::RemoteFetcher;
pub use prices::{fetch_prices, parse_price_response, price_url, PriceTable};
pub use tickers::{
    fetch_valid_tickers, listing_url, parse_ticker_listing, select_tickers, TickerSelection,
};
