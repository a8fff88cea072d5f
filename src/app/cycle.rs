use std::collections::HashSet;

use log::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::{fetch_prices, fetch_valid_tickers, select_tickers, RemoteFetcher};
use crate::records::{stamp_quotes_now, HistoryStore, UpdateSummary};

/// How an update cycle ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No usable symbols were left, so the store was not touched.
    NoTickers,
    Updated {
        tickers: Vec<String>,
        summary: UpdateSummary,
    },
}

/// One fetch -> stamp -> load -> merge -> persist pass.
///
/// Errors are returned, not logged; a failed price fetch or an unreadable store ends the
/// cycle before anything is written.
pub async fn run_cycle(
    fetcher: &RemoteFetcher,
    config: &Config,
    requested: &[String],
) -> Result<CycleOutcome> {
    let tickers = resolve_tickers(fetcher, config, requested).await;
    if tickers.is_empty() {
        warn!("No valid tickers to update, skipping cycle");
        return Ok(CycleOutcome::NoTickers);
    }

    info!("Fetching prices for {} ticker(s)", tickers.len());
    let table = fetch_prices(fetcher, config, &tickers).await?;
    let batch = stamp_quotes_now(&table, &config.tsyms);

    let store = HistoryStore::from_config(config);
    let summary = store.apply(batch).await?;
    info!(
        "Stored quotes for {} asset(s) in {} ({} evicted)",
        summary.assets_updated,
        store.path().display(),
        summary.records_evicted
    );

    Ok(CycleOutcome::Updated { tickers, summary })
}

/// Filter `requested` against the live listing. When the listing cannot be fetched the
/// requested symbols are used as given, minus repeats.
async fn resolve_tickers(
    fetcher: &RemoteFetcher,
    config: &Config,
    requested: &[String],
) -> Vec<String> {
    if requested.is_empty() {
        return Vec::new();
    }

    match fetch_valid_tickers(fetcher, config).await {
        Ok(valid) => {
            let selection = select_tickers(requested, &valid);
            if !selection.unknown.is_empty() {
                warn!("Ignoring unknown tickers: {}", selection.unknown.join(", "));
            }
            selection.valid
        }
        Err(err) => {
            warn!("Ticker listing unavailable, using requested tickers unvalidated: {err}");
            let all: HashSet<String> = requested.iter().cloned().collect();
            select_tickers(requested, &all).valid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{
        config, fetcher, scratch_file, spawn_stub, symbols, LISTING, PRICES,
    };
    use crate::error::AppError;
    use crate::records::HistoryDocument;

    #[tokio::test]
    async fn updates_store_with_validated_tickers() {
        let (url, seen) = spawn_stub(Some(LISTING), PRICES).await;
        let path = scratch_file("validated");
        std::fs::write(&path, "{}").unwrap();
        let config = config(url, path.clone());

        let outcome = run_cycle(&fetcher(), &config, &symbols(&["BTC", "NOPE", "ETH"]))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CycleOutcome::Updated {
                tickers: symbols(&["BTC", "ETH"]),
                summary: UpdateSummary {
                    assets_updated: 2,
                    records_evicted: 0
                }
            }
        );

        let document: HistoryDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let btc = document.latest("BTC").unwrap();
        assert_eq!(btc.price("USD"), Some(50000.0));
        assert_eq!(btc.price("EUR"), Some(46000.0));
        assert_eq!(document.latest("ETH").unwrap().price("EUR"), None);
        assert_eq!(btc.timestamp, document.latest("ETH").unwrap().timestamp);

        let requests = seen.lock().unwrap().clone();
        let price_request = requests
            .iter()
            .find(|target| target.starts_with("/data/pricemulti"))
            .expect("price endpoint was called");
        assert!(price_request.contains("fsyms=BTC%2CETH"), "{price_request}");
        assert!(price_request.contains("api_key=secret"), "{price_request}");
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn falls_back_to_requested_tickers_without_listing() {
        let (url, _) = spawn_stub(None, PRICES).await;
        let path = scratch_file("fallback");
        std::fs::write(&path, "{}").unwrap();
        let config = config(url, path.clone());

        let outcome = run_cycle(&fetcher(), &config, &symbols(&["BTC", "BTC"]))
            .await
            .unwrap();

        let CycleOutcome::Updated { tickers, .. } = outcome else {
            panic!("expected an update");
        };
        assert_eq!(tickers, symbols(&["BTC"]));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn skips_store_when_no_tickers_survive() {
        let (url, seen) = spawn_stub(Some(LISTING), PRICES).await;
        let path = scratch_file("none");
        let config = config(url, path.clone());

        let outcome = run_cycle(&fetcher(), &config, &symbols(&["NOPE"]))
            .await
            .unwrap();

        assert_eq!(outcome, CycleOutcome::NoTickers);
        assert!(!path.exists());
        assert!(seen
            .lock()
            .unwrap()
            .iter()
            .all(|target| !target.starts_with("/data/pricemulti")));
    }

    #[tokio::test]
    async fn api_error_leaves_store_untouched() {
        let (url, _) = spawn_stub(
            Some(LISTING),
            r#"{"Response":"Error","Message":"You are over your rate limit"}"#,
        )
        .await;
        let path = scratch_file("api-error");
        std::fs::write(&path, "{}").unwrap();
        let config = config(url, path.clone());

        let err = run_cycle(&fetcher(), &config, &symbols(&["BTC"]))
            .await
            .expect_err("cycle should fail");

        assert!(matches!(err, AppError::Api(_)), "got {err}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn missing_store_is_not_created() {
        let (url, _) = spawn_stub(Some(LISTING), PRICES).await;
        let path = scratch_file("missing-store");
        let config = config(url, path.clone());

        let err = run_cycle(&fetcher(), &config, &symbols(&["BTC"]))
            .await
            .expect_err("cycle should fail");

        assert!(matches!(err, AppError::HistoryRead { .. }), "got {err}");
        assert!(!path.exists());
    }
}
