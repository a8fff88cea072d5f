//! Shared fixtures for cycle and scheduler tests: a canned HTTP stub and scratch paths.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::fetch::RemoteFetcher;

pub(crate) const LISTING: &str = r#"{"Response":"Success","Data":{"BTC":{},"ETH":{}}}"#;
pub(crate) const PRICES: &str = r#"{"BTC":{"USD":50000,"EUR":46000},"ETH":{"USD":3000}}"#;

/// Serves canned bodies by path prefix and records every request target it sees.
pub(crate) async fn spawn_stub(
    listing: Option<&'static str>,
    prices: &'static str,
) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let request = String::from_utf8_lossy(&buf);
            let target = request
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            recorded.lock().unwrap().push(target.clone());

            let (status, body) = if target.starts_with("/data/all/coinlist") {
                match listing {
                    Some(body) => ("200 OK", body),
                    None => ("500 Internal Server Error", "oops"),
                }
            } else if target.starts_with("/data/pricemulti") {
                ("200 OK", prices)
            } else {
                ("404 Not Found", "")
            };
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}/"), seen)
}

/// Accepts connections and holds them open without ever answering.
pub(crate) async fn spawn_silent_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{addr}/")
}

pub(crate) fn scratch_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "coin-quotes-cycle-{name}-{}-{nanos}.json",
        std::process::id()
    ))
}

pub(crate) fn config(api_url: String, quotes_file: PathBuf) -> Config {
    Config {
        api_url,
        api_key: "secret".to_string(),
        tsyms: vec!["USD".to_string(), "EUR".to_string()],
        quotes_file,
        max_quotes: 2,
        tickers: Vec::new(),
    }
}

pub(crate) fn fetcher() -> RemoteFetcher {
    RemoteFetcher::with_client(Client::builder().no_proxy().build().unwrap())
}

pub(crate) fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

