use std::path::PathBuf;

use crate::error::{AppError, Result};

pub mod validator;

pub use validator::{parse_max_quotes, split_symbols};

pub const API_URL_VAR: &str = "API_URL";
pub const API_KEY_VAR: &str = "API_KEY";
pub const TSYMS_VAR: &str = "TSYMS";
pub const QUOTES_FILE_VAR: &str = "QUOTES_FILE";
pub const MAX_QUOTES_VAR: &str = "MAX_QUOTES";
pub const TICKERS_VAR: &str = "TICKERS";

/// Process-wide settings, read once at startup and passed by reference afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the price index, always ending in `/`.
    pub api_url: String,
    pub api_key: String,
    /// Quote currencies in the order they were configured.
    pub tsyms: Vec<String>,
    pub quotes_file: PathBuf,
    pub max_quotes: usize,
    /// Default asset symbols when none are given on the command line.
    pub tickers: Vec<String>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup, reporting every problem at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut issues = Vec::new();

        let mut required = |name: &str| -> String {
            match lookup(name).map(|value| value.trim().to_string()) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    issues.push(format!("environment variable {name} is not set"));
                    String::new()
                }
            }
        };

        let api_url = required(API_URL_VAR);
        let api_key = required(API_KEY_VAR);
        let tsyms_raw = required(TSYMS_VAR);
        let quotes_file = required(QUOTES_FILE_VAR);
        let max_quotes_raw = required(MAX_QUOTES_VAR);

        let config = Config {
            api_url: normalize_base_url(&api_url),
            api_key,
            tsyms: split_symbols(&tsyms_raw),
            quotes_file: PathBuf::from(quotes_file),
            max_quotes: 0,
            tickers: lookup(TICKERS_VAR)
                .map(|raw| split_symbols(&raw))
                .unwrap_or_default(),
        };

        let max_quotes = if max_quotes_raw.is_empty() {
            None
        } else {
            match parse_max_quotes(&max_quotes_raw) {
                Ok(value) => Some(value),
                Err(issue) => {
                    issues.push(issue);
                    None
                }
            }
        };

        if !api_url.is_empty() {
            validator::validate_api_url(&config.api_url, &mut issues);
        }
        if !tsyms_raw.is_empty() {
            validator::validate_tsyms(&config.tsyms, &mut issues);
        }

        match max_quotes {
            Some(max_quotes) if issues.is_empty() => Ok(Config {
                max_quotes,
                ..config
            }),
            _ => Err(AppError::Config(issues)),
        }
    }

    /// Quote currencies joined the way the price endpoint expects them.
    pub fn tsyms_csv(&self) -> String {
        self.tsyms.join(",")
    }
}

fn normalize_base_url(raw: &str) -> String {
    if raw.is_empty() || raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    }
}
