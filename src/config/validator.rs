use std::collections::HashSet;

use reqwest::Url;

/// Split a comma-separated symbol list, trimming whitespace and dropping blank entries.
pub fn split_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the per-asset history bound. Zero is rejected: it would empty every series each cycle.
pub fn parse_max_quotes(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("MAX_QUOTES must be at least 1".to_string()),
        Ok(value) => Ok(value),
        Err(err) => Err(format!(
            "MAX_QUOTES must be a positive integer, got `{}` ({err})",
            raw.trim()
        )),
    }
}

pub(crate) fn validate_api_url(url: &str, issues: &mut Vec<String>) {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => issues.push(format!(
            "API_URL must use http or https, got scheme `{}`",
            parsed.scheme()
        )),
        Err(err) => issues.push(format!("API_URL `{url}` is not a valid URL: {err}")),
    }
}

pub(crate) fn validate_tsyms(tsyms: &[String], issues: &mut Vec<String>) {
    if tsyms.is_empty() {
        issues.push("TSYMS must name at least one quote currency".to_string());
        return;
    }

    let mut seen = HashSet::new();
    for symbol in tsyms {
        if !seen.insert(symbol.as_str()) {
            issues.push(format!("TSYMS lists `{symbol}` more than once"));
        }
    }
}
