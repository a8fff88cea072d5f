use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::{AppError, Result};

use super::{HistoryDocument, QuoteBatch};

/// What a successful update did to the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub assets_updated: usize,
    pub records_evicted: usize,
}

/// Bounded per-asset history kept in a single pretty-printed JSON file.
///
/// Every update rewrites the whole file. There is no locking: callers must not run two
/// updates against the same path at once.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    max_len: usize,
}

impl HistoryStore {
    pub fn new<P: Into<PathBuf>>(path: P, max_len: usize) -> Self {
        Self {
            path: path.into(),
            max_len,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.quotes_file.clone(), config.max_quotes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<HistoryDocument> {
        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|source| AppError::HistoryRead {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&text).map_err(|source| AppError::HistoryParse {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the file with `document`, pretty-printed.
    pub async fn persist(&self, document: &HistoryDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)
            .await
            .map_err(|source| AppError::HistoryWrite {
                path: self.path.clone(),
                source,
            })
    }

    /// Load, append `batch`, trim every series to the bound, and write back.
    ///
    /// A document that cannot be read or parsed aborts the update before anything is written.
    pub async fn apply(&self, batch: QuoteBatch) -> Result<UpdateSummary> {
        let mut document = self.load().await?;

        let assets_updated = document.merge(batch);
        let records_evicted = document.enforce_bound(self.max_len);

        self.persist(&document).await?;

        Ok(UpdateSummary {
            assets_updated,
            records_evicted,
        })
    }

    /// Create an empty document when none exists yet. Returns `false` if the file was already there.
    pub async fn initialize(&self) -> Result<bool> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(source) => {
                return Err(AppError::HistoryWrite {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let json = serde_json::to_string_pretty(&HistoryDocument::new())?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|source| AppError::HistoryWrite {
                path: self.path.clone(),
                source,
            })?;
        file.flush().await?;
        Ok(true)
    }
}
