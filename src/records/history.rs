use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::{QuoteBatch, QuoteRecord};

/// Asset symbol -> records ordered oldest-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryDocument {
    series: BTreeMap<String, VecDeque<QuoteRecord>>,
}

impl HistoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append each record to the end of its asset's series, creating the series if needed.
    /// Returns the number of assets touched.
    pub fn merge(&mut self, batch: QuoteBatch) -> usize {
        let touched = batch.len();
        for (asset, record) in batch {
            self.series.entry(asset).or_default().push_back(record);
        }
        touched
    }

    /// Drop the oldest records of every series until each holds at most `max_len`.
    /// Returns how many records were evicted in total.
    pub fn enforce_bound(&mut self, max_len: usize) -> usize {
        let mut evicted = 0;
        for records in self.series.values_mut() {
            while records.len() > max_len {
                records.pop_front();
                evicted += 1;
            }
        }
        evicted
    }

    pub fn series(&self, asset: &str) -> Option<&VecDeque<QuoteRecord>> {
        self.series.get(asset)
    }

    pub fn len_of(&self, asset: &str) -> usize {
        self.series.get(asset).map_or(0, VecDeque::len)
    }

    pub fn latest(&self, asset: &str) -> Option<&QuoteRecord> {
        self.series.get(asset).and_then(VecDeque::back)
    }
}
