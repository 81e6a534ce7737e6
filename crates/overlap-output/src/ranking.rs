//! Ranking of overlapping securities.

use overlap_index::{IndexName, OverlapMap};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One security with the indices holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Security symbol.
    pub symbol: String,

    /// Number of indices the symbol appears in.
    pub count: usize,

    /// Indices holding the symbol, in processing order.
    pub indices: Vec<IndexName>,
}

impl RankedEntry {
    /// Create an entry; `count` is the number of indices.
    pub fn new(symbol: impl Into<String>, indices: Vec<IndexName>) -> Self {
        Self {
            symbol: symbol.into(),
            count: indices.len(),
            indices,
        }
    }

    /// Indices joined with `sep`.
    pub fn joined_indices(&self, sep: &str) -> String {
        self.indices
            .iter()
            .map(IndexName::as_str)
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: present in {} portfolios within [{}]",
            self.symbol,
            self.count,
            self.joined_indices(",")
        )
    }
}

/// Every symbol of the map, most widely held first.
///
/// The sort is stable, so symbols with equal counts keep the map's
/// first-sighting order.
pub fn rank_all(map: &OverlapMap) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = map
        .iter()
        .map(|(symbol, indices)| RankedEntry::new(symbol, indices.to_vec()))
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Symbols held by more than one index, most widely held first.
pub fn rank_overlaps(map: &OverlapMap) -> Vec<RankedEntry> {
    let mut entries = rank_all(map);
    entries.retain(|entry| entry.count > 1);
    entries
}
