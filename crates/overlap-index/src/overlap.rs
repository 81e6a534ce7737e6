//! Symbol to index aggregation.

use crate::name::IndexName;
use indexmap::IndexMap;
use serde::Serialize;

/// Ticker of one constituent security, taken as published.
pub type SecuritySymbol = String;

/// Constituents of one index, in published row order.
pub type ConstituentList = Vec<SecuritySymbol>;

/// Mapping from security symbol to the indices it was observed in.
///
/// Symbols iterate in first-sighting order. Each symbol's index sequence is in
/// processing order and is not deduplicated: an index fed twice is counted
/// twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OverlapMap {
    entries: IndexMap<SecuritySymbol, Vec<IndexName>>,
}

impl OverlapMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices containing `symbol`, in processing order.
    pub fn indices_for(&self, symbol: &str) -> Option<&[IndexName]> {
        self.entries.get(symbol).map(Vec::as_slice)
    }

    /// Number of indices `symbol` was observed in (zero if never seen).
    pub fn count(&self, symbol: &str) -> usize {
        self.entries.get(symbol).map_or(0, Vec::len)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no symbol has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate symbols and their indices in first-sighting order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IndexName])> + '_ {
        self.entries
            .iter()
            .map(|(symbol, indices)| (symbol.as_str(), indices.as_slice()))
    }

    /// Consume the map and return the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<SecuritySymbol, Vec<IndexName>> {
        self.entries
    }

    fn record(&mut self, symbol: SecuritySymbol, index: &IndexName) {
        self.entries.entry(symbol).or_default().push(index.clone());
    }
}

/// Incrementally builds an [`OverlapMap`] from (index, constituents) pairs.
#[derive(Debug, Default)]
pub struct OverlapAggregator {
    map: OverlapMap,
    indices: Vec<IndexName>,
}

impl OverlapAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every symbol of `constituents` as held by `index`.
    pub fn add<I>(&mut self, index: IndexName, constituents: I)
    where
        I: IntoIterator<Item = SecuritySymbol>,
    {
        for symbol in constituents {
            self.map.record(symbol, &index);
        }
        self.indices.push(index);
    }

    /// Indices added so far, in processing order.
    pub fn indices(&self) -> &[IndexName] {
        &self.indices
    }

    /// The map built so far.
    pub const fn map(&self) -> &OverlapMap {
        &self.map
    }

    /// Finish aggregation.
    pub fn finish(self) -> OverlapMap {
        self.map
    }
}

/// Aggregate (index, constituents) pairs in input order.
pub fn aggregate<I, C>(pairs: I) -> OverlapMap
where
    I: IntoIterator<Item = (IndexName, C)>,
    C: IntoIterator<Item = SecuritySymbol>,
{
    let mut aggregator = OverlapAggregator::new();
    for (index, constituents) in pairs {
        aggregator.add(index, constituents);
    }
    aggregator.finish()
}

impl FromIterator<(IndexName, ConstituentList)> for OverlapMap {
    fn from_iter<T: IntoIterator<Item = (IndexName, ConstituentList)>>(iter: T) -> Self {
        aggregate(iter)
    }
}
