//! Overlap analysis pipeline.
//!
//! Fund names are resolved to references, each reference is fetched and
//! parsed, and the resulting constituent lists are aggregated in reference
//! order. A reference that cannot be fetched or parsed is recorded as a
//! [`FetchFailure`] and skipped; it never affects other indices.

use crate::funds::{FundReference, FundTable, Notice, ResolvedFunds};
use futures::stream::{self, StreamExt};
use overlap_data::{ConstituentSource, DataError, FailureKind};
use overlap_index::{IndexName, NameNormalizer, OverlapAggregator, OverlapMap};
use overlap_output::{OverlapReport, ReportBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// One index to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTarget {
    /// Aggregation key.
    pub name: IndexName,

    /// URL of the constituent file.
    pub reference: String,
}

impl From<&FundReference> for IndexTarget {
    fn from(fund: &FundReference) -> Self {
        Self {
            name: fund.index.name.clone(),
            reference: fund.index.reference.clone(),
        }
    }
}

/// An index whose constituents were aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedIndex {
    /// Aggregation key.
    pub name: IndexName,

    /// URL the constituents came from.
    pub reference: String,

    /// Number of constituents.
    pub constituents: usize,
}

/// An index dropped because its constituents were unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    /// Aggregation key the index would have used.
    pub name: IndexName,

    /// URL that failed.
    pub reference: String,

    /// Retrieval or parse failure.
    pub kind: FailureKind,

    /// Error message.
    pub reason: String,
}

impl FetchFailure {
    fn new(target: IndexTarget, error: &DataError) -> Self {
        Self {
            name: target.name,
            reference: target.reference,
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::Retrieval => {
                write!(f, "Error fetching URL {}: {}", self.reference, self.reason)
            }
            FailureKind::Parse => {
                write!(f, "Error parsing CSV from {}: {}", self.reference, self.reason)
            }
        }
    }
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisRun {
    /// Resolved fund references, in selection order.
    pub references: Vec<FundReference>,

    /// Notices for funds that did not resolve cleanly.
    pub notices: Vec<Notice>,

    /// Indices that were aggregated, in processing order.
    pub loaded: Vec<LoadedIndex>,

    /// Indices that were dropped.
    pub failures: Vec<FetchFailure>,

    /// Symbol to indices mapping.
    pub overlap: OverlapMap,
}

impl AnalysisRun {
    /// Names of the aggregated indices, in processing order.
    pub fn indices(&self) -> Vec<IndexName> {
        self.loaded.iter().map(|index| index.name.clone()).collect()
    }

    /// Informational lines for notices and failures.
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .iter()
            .map(ToString::to_string)
            .chain(self.failures.iter().map(ToString::to_string))
            .collect()
    }

    /// Ranked overlap report of this run.
    pub fn report(&self) -> OverlapReport {
        self.report_builder().build(&self.overlap)
    }

    /// Report builder preloaded with this run's indices and messages.
    pub fn report_builder(&self) -> ReportBuilder {
        ReportBuilder::new()
            .indices(self.indices())
            .notices(self.messages())
    }
}

/// Fetches constituent lists and aggregates them.
#[derive(Debug)]
pub struct Analyzer<S> {
    source: S,
    concurrency: usize,
}

impl<S: ConstituentSource> Analyzer<S> {
    /// Analyzer fetching one reference at a time.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` fetches in flight. Results are still
    /// aggregated in reference order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Source in use.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Resolve `funds` through `table` and analyze the resulting references.
    pub async fn analyze_funds<F: AsRef<str>>(
        &self,
        table: &FundTable,
        normalizer: &NameNormalizer,
        funds: &[F],
    ) -> AnalysisRun {
        self.analyze_funds_with(table, normalizer, funds, |_| {})
            .await
    }

    /// [`Analyzer::analyze_funds`] with a callback invoked as each fetch
    /// completes.
    pub async fn analyze_funds_with<F, P>(
        &self,
        table: &FundTable,
        normalizer: &NameNormalizer,
        funds: &[F],
        on_fetched: P,
    ) -> AnalysisRun
    where
        F: AsRef<str>,
        P: FnMut(&IndexTarget),
    {
        let resolved = table.resolve_references(normalizer, funds);
        self.analyze_resolved(resolved, on_fetched).await
    }

    /// Analyze funds already resolved with [`FundTable::resolve_references`].
    pub async fn analyze_resolved<P>(&self, resolved: ResolvedFunds, on_fetched: P) -> AnalysisRun
    where
        P: FnMut(&IndexTarget),
    {
        let targets = resolved.references.iter().map(IndexTarget::from).collect();

        let mut run = self.analyze_targets_with(targets, on_fetched).await;
        run.references = resolved.references;
        run.notices = resolved.notices;
        run
    }

    /// Analyze raw references, keyed by the index name each reference yields.
    pub async fn analyze_references<R: AsRef<str>>(
        &self,
        normalizer: &NameNormalizer,
        references: &[R],
    ) -> AnalysisRun {
        self.analyze_references_with(normalizer, references, |_| {})
            .await
    }

    /// [`Analyzer::analyze_references`] with a callback invoked as each fetch
    /// completes.
    pub async fn analyze_references_with<R, P>(
        &self,
        normalizer: &NameNormalizer,
        references: &[R],
        on_fetched: P,
    ) -> AnalysisRun
    where
        R: AsRef<str>,
        P: FnMut(&IndexTarget),
    {
        let targets = references
            .iter()
            .map(|reference| IndexTarget {
                name: normalizer.reference_name(reference.as_ref()),
                reference: reference.as_ref().to_string(),
            })
            .collect();

        self.analyze_targets_with(targets, on_fetched).await
    }

    /// Fetch every target and aggregate the successes in target order.
    pub async fn analyze_targets(&self, targets: Vec<IndexTarget>) -> AnalysisRun {
        self.analyze_targets_with(targets, |_| {}).await
    }

    /// [`Analyzer::analyze_targets`] with a callback invoked as each fetch
    /// completes.
    pub async fn analyze_targets_with<P>(
        &self,
        targets: Vec<IndexTarget>,
        mut on_fetched: P,
    ) -> AnalysisRun
    where
        P: FnMut(&IndexTarget),
    {
        let source = &self.source;
        let outcomes: Vec<_> = stream::iter(targets)
            .map(|target| async move {
                let result = source.fetch_constituents(&target.reference).await;
                (target, result)
            })
            .buffered(self.concurrency)
            .inspect(|(target, _)| on_fetched(target))
            .collect()
            .await;

        let mut run = AnalysisRun::default();
        let mut aggregator = OverlapAggregator::new();

        for (target, result) in outcomes {
            match result {
                Ok(symbols) => {
                    info!(
                        index = %target.name,
                        constituents = symbols.len(),
                        "loaded constituents"
                    );
                    run.loaded.push(LoadedIndex {
                        name: target.name.clone(),
                        reference: target.reference,
                        constituents: symbols.len(),
                    });
                    aggregator.add(target.name, symbols);
                }
                Err(e) => {
                    warn!(
                        index = %target.name,
                        reference = %target.reference,
                        error = %e,
                        "skipping index"
                    );
                    run.failures.push(FetchFailure::new(target, &e));
                }
            }
        }

        run.overlap = aggregator.finish();
        run
    }
}
