//! Overlap report assembly and text rendering.

use crate::ranking::{RankedEntry, rank_all, rank_overlaps};
use chrono::{DateTime, Utc};
use overlap_index::{IndexName, OverlapMap};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Heading of the overlap listing.
const HEADING: &str = "Portfolio Overlap Analysis:";

/// Message printed when no symbol is held by more than one index.
const NO_OVERLAP: &str = "No overlapping stocks found.";

/// Result of one overlap analysis, ready for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapReport {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Indices whose constituents were aggregated, in processing order.
    pub indices: Vec<IndexName>,

    /// Ranked symbols, most widely held first. Only symbols held by more
    /// than one index unless built with [`ReportBuilder::every_symbol`].
    pub entries: Vec<RankedEntry>,

    /// Informational notes about funds and indices that did not contribute.
    pub notices: Vec<String>,
}

impl OverlapReport {
    /// Create a report from an overlap map with no indices or notices listed.
    pub fn new(map: &OverlapMap) -> Self {
        ReportBuilder::new().build(map)
    }

    /// Whether no overlapping symbol was found.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|entry| entry.count < 2)
    }

    /// Render the report as plain text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        if !self.indices.is_empty() {
            let names: Vec<&str> = self.indices.iter().map(IndexName::as_str).collect();
            let _ = writeln!(
                out,
                "Indices analyzed ({}): {}",
                names.len(),
                names.join(", ")
            );
        }

        for notice in &self.notices {
            let _ = writeln!(out, "note: {notice}");
        }

        if !out.is_empty() {
            out.push('\n');
        }

        if self.entries.is_empty() {
            let _ = writeln!(out, "{NO_OVERLAP}");
        } else {
            let _ = writeln!(out, "{HEADING}");
            for entry in &self.entries {
                let _ = writeln!(out, "{entry}");
            }
        }

        out
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    indices: Vec<IndexName>,
    notices: Vec<String>,
    every_symbol: bool,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indices that were aggregated.
    pub fn indices(mut self, indices: Vec<IndexName>) -> Self {
        self.indices = indices;
        self
    }

    /// Add an informational note.
    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        self.notices.push(notice.into());
        self
    }

    /// Add several informational notes.
    pub fn notices<I, S>(mut self, notices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notices.extend(notices.into_iter().map(Into::into));
        self
    }

    /// List every symbol, including those held by a single index.
    pub fn every_symbol(mut self, every_symbol: bool) -> Self {
        self.every_symbol = every_symbol;
        self
    }

    /// Rank `map` and build the report.
    pub fn build(self, map: &OverlapMap) -> OverlapReport {
        let entries = if self.every_symbol {
            rank_all(map)
        } else {
            rank_overlaps(map)
        };

        OverlapReport {
            generated_at: Utc::now(),
            indices: self.indices,
            entries,
            notices: self.notices,
        }
    }
}
