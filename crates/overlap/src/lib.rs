#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/overlap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod funds;

// Re-export main types from sub-crates
pub use overlap_data as data;
pub use overlap_index as index;
pub use overlap_output as output;

pub use analysis::{AnalysisRun, Analyzer, FetchFailure, IndexTarget, LoadedIndex};
pub use config::{AnalysisConfig, FetchConfig};
pub use error::{ConfigError, Result};
pub use funds::{
    DEFAULT_SELECTION, FundLookup, FundReference, FundTable, Notice,
    ResolvedFunds, UnresolvedReason,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
