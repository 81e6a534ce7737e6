#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/overlap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod ranking;
pub mod report;

pub use export::{ExportError, ExportFormat, export_to_file, write_report};
pub use ranking::{RankedEntry, rank_all, rank_overlaps};
pub use report::{OverlapReport, ReportBuilder};
