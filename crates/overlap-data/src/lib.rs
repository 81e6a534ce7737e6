#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/overlap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod niftyindices;
pub mod source;

pub use error::{DataError, FailureKind, Result};
pub use niftyindices::{NiftyClient, Pacer, PacingPermit, SYMBOL_COLUMN, parse_column, parse_symbols};
pub use source::ConstituentSource;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
