//! Constituent files published by the index provider.

pub mod client;
pub mod constituents;
pub mod pacing;

pub use client::NiftyClient;
pub use constituents::{SYMBOL_COLUMN, parse_column, parse_symbols};
pub use pacing::{Pacer, PacingPermit};
