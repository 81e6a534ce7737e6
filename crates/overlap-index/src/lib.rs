#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/overlap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod family;
pub mod name;
pub mod normalize;
pub mod overlap;

pub use family::{FragmentMatch, IndexFamily};
pub use name::IndexName;
pub use normalize::{
    CONSTITUENT_BASE, IndexSource, LISTING_BASE, NameNormalizer, Resolution, ResolvedIndex,
};
pub use overlap::{ConstituentList, OverlapAggregator, OverlapMap, SecuritySymbol, aggregate};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
