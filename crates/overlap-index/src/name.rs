//! Canonical index identifiers.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Canonical identifier for an index, used as the aggregation key.
///
/// Names produced by [`NameNormalizer`](crate::NameNormalizer) are case-folded
/// with internal spaces removed, so two spellings of the same index collapse
/// to one key. A name built directly with [`IndexName::new`] is kept verbatim;
/// that is how the normalizer degrades to the raw locator.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IndexName(String);

impl IndexName {
    /// Create an index name from an already-canonical string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for IndexName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for IndexName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for IndexName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
