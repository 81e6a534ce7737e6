//! Constituent source abstraction.

use crate::error::Result;
use std::future::Future;

/// Anything that can turn a reference into an ordered list of symbols.
pub trait ConstituentSource {
    /// Fetch and parse the constituent list published at `reference`.
    fn fetch_constituents(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}
