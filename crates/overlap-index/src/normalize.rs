//! Locator and reference normalization.
//!
//! Funds point at their tracked index through a *locator*, which comes in two
//! shapes: a short index-code fragment (`nifty200alpha30`) that is expanded
//! into a listing URL, or a path fragment (`ind_niftyindiadefence_list`)
//! appended to the constituent base URL. [`NameNormalizer::resolve`] turns
//! either into an [`IndexName`] and the reference URL to fetch.

use crate::family::{FragmentMatch, IndexFamily};
use crate::name::IndexName;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Base of listing URLs built from recognized fragments.
pub const LISTING_BASE: &str = "https://www.niftyindices.com/IndexConstituent/ind_nifty";

/// Base of constituent URLs built from path fragments.
pub const CONSTITUENT_BASE: &str = "https://www.niftyindices.com/IndexConstituent/";

/// Suffix of listing URLs.
const LISTING_SUFFIX: &str = "list.csv";

/// Suffix of constituent files.
const CSV_SUFFIX: &str = ".csv";

/// Sub-tokens that carry no index identity in a path fragment.
const PATH_NOISE: [&str; 2] = ["ind_", "list"];

/// Prefixes a path fragment is recognized by.
const PATH_PREFIXES: [&str; 2] = ["ind_", "nifty"];

/// Prefix of locators that already name a constituent file.
const CONSTITUENT_PREFIX: &str = "ind_";

/// Base URLs constituent files are published under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSource {
    /// Base for `{listing_base}{fragment}list.csv` references.
    pub listing_base: String,

    /// Base for `{constituent_base}{path}.csv` references.
    pub constituent_base: String,
}

impl Default for IndexSource {
    fn default() -> Self {
        Self {
            listing_base: LISTING_BASE.to_string(),
            constituent_base: CONSTITUENT_BASE.to_string(),
        }
    }
}

/// Which pass produced an index name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "pass", content = "family")]
pub enum Resolution {
    /// A whitelisted fragment was found in the locator.
    Fragment(IndexFamily),

    /// The locator was treated as a full path fragment.
    FullPath,

    /// Nothing matched; the raw locator is used as the name.
    Fallback,
}

impl Resolution {
    /// Whether the name is a degraded fallback.
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fragment(family) => write!(f, "{family} fragment"),
            Self::FullPath => write!(f, "full path"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// An index name together with the reference its constituents are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIndex {
    /// Aggregation key.
    pub name: IndexName,

    /// URL of the constituent file.
    pub reference: String,

    /// Pass that produced `name`.
    pub resolution: Resolution,
}

/// Extracts canonical index names from locators and references.
///
/// Both operations are pure: the same input always yields the same output,
/// and input that matches nothing comes back unchanged as the name.
#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    source: IndexSource,
}

impl NameNormalizer {
    /// Create a normalizer for the given publisher bases.
    pub const fn new(source: IndexSource) -> Self {
        Self { source }
    }

    /// Publisher bases in use.
    pub const fn source(&self) -> &IndexSource {
        &self.source
    }

    /// Resolve a locator into its index name and reference URL.
    ///
    /// The fragment pass is tried first, then the full-path pass. A locator
    /// neither pass recognizes keeps its raw text as the name, and its
    /// reference is built the full-path way.
    ///
    /// Locators starting with `ind_` already name a constituent file and skip
    /// the fragment pass, so their reference keeps the locator verbatim.
    pub fn resolve(&self, locator: &str) -> ResolvedIndex {
        let fragment = if is_constituent_path(locator) {
            None
        } else {
            IndexFamily::recognize(locator)
        };

        if let Some(FragmentMatch { family, fragment }) = fragment {
            let reference = format!("{}{}{}", self.source.listing_base, fragment, LISTING_SUFFIX);
            debug!(locator, %family, %reference, "recognized index fragment");
            return ResolvedIndex {
                name: IndexName::new(fragment),
                reference,
                resolution: Resolution::Fragment(family),
            };
        }

        let reference = self.path_reference(locator);
        match full_path_name(locator) {
            Some(name) => ResolvedIndex {
                name: IndexName::new(name),
                reference,
                resolution: Resolution::FullPath,
            },
            None => ResolvedIndex {
                name: IndexName::new(locator),
                reference,
                resolution: Resolution::Fallback,
            },
        }
    }

    /// The index name a locator aggregates under.
    pub fn index_name(&self, locator: &str) -> IndexName {
        self.resolve(locator).name
    }

    /// Recover an index name from an already-built reference URL.
    ///
    /// Listing references (`{listing_base}{digits}list.csv`) yield
    /// `nifty{digits}`; constituent references (`{constituent_base}{path}.csv`)
    /// yield the path with its `ind_` and `list` sub-tokens removed. Anything
    /// else is returned unchanged.
    pub fn reference_name(&self, reference: &str) -> IndexName {
        let listing_digits = reference
            .strip_prefix(self.source.listing_base.as_str())
            .and_then(|rest| rest.strip_suffix(LISTING_SUFFIX))
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()));
        if let Some(digits) = listing_digits {
            return IndexName::new(format!("nifty{digits}"));
        }

        let constituent_path = reference
            .strip_prefix(self.source.constituent_base.as_str())
            .and_then(|rest| rest.strip_suffix(CSV_SUFFIX));
        if let Some(path) = constituent_path {
            let name = strip_noise(&path.to_lowercase());
            if !name.is_empty() {
                return IndexName::new(name);
            }
        }

        IndexName::new(reference)
    }

    fn path_reference(&self, locator: &str) -> String {
        if locator.to_ascii_lowercase().ends_with(CSV_SUFFIX) {
            format!("{}{}", self.source.constituent_base, locator)
        } else {
            format!("{}{}{}", self.source.constituent_base, locator, CSV_SUFFIX)
        }
    }
}

fn strip_noise(text: &str) -> String {
    PATH_NOISE
        .iter()
        .fold(text.to_string(), |acc, token| acc.replace(token, ""))
}

fn is_constituent_path(locator: &str) -> bool {
    locator
        .get(..CONSTITUENT_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CONSTITUENT_PREFIX))
}

fn is_path_fragment(locator: &str) -> bool {
    let folded = locator.to_ascii_lowercase();
    !locator.is_empty()
        && locator
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && PATH_PREFIXES.iter().any(|prefix| folded.starts_with(prefix))
}

fn full_path_name(locator: &str) -> Option<String> {
    if !is_path_fragment(locator) {
        return None;
    }

    let folded = locator.to_ascii_lowercase();
    let body = folded.strip_suffix(CSV_SUFFIX).unwrap_or(&folded);
    let body = strip_noise(body);
    let body = body.strip_prefix("nifty").unwrap_or(&body);
    let name = body.trim_matches(|c| matches!(c, '_' | '-' | '.'));

    (!name.is_empty()).then(|| name.to_string())
}
