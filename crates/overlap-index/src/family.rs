//! Index families and the fragment vocabulary locators are recognized against.
//!
//! A short locator such as `nifty200alpha30` names its index by a fragment
//! following the `nifty` brand. The set of fragments the publisher uses is a
//! closed vocabulary, grouped here into families. Each family owns the rule
//! that matches it; recognition tries every family and keeps the longest
//! fragment, so a strategy index like `200alpha30` is never mistaken for the
//! broad `200` index it starts with.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Brand token that precedes every recognized fragment.
const BRAND: &str = "nifty";

/// Vocabulary group a locator fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexFamily {
    /// Broad market indices named by size (`50`, `100`, `200`, `500`).
    Broad,

    /// The "next" series (`next50`).
    NextSeries,

    /// Sector indices (`bank`, `it`).
    Sector,

    /// Market-cap segments (`midcap100`, `largemidcap250`, ...).
    CapSegment,

    /// Factor and strategy indices (`alpha50`, `200alpha30`, `500momentum50`, ...).
    Strategy,
}

impl IndexFamily {
    /// Every family, in the order they are tried.
    pub const ALL: [Self; 5] = [
        Self::Broad,
        Self::NextSeries,
        Self::Sector,
        Self::CapSegment,
        Self::Strategy,
    ];

    /// Returns the human readable family name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Broad => "broad",
            Self::NextSeries => "next series",
            Self::Sector => "sector",
            Self::CapSegment => "cap segment",
            Self::Strategy => "strategy",
        }
    }

    /// Enumerated vocabulary of this family.
    ///
    /// Words inside an entry are optional-space separated when matching, so
    /// `large mid cap 250` also matches `largemidcap250`. Families whose
    /// members follow a numeric rule return an empty slice.
    pub const fn vocabulary(&self) -> &'static [&'static str] {
        match self {
            Self::Broad | Self::NextSeries => &[],
            Self::Sector => &["bank", "it"],
            Self::CapSegment => &[
                "midcap 100",
                "midcap 150",
                "smallcap 100",
                "smallcap 250",
                "large mid cap 250",
                "mid small cap 400",
            ],
            Self::Strategy => &[
                "alpha 50",
                "200 alpha 30",
                "200 momentum 30",
                "500 momentum 50",
                "50 value 20",
                "500 value 50",
                "midcap 150 momentum 50",
                "smallcap 250 momentum quality 100",
                "mid small cap 400 momentum quality 100",
            ],
        }
    }

    /// Anchored regular expression source for this family.
    fn pattern(&self) -> String {
        let body = match self {
            Self::Broad => r"\d+".to_string(),
            Self::NextSeries => r"next ?\d+".to_string(),
            Self::Sector | Self::CapSegment | Self::Strategy => {
                let mut entries: Vec<String> = self
                    .vocabulary()
                    .iter()
                    .map(|entry| {
                        entry
                            .split_whitespace()
                            .map(regex::escape)
                            .collect::<Vec<_>>()
                            .join(" ?")
                    })
                    .collect();
                // Alternation is leftmost-first, so longer entries go first.
                entries.sort_by_key(|entry| std::cmp::Reverse(entry.len()));
                entries.join("|")
            }
        };
        // The brand may be separated from the fragment by one space.
        format!("^ ?(?:{body})")
    }

    /// Match this family at the start of `rest` (already case-folded).
    fn match_prefix<'a>(&self, rest: &'a str) -> Option<&'a str> {
        FAMILY_PATTERNS
            .iter()
            .find(|(family, _)| family == self)
            .and_then(|(_, re)| re.find(rest))
            .map(|m| m.as_str())
    }

    /// Recognize the fragment following the first `nifty` brand in `locator`
    /// that any family matches.
    ///
    /// Matching is case-insensitive. The returned fragment is case-folded with
    /// spaces removed. Ties between families of equal fragment length go to
    /// the family listed first in [`IndexFamily::ALL`].
    pub fn recognize(locator: &str) -> Option<FragmentMatch> {
        let folded = locator.to_lowercase();

        for (start, _) in folded.match_indices(BRAND) {
            let rest = &folded[start + BRAND.len()..];
            let mut best: Option<(Self, &str)> = None;

            for family in Self::ALL {
                if let Some(found) = family.match_prefix(rest) {
                    if best.is_none_or(|(_, current)| found.len() > current.len()) {
                        best = Some((family, found));
                    }
                }
            }

            if let Some((family, found)) = best {
                return Some(FragmentMatch {
                    family,
                    fragment: found.replace(' ', ""),
                });
            }
        }

        None
    }
}

impl fmt::Display for IndexFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fragment recognized in a locator, tagged with its family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentMatch {
    /// Family the fragment belongs to.
    pub family: IndexFamily,

    /// Case-folded fragment with spaces removed (e.g. `largemidcap250`).
    pub fragment: String,
}

static FAMILY_PATTERNS: Lazy<Vec<(IndexFamily, Regex)>> = Lazy::new(|| {
    IndexFamily::ALL
        .iter()
        .map(|family| {
            let re = Regex::new(&family.pattern()).expect("family pattern is a valid regex");
            (*family, re)
        })
        .collect()
});
