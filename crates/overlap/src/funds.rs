//! Fund table: which index each fund tracks.
//!
//! The table maps a fund's display name to the locator of its tracked index's
//! constituent file. Funds that do not track an index (actively managed
//! funds) are listed with no locator so they can be reported rather than
//! silently dropped.

use indexmap::IndexMap;
use overlap_index::{NameNormalizer, ResolvedIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Funds of the built-in table, with their locators.
const BUILTIN_FUNDS: &[(&str, Option<&str>)] = &[
    (
        "Bandhan Nifty Alpha 50 Index Fund Direct Growth",
        Some("ind_nifty_Alpha_Index"),
    ),
    (
        "Edelweiss Nifty Large Mid Cap 250 Index Fund Direct Growth",
        Some("niftylargemidcap250"),
    ),
    (
        "Mirae Asset Nifty MidSmallcap400 Momentum Quality 100 ETF FoF Dir Growth",
        Some("niftymidsmallcap400momentumquality100"),
    ),
    (
        "Mirae Asset Nifty Smallcap 250 Momentum Quality 100 ETF FoF Dir Growth",
        Some("niftysmallcap250momentumquality100"),
    ),
    (
        "Mirae Asset Nifty200 Alpha 30 ETF Fund of Fund Direct Growth",
        Some("nifty200alpha30"),
    ),
    (
        "Motilal Oswal Nifty 200 Momentum 30 Index Fund Direct Growth",
        Some("nifty200momentum30"),
    ),
    (
        "Motilal Oswal Nifty India Defence Index Fund Direct Growth",
        Some("ind_niftyindiadefence_list"),
    ),
    (
        "Nippon India Nifty 50 Value 20 Index Fund Direct Growth",
        Some("nifty50value20"),
    ),
    (
        "Nippon India Nifty 500 Momentum 50 Index Fund Direct Growth",
        Some("nifty500momentum50"),
    ),
    ("Parag Parikh Flexi Cap Direct Growth", None),
    ("Quant Flexi Cap Fund Direct Growth", None),
    (
        "Tata Nifty Midcap 150 Momentum 50 Index Fund Direct Growth",
        Some("ind_niftymidcap150momentum50_list"),
    ),
    ("Tata Nifty Realty Index Fund Direct Growth", Some("niftyrealty")),
    (
        "UTI Nifty 500 Value 50 Index Fund Direct Growth",
        Some("nifty500value50"),
    ),
];

/// Fund selection analyzed when none is configured.
pub const DEFAULT_SELECTION: &[&str] = &[
    "Motilal Oswal Nifty India Defence Index Fund Direct Growth",
    "Bandhan Nifty Alpha 50 Index Fund Direct Growth",
    "Edelweiss Nifty Large Mid Cap 250 Index Fund Direct Growth",
    "Mirae Asset Nifty MidSmallcap400 Momentum Quality 100 ETF FoF Dir Growth",
    "Mirae Asset Nifty Smallcap 250 Momentum Quality 100 ETF FoF Dir Growth",
    "Mirae Asset Nifty200 Alpha 30 ETF Fund of Fund Direct Growth",
    "Motilal Oswal Nifty 200 Momentum 30 Index Fund Direct Growth",
    "Nippon India Nifty 50 Value 20 Index Fund Direct Growth",
    "Nippon India Nifty 500 Momentum 50 Index Fund Direct Growth",
    "Parag Parikh Flexi Cap Direct Growth",
    "Quant Flexi Cap Fund Direct Growth",
    "Tata Nifty Midcap 150 Momentum 50 Index Fund Direct Growth",
    "Tata Nifty Realty Index Fund Direct Growth",
    "UTI Nifty 500 Value 50 Index Fund Direct Growth",
];

/// Outcome of looking a fund up in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundLookup<'a> {
    /// The fund tracks the index at this locator.
    Tracked(&'a str),
    /// The fund is listed but tracks no index.
    Untracked,
    /// The fund is not in the table.
    Unknown,
}

/// Immutable mapping from fund name to index locator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundTable {
    entries: IndexMap<String, Option<String>>,
}

impl FundTable {
    /// Table with the built-in funds.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_FUNDS
                .iter()
                .map(|(fund, locator)| (fund.to_string(), locator.map(str::to_string))),
        )
    }

    /// Table with exactly the given entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// This table with `overrides` added; an override replaces an existing
    /// entry of the same fund.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        self.entries.extend(overrides);
        self
    }

    /// Look a fund up. A blank locator counts as no locator.
    pub fn lookup(&self, fund: &str) -> FundLookup<'_> {
        match self.entries.get(fund) {
            Some(Some(locator)) if !locator.trim().is_empty() => FundLookup::Tracked(locator),
            Some(_) => FundLookup::Untracked,
            None => FundLookup::Unknown,
        }
    }

    /// Locator of the fund's tracked index, if any.
    pub fn resolve(&self, fund: &str) -> Option<&str> {
        match self.lookup(fund) {
            FundLookup::Tracked(locator) => Some(locator),
            FundLookup::Untracked | FundLookup::Unknown => None,
        }
    }

    /// Number of funds listed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table lists no fund.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate funds and their locators in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.entries
            .iter()
            .map(|(fund, locator)| (fund.as_str(), locator.as_deref()))
    }

    /// Resolve every fund of `funds`, in order, into the reference to fetch.
    ///
    /// Duplicates are resolved independently. Funds without a locator produce
    /// a notice and no reference.
    pub fn resolve_references<S: AsRef<str>>(
        &self,
        normalizer: &NameNormalizer,
        funds: &[S],
    ) -> ResolvedFunds {
        let mut resolved = ResolvedFunds::default();

        for fund in funds.iter().map(|fund| fund.as_ref()) {
            let locator = match self.lookup(fund) {
                FundLookup::Tracked(locator) => locator,
                FundLookup::Untracked => {
                    info!(fund, "fund does not track an index");
                    resolved.notices.push(Notice::UnresolvedFund {
                        fund: fund.to_string(),
                        reason: UnresolvedReason::Untracked,
                    });
                    continue;
                }
                FundLookup::Unknown => {
                    info!(fund, "fund is not in the fund table");
                    resolved.notices.push(Notice::UnresolvedFund {
                        fund: fund.to_string(),
                        reason: UnresolvedReason::Unknown,
                    });
                    continue;
                }
            };

            let index = normalizer.resolve(locator);
            if index.resolution.is_fallback() {
                warn!(fund, locator, "no index pattern matched, using locator as index name");
                resolved.notices.push(Notice::NormalizationFallback {
                    fund: fund.to_string(),
                    locator: locator.to_string(),
                });
            }

            resolved.references.push(FundReference {
                fund: fund.to_string(),
                locator: locator.to_string(),
                index,
            });
        }

        resolved
    }
}

/// A tracked fund with its resolved index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundReference {
    /// Fund display name.
    pub fund: String,

    /// Locator from the fund table.
    pub locator: String,

    /// Index name and reference derived from the locator.
    pub index: ResolvedIndex,
}

/// Why a fund has no locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// Listed without a locator (not an index fund).
    Untracked,
    /// Not listed in the table.
    Unknown,
}

/// Informational outcome for a fund that did not resolve cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Notice {
    /// No locator is known; the fund is left out of the analysis.
    UnresolvedFund {
        /// Fund display name.
        fund: String,
        /// Why no locator is known.
        reason: UnresolvedReason,
    },

    /// The locator matched no pattern; its raw text is used as index name.
    NormalizationFallback {
        /// Fund display name.
        fund: String,
        /// Locator that was used verbatim.
        locator: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedFund {
                fund,
                reason: UnresolvedReason::Untracked,
            } => write!(f, "No index information found for fund: {fund} (not an index fund)"),
            Self::UnresolvedFund {
                fund,
                reason: UnresolvedReason::Unknown,
            } => write!(f, "No index information found for fund: {fund} (not in fund table)"),
            Self::NormalizationFallback { fund, locator } => {
                write!(f, "Unrecognized index locator '{locator}' for fund: {fund}")
            }
        }
    }
}

/// References and notices produced by [`FundTable::resolve_references`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFunds {
    /// One reference per tracked fund, in selection order.
    pub references: Vec<FundReference>,

    /// Notices for funds that did not resolve cleanly, in selection order.
    pub notices: Vec<Notice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlap_index::Resolution;
    use rstest::rstest;

    #[test]
    fn test_builtin_table() {
        let table = FundTable::builtin();
        assert_eq!(table.len(), 14);
        assert_eq!(
            table.resolve("Tata Nifty Realty Index Fund Direct Growth"),
            Some("niftyrealty")
        );
        assert_eq!(
            table.lookup("Quant Flexi Cap Fund Direct Growth"),
            FundLookup::Untracked
        );
        assert_eq!(table.lookup("Some Other Fund"), FundLookup::Unknown);
    }

    #[test]
    fn test_default_selection_is_in_builtin_table() {
        let table = FundTable::builtin();
        for fund in DEFAULT_SELECTION {
            assert_ne!(table.lookup(fund), FundLookup::Unknown, "{fund}");
        }
    }

    #[test]
    fn test_every_builtin_locator_resolves_without_fallback() {
        let normalizer = NameNormalizer::default();
        for (fund, locator) in FundTable::builtin().iter() {
            if let Some(locator) = locator {
                let resolved = normalizer.resolve(locator);
                assert_ne!(resolved.resolution, Resolution::Fallback, "{fund}");
                assert!(!resolved.name.as_str().is_empty(), "{fund}");
            }
        }
    }

    #[test]
    fn test_builtin_references() {
        const BASE: &str = "https://www.niftyindices.com/IndexConstituent/";
        let expected = [
            ("Bandhan Nifty Alpha 50 Index Fund Direct Growth", "alpha_index", "ind_nifty_Alpha_Index.csv"),
            ("Edelweiss Nifty Large Mid Cap 250 Index Fund Direct Growth", "largemidcap250", "ind_niftylargemidcap250list.csv"),
            (
                "Mirae Asset Nifty MidSmallcap400 Momentum Quality 100 ETF FoF Dir Growth",
                "midsmallcap400momentumquality100",
                "ind_niftymidsmallcap400momentumquality100list.csv",
            ),
            (
                "Mirae Asset Nifty Smallcap 250 Momentum Quality 100 ETF FoF Dir Growth",
                "smallcap250momentumquality100",
                "ind_niftysmallcap250momentumquality100list.csv",
            ),
            ("Mirae Asset Nifty200 Alpha 30 ETF Fund of Fund Direct Growth", "200alpha30", "ind_nifty200alpha30list.csv"),
            ("Motilal Oswal Nifty 200 Momentum 30 Index Fund Direct Growth", "200momentum30", "ind_nifty200momentum30list.csv"),
            ("Motilal Oswal Nifty India Defence Index Fund Direct Growth", "indiadefence", "ind_niftyindiadefence_list.csv"),
            ("Nippon India Nifty 50 Value 20 Index Fund Direct Growth", "50value20", "ind_nifty50value20list.csv"),
            ("Nippon India Nifty 500 Momentum 50 Index Fund Direct Growth", "500momentum50", "ind_nifty500momentum50list.csv"),
            (
                "Tata Nifty Midcap 150 Momentum 50 Index Fund Direct Growth",
                "midcap150momentum50",
                "ind_niftymidcap150momentum50_list.csv",
            ),
            ("Tata Nifty Realty Index Fund Direct Growth", "realty", "niftyrealty.csv"),
            ("UTI Nifty 500 Value 50 Index Fund Direct Growth", "500value50", "ind_nifty500value50list.csv"),
        ];

        let resolved = FundTable::builtin().resolve_references(&NameNormalizer::default(), DEFAULT_SELECTION);
        assert_eq!(resolved.references.len(), expected.len());

        for (fund, name, file) in expected {
            let reference = resolved
                .references
                .iter()
                .find(|reference| reference.fund == fund)
                .unwrap_or_else(|| panic!("no reference for {fund}"));
            assert_eq!(reference.index.name, name, "{fund}");
            assert_eq!(reference.index.reference, format!("{BASE}{file}"), "{fund}");
        }
    }

    #[test]
    fn test_blank_locator_is_untracked() {
        let table = FundTable::from_entries([("Blank Fund".to_string(), Some("  ".to_string()))]);
        assert_eq!(table.lookup("Blank Fund"), FundLookup::Untracked);
        assert_eq!(table.resolve("Blank Fund"), None);
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let table = FundTable::builtin().with_overrides([
            (
                "Quant Flexi Cap Fund Direct Growth".to_string(),
                Some("nifty500".to_string()),
            ),
            ("My Nifty Bank Fund".to_string(), Some("niftybank".to_string())),
        ]);

        assert_eq!(table.len(), 15);
        assert_eq!(
            table.resolve("Quant Flexi Cap Fund Direct Growth"),
            Some("nifty500")
        );
        assert_eq!(table.resolve("My Nifty Bank Fund"), Some("niftybank"));
    }

    #[test]
    fn test_unknown_fund_does_not_affect_others() {
        let table = FundTable::builtin();
        let normalizer = NameNormalizer::default();

        let clean = table.resolve_references(
            &normalizer,
            &["Tata Nifty Realty Index Fund Direct Growth"],
        );
        let with_unknown = table.resolve_references(
            &normalizer,
            &[
                "Not A Real Fund",
                "Tata Nifty Realty Index Fund Direct Growth",
            ],
        );

        assert_eq!(with_unknown.references, clean.references);
        assert_eq!(
            with_unknown.notices,
            [Notice::UnresolvedFund {
                fund: "Not A Real Fund".to_string(),
                reason: UnresolvedReason::Unknown,
            }]
        );
    }

    #[test]
    fn test_duplicates_resolved_independently() {
        let table = FundTable::builtin();
        let fund = "Mirae Asset Nifty200 Alpha 30 ETF Fund of Fund Direct Growth";

        let resolved = table.resolve_references(&NameNormalizer::default(), &[fund, fund]);
        assert_eq!(resolved.references.len(), 2);
        assert_eq!(resolved.references[0], resolved.references[1]);
        assert_eq!(
            resolved.references[0].index.reference,
            "https://www.niftyindices.com/IndexConstituent/ind_nifty200alpha30list.csv"
        );
    }

    #[test]
    fn test_fallback_locator_is_noticed() {
        let table =
            FundTable::from_entries([("Odd Fund".to_string(), Some("Odd Locator".to_string()))]);

        let resolved = table.resolve_references(&NameNormalizer::default(), &["Odd Fund"]);
        assert_eq!(resolved.references.len(), 1);
        assert_eq!(resolved.references[0].index.name, "Odd Locator");
        assert!(matches!(
            resolved.notices[..],
            [Notice::NormalizationFallback { .. }]
        ));
    }

    #[rstest]
    #[case::untracked(
        Notice::UnresolvedFund {
            fund: "Parag Parikh Flexi Cap Direct Growth".to_string(),
            reason: UnresolvedReason::Untracked,
        },
        "No index information found for fund: Parag Parikh Flexi Cap Direct Growth (not an index fund)"
    )]
    #[case::unknown(
        Notice::UnresolvedFund {
            fund: "Some Fund".to_string(),
            reason: UnresolvedReason::Unknown,
        },
        "No index information found for fund: Some Fund (not in fund table)"
    )]
    #[case::fallback(
        Notice::NormalizationFallback {
            fund: "Odd Fund".to_string(),
            locator: "Odd Locator".to_string(),
        },
        "Unrecognized index locator 'Odd Locator' for fund: Odd Fund"
    )]
    fn test_notice_wording(#[case] notice: Notice, #[case] expected: &str) {
        assert_eq!(notice.to_string(), expected);
    }
}
