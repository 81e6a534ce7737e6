//! Analysis configuration.
//!
//! Configuration is JSON. Every field is optional; missing fields take their
//! defaults, which reproduce the built-in fund selection against the public
//! index publisher.
//!
//! ```json
//! {
//!   "funds": ["Tata Nifty Realty Index Fund Direct Growth", "My Bank Fund"],
//!   "fund_table": { "My Bank Fund": "niftybank" },
//!   "fetch": { "delay_ms": 1500, "concurrency": 2 }
//! }
//! ```

use crate::error::{ConfigError, Result};
use crate::funds::{DEFAULT_SELECTION, FundTable};
use indexmap::IndexMap;
use overlap_data::niftyindices::client::{DEFAULT_DELAY, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use overlap_index::{IndexSource, NameNormalizer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Name of the configuration file inside the config directory.
const CONFIG_FILE: &str = "config.json";

/// Settings for retrieving constituent files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with each request.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Pause after each request, in milliseconds.
    pub delay_ms: u64,

    /// Maximum number of requests in flight.
    pub concurrency: usize,
}

impl FetchConfig {
    /// Per-request timeout.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Pause between requests.
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            concurrency: 1,
        }
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Funds to analyze, in order. Duplicates are analyzed independently.
    pub funds: Vec<String>,

    /// Fund table entries added to, or replacing, the built-in table.
    /// A `null` locator marks a fund that tracks no index.
    pub fund_table: IndexMap<String, Option<String>>,

    /// Publisher base URLs.
    pub source: IndexSource,

    /// Retrieval settings.
    pub fetch: FetchConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            funds: DEFAULT_SELECTION.iter().map(|fund| fund.to_string()).collect(),
            fund_table: IndexMap::new(),
            source: IndexSource::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Self::from_json(&json)
    }

    /// Load the file at [`AnalysisConfig::default_path`] if it exists, else
    /// return the defaults.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Platform config location.
    ///
    /// - Linux: `~/.config/overlap/config.json`
    /// - macOS: `~/Library/Application Support/overlap/config.json`
    /// - Windows: `%APPDATA%\overlap\config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("overlap").join(CONFIG_FILE))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.source.listing_base.is_empty() || self.source.constituent_base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "source",
                reason: "base URLs must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Built-in fund table with this configuration's entries applied.
    pub fn fund_table(&self) -> FundTable {
        FundTable::builtin().with_overrides(self.fund_table.clone())
    }

    /// Normalizer for this configuration's publisher bases.
    pub fn normalizer(&self) -> NameNormalizer {
        NameNormalizer::new(self.source.clone())
    }
}
