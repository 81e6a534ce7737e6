//! Configuration loading and command-line overrides.
//!
//! An explicit `--config` path must exist. Without one, the platform config
//! file is used when present:
//! - Linux: `~/.config/overlap/config.json`
//! - macOS: `~/Library/Application Support/overlap/config.json`
//! - Windows: `%APPDATA%\overlap\config.json`

use overlap::{AnalysisConfig, ConfigError, FetchConfig};
use overlap_data::{DataError, NiftyClient};
use std::path::Path;
use tracing::debug;

/// Fetch settings given on the command line; each one replaces the
/// configured value.
#[derive(Debug, Clone, Default)]
pub(crate) struct FetchOverrides {
    pub(crate) concurrency: Option<usize>,
    pub(crate) delay_ms: Option<u64>,
    pub(crate) timeout_secs: Option<u64>,
}

impl FetchOverrides {
    /// Apply to `config` and re-validate it.
    pub(crate) fn apply(&self, config: &mut AnalysisConfig) -> Result<(), ConfigError> {
        if let Some(concurrency) = self.concurrency {
            config.fetch.concurrency = concurrency;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.fetch.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.fetch.timeout_secs = timeout_secs;
        }
        config.validate()
    }
}

/// Load the configuration from `path`, or from the default location.
pub(crate) fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    match path {
        Some(path) => AnalysisConfig::load(path),
        None => {
            let config = AnalysisConfig::load_or_default()?;
            debug!(funds = config.funds.len(), "using default configuration location");
            Ok(config)
        }
    }
}

/// HTTP client honoring the fetch settings.
pub(crate) fn build_client(fetch: &FetchConfig) -> Result<NiftyClient, DataError> {
    NiftyClient::with_settings(&fetch.user_agent, fetch.timeout(), fetch.delay())
}
