//! Fetch configuration shared by the upstream adapters.

use tracing::warn;

/// Public page whose first table lists the index constituents.
pub const DEFAULT_CATALOG_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// Per-request network timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const CATALOG_URL_ENV: &str = "SECTORSCOPE_CATALOG_URL";
const TIMEOUT_ENV: &str = "SECTORSCOPE_TIMEOUT_MS";

/// Network settings for the constituent and time-series sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub catalog_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            catalog_url: String::from(DEFAULT_CATALOG_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: format!("sectorscope/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `SECTORSCOPE_CATALOG_URL` and `SECTORSCOPE_TIMEOUT_MS`.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(CATALOG_URL_ENV).filter(|value| !value.trim().is_empty()) {
            config.catalog_url = url.trim().to_owned();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => config.timeout_ms = timeout_ms,
                _ => warn!(value = %raw, "ignoring invalid {TIMEOUT_ENV}"),
            }
        }

        config
    }

    pub fn with_catalog_url(mut self, catalog_url: impl Into<String>) -> Self {
        self.catalog_url = catalog_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
