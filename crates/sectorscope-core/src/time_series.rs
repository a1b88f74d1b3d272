use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::MemoCache;
use crate::data_source::{SourceError, TimeSeriesSource};
use crate::{CompanyHistory, Period, Symbol};

/// Memoized daily price history and profile per `(symbol, period)` pair.
///
/// Each distinct pair is fetched at most once. Entries are independent: a
/// failed fetch for one pair leaves every other cached pair untouched.
#[derive(Clone)]
pub struct CompanyTimeSeriesFetcher {
    source: Arc<dyn TimeSeriesSource>,
    cache: MemoCache<(Symbol, Period), CompanyHistory, SourceError>,
}

impl CompanyTimeSeriesFetcher {
    pub fn new(source: Arc<dyn TimeSeriesSource>) -> Self {
        Self {
            source,
            cache: MemoCache::new(),
        }
    }

    /// Fetches history for a symbol and a human-readable period label.
    ///
    /// The label is checked before any network call.
    ///
    /// # Errors
    ///
    /// - `InvalidPeriod` when `period_label` is not one of the fixed labels
    /// - `UnknownSymbol` when `symbol` is not a well-formed ticker or the
    ///   provider has no data for it
    /// - `Unavailable` on transport failure
    pub async fn fetch(
        &self,
        symbol: &str,
        period_label: &str,
    ) -> Result<Arc<CompanyHistory>, SourceError> {
        let period = Period::from_str(period_label)
            .map_err(|error| SourceError::invalid_period(error.to_string()))?;
        let symbol = Symbol::parse(symbol)
            .map_err(|error| SourceError::unknown_symbol(format!("'{symbol}': {error}")))?;

        self.fetch_period(symbol, period).await
    }

    /// Typed variant of [`fetch`](CompanyTimeSeriesFetcher::fetch).
    pub async fn fetch_period(
        &self,
        symbol: Symbol,
        period: Period,
    ) -> Result<Arc<CompanyHistory>, SourceError> {
        let key = (symbol, period);
        if let Some(cached) = self.cache.get(&key).await {
            debug!(symbol = %key.0, period = %key.1, "time series cache hit");
            return Ok(cached);
        }

        let (symbol, period) = key.clone();
        self.cache
            .get_or_try_init(key, || async move {
                info!(%symbol, %period, code = period.lookback_code(), "fetching company history");
                let result = self.load(symbol.clone(), period).await;
                if let Err(error) = &result {
                    warn!(%symbol, %period, code = error.code(), %error, "company history fetch failed");
                }
                result
            })
            .await
    }

    async fn load(&self, symbol: Symbol, period: Period) -> Result<CompanyHistory, SourceError> {
        let prices = self.source.daily_closes(&symbol, period).await?;
        let profile = self.source.profile(&symbol).await?;
        Ok(CompanyHistory::new(symbol, period, prices, profile))
    }

    /// Returns the cached history for the pair without fetching.
    pub async fn cached(&self, symbol: &Symbol, period: Period) -> Option<Arc<CompanyHistory>> {
        self.cache.get(&(symbol.clone(), period)).await
    }

    /// Forgets one cached pair.
    pub async fn invalidate(&self, symbol: &Symbol, period: Period) {
        self.cache.invalidate(&(symbol.clone(), period)).await;
    }

    /// Forgets every cached pair.
    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    /// Number of cached `(symbol, period)` pairs.
    pub async fn cached_len(&self) -> usize {
        self.cache.len().await
    }
}
