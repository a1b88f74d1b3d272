use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::MemoCache;
use crate::data_source::{ConstituentSource, SourceError};
use crate::Constituents;

/// Process-wide memoized view of the index constituent table.
///
/// The table is fetched at most once per catalog unless [`invalidate`] is
/// called; every later [`load`] returns the same shared sequence.
///
/// [`invalidate`]: ConstituentCatalog::invalidate
/// [`load`]: ConstituentCatalog::load
#[derive(Clone)]
pub struct ConstituentCatalog {
    source: Arc<dyn ConstituentSource>,
    cache: MemoCache<(), Constituents, SourceError>,
}

impl ConstituentCatalog {
    pub fn new(source: Arc<dyn ConstituentSource>) -> Self {
        Self {
            source,
            cache: MemoCache::new(),
        }
    }

    /// Returns the constituent table, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Propagates the source's `Unavailable` or `SchemaMismatch` error. A failed
    /// load is not cached.
    pub async fn load(&self) -> Result<Arc<Constituents>, SourceError> {
        if let Some(cached) = self.cache.get(&()).await {
            debug!(records = cached.len(), "constituent catalog cache hit");
            return Ok(cached);
        }

        self.cache
            .get_or_try_init((), || async {
                info!("fetching constituent table");
                match self.source.constituents().await {
                    Ok(constituents) => {
                        info!(records = constituents.len(), "constituent table loaded");
                        Ok(constituents)
                    }
                    Err(error) => {
                        warn!(code = error.code(), %error, "constituent table fetch failed");
                        Err(error)
                    }
                }
            })
            .await
    }

    pub async fn is_loaded(&self) -> bool {
        !self.cache.is_empty().await
    }

    /// Forgets the cached table; the next [`load`](ConstituentCatalog::load) refetches.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceFuture;
    use crate::{CompanyRecord, SourceErrorKind, Symbol};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl ConstituentSource for CountingSource {
        fn constituents<'a>(&'a self) -> SourceFuture<'a, Constituents> {
            Box::pin(async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_first && call == 0 {
                    return Err(SourceError::unavailable("connection reset"));
                }
                Ok(Constituents::new(vec![CompanyRecord {
                    symbol: Symbol::parse("MMM").expect("valid symbol"),
                    name: String::from("3M"),
                    sector: String::from("Industrials"),
                    sub_industry: String::from("Industrial Conglomerates"),
                    headquarters: String::from("Saint Paul, Minnesota"),
                    date_added: None,
                    founded: Some(String::from("1902")),
                }]))
            })
        }
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail_first: false,
        });
        let catalog = ConstituentCatalog::new(source.clone());

        let first = catalog.load().await.expect("load succeeds");
        let second = catalog.load().await.expect("load succeeds");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_retried_on_next_call() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail_first: true,
        });
        let catalog = ConstituentCatalog::new(source.clone());

        let error = catalog.load().await.expect_err("first load fails");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(!catalog.is_loaded().await);

        let loaded = catalog.load().await.expect("second load succeeds");
        assert_eq!(loaded.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_triggers_refetch() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail_first: false,
        });
        let catalog = ConstituentCatalog::new(source.clone());

        catalog.load().await.expect("load succeeds");
        catalog.invalidate().await;
        catalog.load().await.expect("load succeeds");

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
