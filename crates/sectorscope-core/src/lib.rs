//! # Sectorscope Core
//!
//! Data layer of the S&P 500 sector dashboard.
//!
//! ## Overview
//!
//! - **Constituent catalog**: scrapes the index constituent table once per
//!   process and serves sector/sub-industry breakdowns from memory
//! - **Time-series fetcher**: daily closing prices and a company profile per
//!   `(symbol, period)` pair, fetched at most once per pair
//! - **Structured errors** classifying every upstream failure
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Wikipedia and Yahoo upstream adapters |
//! | [`cache`] | Keyed single-flight memo cache |
//! | [`catalog`] | Memoized constituent catalog |
//! | [`config`] | Fetch configuration (URL, timeout, user agent) |
//! | [`data_source`] | Source traits and [`SourceError`] |
//! | [`domain`] | Domain models |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`time_series`] | Memoized company history fetcher |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sectorscope_core::{
//!     CompanyTimeSeriesFetcher, ConstituentCatalog, FetchConfig, ReqwestHttpClient,
//!     WikipediaConstituentSource, YahooTimeSeriesSource,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FetchConfig::from_env();
//!     let http = Arc::new(ReqwestHttpClient::new(&config));
//!
//!     let catalog = ConstituentCatalog::new(Arc::new(WikipediaConstituentSource::new(
//!         http.clone(),
//!         &config,
//!     )));
//!     for entry in catalog.load().await?.sector_histogram().entries() {
//!         println!("{}: {}", entry.name, entry.count);
//!     }
//!
//!     let fetcher = CompanyTimeSeriesFetcher::new(Arc::new(YahooTimeSeriesSource::new(
//!         http, &config,
//!     )));
//!     let history = fetcher.fetch("MMM", "1 year").await?;
//!     println!("{} closes", history.prices.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use sectorscope_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::Unavailable => "try again later",
//!         SourceErrorKind::SchemaMismatch => "upstream layout changed",
//!         SourceErrorKind::UnknownSymbol => "no such company",
//!         SourceErrorKind::InvalidPeriod => "pick a listed period",
//!         SourceErrorKind::Internal => "unexpected payload",
//!     }
//! }
//! ```

pub mod adapters;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod time_series;

// Adapter implementations
pub use adapters::{WikipediaConstituentSource, YahooSession, YahooTimeSeriesSource};

// Caching
pub use cache::MemoCache;
pub use catalog::ConstituentCatalog;
pub use time_series::CompanyTimeSeriesFetcher;

// Configuration
pub use config::{FetchConfig, DEFAULT_CATALOG_URL, DEFAULT_TIMEOUT_MS};

// Source traits and errors
pub use data_source::{
    ConstituentSource, SourceError, SourceErrorKind, SourceFuture, TimeSeriesSource,
};

// Domain models
pub use domain::{
    CompanyHistory, CompanyProfile, CompanyRecord, Constituents, Histogram, HistogramEntry,
    Period, PricePoint, SectorHistogram, SubIndustryHistogram, Symbol,
};

// Error types
pub use error::ValidationError;

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient};
