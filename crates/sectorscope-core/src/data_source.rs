//! Upstream source contracts and the structured source error.
//!
//! | Source | Method | Response | Description |
//! |--------|--------|----------|-------------|
//! | [`ConstituentSource`] | `constituents` | [`Constituents`] | Index constituent table |
//! | [`TimeSeriesSource`] | `daily_closes` | `Vec<PricePoint>` | Daily closing prices |
//! | [`TimeSeriesSource`] | `profile` | [`CompanyProfile`] | Descriptive company fields |
//!
//! Sources perform I/O only. Caching lives one layer up, in
//! [`ConstituentCatalog`](crate::ConstituentCatalog) and
//! [`CompanyTimeSeriesFetcher`](crate::CompanyTimeSeriesFetcher).

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{CompanyProfile, Constituents, Period, PricePoint, Symbol};

/// Boxed future returned by source methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Source error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Network failure, timeout or non-success status.
    Unavailable,
    /// The upstream document no longer has the expected structure.
    SchemaMismatch,
    /// The provider has no data for the requested symbol.
    UnknownSymbol,
    /// The caller asked for a period outside the fixed label set.
    InvalidPeriod,
    /// Payload could not be decoded.
    Internal,
}

/// Structured source error surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::SchemaMismatch, message)
    }

    pub fn unknown_symbol(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::UnknownSymbol, message)
    }

    pub fn invalid_period(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidPeriod, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether asking again on a later interaction may succeed.
    pub const fn retryable(&self) -> bool {
        matches!(self.kind, SourceErrorKind::Unavailable)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::SchemaMismatch => "source.schema_mismatch",
            SourceErrorKind::UnknownSymbol => "source.unknown_symbol",
            SourceErrorKind::InvalidPeriod => "source.invalid_period",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Source of the index constituent table.
///
/// Implementations must be `Send + Sync`; the catalog shares them across tasks.
pub trait ConstituentSource: Send + Sync {
    /// Fetches and projects the constituent table.
    ///
    /// # Errors
    ///
    /// - [`SourceErrorKind::Unavailable`] when the document cannot be retrieved
    /// - [`SourceErrorKind::SchemaMismatch`] when the expected columns are absent
    fn constituents<'a>(&'a self) -> SourceFuture<'a, Constituents>;
}

/// Source of daily price history and company profiles.
pub trait TimeSeriesSource: Send + Sync {
    /// Fetches one closing price per trading day over `period`, dividends and
    /// splits excluded.
    ///
    /// # Errors
    ///
    /// - [`SourceErrorKind::Unavailable`] on transport failure
    /// - [`SourceErrorKind::UnknownSymbol`] when the provider has no such symbol
    fn daily_closes<'a>(
        &'a self,
        symbol: &'a Symbol,
        period: Period,
    ) -> SourceFuture<'a, Vec<PricePoint>>;

    /// Fetches the descriptive profile for `symbol`.
    ///
    /// # Errors
    ///
    /// Same classification as [`TimeSeriesSource::daily_closes`].
    fn profile<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, CompanyProfile>;
}
