//! Upstream adapters.
//!
//! | Adapter | Trait | Upstream |
//! |---------|-------|----------|
//! | [`WikipediaConstituentSource`] | [`ConstituentSource`](crate::ConstituentSource) | Wikipedia "List of S&P 500 companies" |
//! | [`YahooTimeSeriesSource`] | [`TimeSeriesSource`](crate::TimeSeriesSource) | Yahoo chart and quoteSummary endpoints |

pub mod wikipedia;
pub mod yahoo;

pub use wikipedia::WikipediaConstituentSource;
pub use yahoo::{YahooSession, YahooTimeSeriesSource};
