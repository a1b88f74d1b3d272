//! # Domain Models
//!
//! Canonical types shared by the constituent catalog and the time-series fetcher.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CompanyRecord`] | One constituent row (symbol, name, sector, ...) |
//! | [`Constituents`] | Ordered constituent table with lookup helpers |
//! | [`Histogram`] | Company counts per sector or sub-industry |
//! | [`PricePoint`] | Daily closing price |
//! | [`CompanyProfile`] | Market cap, employees, business summary |
//! | [`CompanyHistory`] | Price series paired with a profile |
//! | [`Period`] | Fixed lookback window labels |
//! | [`Symbol`] | Validated ticker symbol |

mod company;
mod constituents;
mod histogram;
mod history;
mod period;
mod symbol;

pub use company::CompanyRecord;
pub use constituents::Constituents;
pub use histogram::{Histogram, HistogramEntry, SectorHistogram, SubIndustryHistogram};
pub use history::{CompanyHistory, CompanyProfile, PricePoint};
pub use period::Period;
pub use symbol::Symbol;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");
