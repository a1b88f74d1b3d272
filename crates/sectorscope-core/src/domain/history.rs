use serde::{Deserialize, Serialize};
use time::Date;

use super::iso_date;
use crate::{Period, Symbol, ValidationError};

/// Closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: Date, close: f64) -> Result<Self, ValidationError> {
        if !close.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "close" });
        }
        if close < 0.0 {
            return Err(ValidationError::NegativeValue { field: "close" });
        }
        Ok(Self { date, close })
    }
}

/// Descriptive company fields. Each one is `None` when the provider omits it,
/// which is distinct from a reported zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub market_cap: Option<u64>,
    pub full_time_employees: Option<u64>,
    pub business_summary: Option<String>,
}

/// Daily closes over a lookback window, paired with the company profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyHistory {
    pub symbol: Symbol,
    pub period: Period,
    pub prices: Vec<PricePoint>,
    pub profile: CompanyProfile,
}

impl CompanyHistory {
    /// Builds a history with `prices` ordered by ascending date.
    pub fn new(
        symbol: Symbol,
        period: Period,
        mut prices: Vec<PricePoint>,
        profile: CompanyProfile,
    ) -> Self {
        prices.sort_by_key(|point| point.date);
        Self {
            symbol,
            period,
            prices,
            profile,
        }
    }

    pub fn first_close(&self) -> Option<f64> {
        self.prices.first().map(|point| point.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.prices.last().map(|point| point.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(day: u8) -> Date {
        Date::from_calendar_date(2024, Month::January, day).expect("valid date")
    }

    #[test]
    fn rejects_non_finite_close() {
        let err = PricePoint::new(date(2), f64::NAN).expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteValue { field: "close" });
    }

    #[test]
    fn rejects_negative_close() {
        let err = PricePoint::new(date(2), -1.0).expect_err("must fail");
        assert_eq!(err, ValidationError::NegativeValue { field: "close" });
    }

    #[test]
    fn history_orders_prices_by_date() {
        let prices = vec![
            PricePoint::new(date(4), 3.0).expect("valid"),
            PricePoint::new(date(2), 1.0).expect("valid"),
            PricePoint::new(date(3), 2.0).expect("valid"),
        ];
        let history = CompanyHistory::new(
            Symbol::parse("AAPL").expect("valid symbol"),
            Period::OneMonth,
            prices,
            CompanyProfile::default(),
        );
        assert_eq!(history.first_close(), Some(1.0));
        assert_eq!(history.last_close(), Some(3.0));
    }

    #[test]
    fn missing_employees_serialize_as_null_not_zero() {
        let profile = CompanyProfile {
            market_cap: Some(0),
            full_time_employees: None,
            business_summary: None,
        };
        let json = serde_json::to_value(&profile).expect("profile serializes");
        assert_eq!(json["market_cap"], 0);
        assert!(json["full_time_employees"].is_null());
    }

    #[test]
    fn price_point_date_uses_the_shared_iso_format() {
        let point = PricePoint::new(date(5), 12.5).expect("valid");
        let json = serde_json::to_string(&point).expect("point serializes");
        assert_eq!(json, r#"{"date":"2024-01-05","close":12.5}"#);

        let back: PricePoint = serde_json::from_str(&json).expect("point deserializes");
        assert_eq!(back, point);
    }
}
