use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Lookback window offered to the user when charting a company.
///
/// The label set is fixed; each label maps to the lookback code understood by
/// the time-series provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1 month")]
    OneMonth,
    #[serde(rename = "3 months")]
    ThreeMonths,
    #[serde(rename = "6 months")]
    SixMonths,
    #[serde(rename = "1 year")]
    OneYear,
    #[serde(rename = "2 years")]
    TwoYears,
    #[serde(rename = "5 years")]
    FiveYears,
    #[serde(rename = "10 years")]
    TenYears,
    #[serde(rename = "all time")]
    AllTime,
}

impl Period {
    pub const ALL: [Self; 8] = [
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::AllTime,
    ];

    /// Human-readable label, as shown in the period picker.
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneMonth => "1 month",
            Self::ThreeMonths => "3 months",
            Self::SixMonths => "6 months",
            Self::OneYear => "1 year",
            Self::TwoYears => "2 years",
            Self::FiveYears => "5 years",
            Self::TenYears => "10 years",
            Self::AllTime => "all time",
        }
    }

    /// Lookback code consumed by the time-series provider.
    pub const fn lookback_code(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::AllTime => "max",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|period| period.label() == normalized)
            .ok_or_else(|| ValidationError::InvalidPeriod {
                value: value.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_case_insensitively() {
        let period = Period::from_str(" 1 Year ").expect("must parse");
        assert_eq!(period, Period::OneYear);
        assert_eq!(period.lookback_code(), "1y");
    }

    #[test]
    fn maps_all_time_to_max() {
        let period = Period::from_str("all time").expect("must parse");
        assert_eq!(period.lookback_code(), "max");
    }

    #[test]
    fn rejects_label_outside_fixed_table() {
        let err = Period::from_str("3 weeks").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidPeriod { .. }));
    }

    #[test]
    fn rejects_raw_lookback_code() {
        assert!(Period::from_str("1y").is_err());
    }

    #[test]
    fn every_label_round_trips_through_parse() {
        for period in Period::ALL {
            assert_eq!(Period::from_str(period.label()), Ok(period));
        }
    }
}
