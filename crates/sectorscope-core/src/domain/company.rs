use serde::{Deserialize, Serialize};
use time::Date;

use super::iso_date;
use crate::Symbol;

/// One row of the constituent table, projected to the fields the dashboard uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub symbol: Symbol,
    pub name: String,
    pub sector: String,
    pub sub_industry: String,
    pub headquarters: String,
    #[serde(with = "iso_date::option")]
    pub date_added: Option<Date>,
    pub founded: Option<String>,
}

impl CompanyRecord {
    /// Column captions in the order the record's fields are laid out.
    pub const COLUMNS: [&'static str; 7] = [
        "Symbol",
        "Security",
        "GICS Sector",
        "GICS Sub-Industry",
        "Headquarters Location",
        "Date added",
        "Founded",
    ];

    /// Field values rendered as text, in [`CompanyRecord::COLUMNS`] order.
    ///
    /// Missing values render as an empty string.
    pub fn to_row(&self) -> [String; 7] {
        [
            self.symbol.to_string(),
            self.name.clone(),
            self.sector.clone(),
            self.sub_industry.clone(),
            self.headquarters.clone(),
            self.date_added.map(|date| date.to_string()).unwrap_or_default(),
            self.founded.clone().unwrap_or_default(),
        ]
    }
}
