use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{CompanyRecord, Histogram, SectorHistogram, SubIndustryHistogram, Symbol};

/// Index constituents in source table order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constituents {
    records: Vec<CompanyRecord>,
}

impl Constituents {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, symbol: &Symbol) -> Option<&CompanyRecord> {
        self.records.iter().find(|record| &record.symbol == symbol)
    }

    /// Symbol of the first company whose name matches exactly.
    pub fn symbol_for_name(&self, name: &str) -> Option<&Symbol> {
        self.records
            .iter()
            .find(|record| record.name == name)
            .map(|record| &record.symbol)
    }

    /// Distinct sector names, sorted alphabetically.
    pub fn sector_names(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.sector.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records belonging to `sector`, in table order.
    pub fn in_sector(&self, sector: &str) -> Vec<&CompanyRecord> {
        self.records
            .iter()
            .filter(|record| record.sector == sector)
            .collect()
    }

    pub fn sector_histogram(&self) -> SectorHistogram {
        Histogram::by_sector(&self.records)
    }

    pub fn sub_industry_histogram(&self, sector: &str) -> SubIndustryHistogram {
        Histogram::by_sub_industry(&self.records, sector)
    }
}

impl From<Vec<CompanyRecord>> for Constituents {
    fn from(records: Vec<CompanyRecord>) -> Self {
        Self::new(records)
    }
}
