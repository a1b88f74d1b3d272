use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::CompanyRecord;

/// Number of companies carrying one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramEntry {
    pub name: String,
    pub count: usize,
}

/// Company counts per category, sorted ascending by count.
///
/// A histogram is a pure projection of a record sequence and is recomputed on
/// demand. Equal counts are ordered by name so output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Histogram {
    entries: Vec<HistogramEntry>,
}

/// Companies per GICS sector.
pub type SectorHistogram = Histogram;

/// Companies per GICS sub-industry within one sector.
pub type SubIndustryHistogram = Histogram;

impl Histogram {
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }

        let mut entries = counts
            .into_iter()
            .map(|(name, count)| HistogramEntry {
                name: name.to_owned(),
                count,
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.name.cmp(&b.name)));

        Self { entries }
    }

    /// Counts records by sector.
    pub fn by_sector(records: &[CompanyRecord]) -> SectorHistogram {
        Self::from_values(records.iter().map(|record| record.sector.as_str()))
    }

    /// Counts the records of `sector` by sub-industry.
    pub fn by_sub_industry(records: &[CompanyRecord], sector: &str) -> SubIndustryHistogram {
        Self::from_values(
            records
                .iter()
                .filter(|record| record.sector == sector)
                .map(|record| record.sub_industry.as_str()),
        )
    }

    pub fn entries(&self) -> &[HistogramEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts; equals the number of records projected.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn count_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.count)
    }

    /// Share of `entry` in the total, in percent.
    pub fn share_percent(&self, entry: &HistogramEntry) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        entry.count as f64 * 100.0 / total as f64
    }

    /// `(name, count)` pairs in histogram order.
    pub fn to_pairs(&self) -> Vec<(&str, usize)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.count))
            .collect()
    }
}
