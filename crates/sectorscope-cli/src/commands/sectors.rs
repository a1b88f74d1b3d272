use sectorscope_core::{Constituents, Histogram};
use serde::Serialize;

use crate::cli::SectorsArgs;
use crate::error::CliError;
use crate::output::{CommandResult, TableView};

use super::{ensure_sector, Dashboard};

#[derive(Debug, Serialize)]
struct SectorEntry<'a> {
    name: &'a str,
    count: usize,
    share_percent: f64,
}

#[derive(Debug, Serialize)]
struct SectorsData<'a> {
    sector: Option<&'a str>,
    total: usize,
    entries: Vec<SectorEntry<'a>>,
}

pub async fn run(args: &SectorsArgs, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let constituents = dashboard.catalog.load().await?;
    build(args, &constituents)
}

fn build(args: &SectorsArgs, constituents: &Constituents) -> Result<CommandResult, CliError> {
    let sector = args.sector.as_deref();
    let (histogram, caption) = match sector {
        Some(sector) => {
            ensure_sector(constituents, sector)?;
            (constituents.sub_industry_histogram(sector), "Sub-Industry")
        }
        None => (constituents.sector_histogram(), "Sector"),
    };

    let mut table = TableView::new([caption, "Companies", "Share"]);
    for entry in histogram.entries() {
        table.push_row([
            entry.name.clone(),
            entry.count.to_string(),
            format!("{:.1}%", histogram.share_percent(entry)),
        ]);
    }
    let table = table.with_note(summary(&histogram, sector));

    let data = serde_json::to_value(SectorsData {
        sector,
        total: histogram.total(),
        entries: histogram
            .entries()
            .iter()
            .map(|entry| SectorEntry {
                name: &entry.name,
                count: entry.count,
                share_percent: histogram.share_percent(entry),
            })
            .collect(),
    })?;
    Ok(CommandResult::new(data, table))
}

fn summary(histogram: &Histogram, sector: Option<&str>) -> String {
    match sector {
        Some(sector) => format!(
            "{} companies across {} sub-industries in {sector}",
            histogram.total(),
            histogram.len()
        ),
        None => format!(
            "{} companies across {} sectors",
            histogram.total(),
            histogram.len()
        ),
    }
}
