use sectorscope_core::{CompanyRecord, Constituents};
use serde::Serialize;
use tracing::info;

use crate::cli::ConstituentsArgs;
use crate::error::CliError;
use crate::export;
use crate::output::{CommandResult, TableView};

use super::{ensure_sector, Dashboard};

#[derive(Debug, Serialize)]
struct ConstituentsData<'a> {
    sector: Option<&'a str>,
    rows: usize,
    columns: usize,
    records: Vec<&'a CompanyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    download_link: Option<String>,
}

pub async fn run(args: &ConstituentsArgs, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let constituents = dashboard.catalog.load().await?;
    build(args, &constituents)
}

fn build(args: &ConstituentsArgs, constituents: &Constituents) -> Result<CommandResult, CliError> {
    let sector = args.sector.as_deref();
    let records = match sector {
        Some(sector) => {
            ensure_sector(constituents, sector)?;
            constituents.in_sector(sector)
        }
        None => constituents.records().iter().collect(),
    };

    let mut table = TableView::new(CompanyRecord::COLUMNS);
    for record in &records {
        table.push_row(record.to_row());
    }
    let mut table = table.with_note(format!(
        "Data Dimension: {} rows and {} columns.",
        records.len(),
        CompanyRecord::COLUMNS.len()
    ));

    if let Some(path) = &args.output {
        export::write_file(path, &records)?;
        info!(path = %path.display(), rows = records.len(), "constituent table exported");
        table = table.with_note(format!("Wrote {} rows to {}", records.len(), path.display()));
    }

    let download_link = if args.download_link {
        let link = export::download_link(&records, sector)?;
        table = table.with_note(link.clone());
        Some(link)
    } else {
        None
    };

    let data = serde_json::to_value(ConstituentsData {
        sector,
        rows: records.len(),
        columns: CompanyRecord::COLUMNS.len(),
        records,
        download_link,
    })?;
    Ok(CommandResult::new(data, table))
}
