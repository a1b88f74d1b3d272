mod constituents;
mod history;
mod periods;
mod sectors;

use std::sync::Arc;

use sectorscope_core::{
    CompanyTimeSeriesFetcher, ConstituentCatalog, Constituents, FetchConfig, ReqwestHttpClient,
    WikipediaConstituentSource, YahooTimeSeriesSource,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::CommandResult;

/// Shared catalog and fetcher behind every command.
#[derive(Clone)]
pub struct Dashboard {
    pub catalog: ConstituentCatalog,
    pub fetcher: CompanyTimeSeriesFetcher,
}

impl Dashboard {
    pub fn new(catalog: ConstituentCatalog, fetcher: CompanyTimeSeriesFetcher) -> Self {
        Self { catalog, fetcher }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(config));
        let catalog = ConstituentCatalog::new(Arc::new(WikipediaConstituentSource::new(
            http_client.clone(),
            config,
        )));
        let fetcher = CompanyTimeSeriesFetcher::new(Arc::new(YahooTimeSeriesSource::new(
            http_client,
            config,
        )));
        Self::new(catalog, fetcher)
    }
}

pub async fn run(cli: &Cli, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Constituents(args) => constituents::run(args, dashboard).await,
        Command::Sectors(args) => sectors::run(args, dashboard).await,
        Command::History(args) => history::run(args, dashboard).await,
        Command::Periods => periods::run(),
    }
}

/// Rejects sector names absent from the table, listing the known ones.
fn ensure_sector(constituents: &Constituents, sector: &str) -> Result<(), CliError> {
    let known = constituents.sector_names();
    if known.contains(&sector) {
        return Ok(());
    }
    Err(CliError::Command(format!(
        "unknown sector '{sector}'. Known sectors: {}",
        known.join(", ")
    )))
}
