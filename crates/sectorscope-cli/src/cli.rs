//! CLI argument definitions for sectorscope.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `constituents` | Browse, filter and export the S&P 500 constituent table |
//! | `sectors` | Company counts per sector, or per sub-industry in one sector |
//! | `history` | Daily closing prices and profile for one company |
//! | `periods` | List the supported lookback periods |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `SECTORSCOPE_TIMEOUT_MS` or `10000` | Per-request network timeout |
//! | `--catalog-url` | `SECTORSCOPE_CATALOG_URL` or Wikipedia | Constituent table location |
//! | `-v, --verbose` | off | Log fetches (`-vv` for cache hits too) |
//!
//! # Examples
//!
//! ```bash
//! sectorscope sectors
//! sectorscope constituents --sector "Health Care" --output health.csv
//! sectorscope history --company "3M" --period "5 years" --format json --pretty
//! ```

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use sectorscope_core::FetchConfig;

/// S&P 500 sector dashboard for the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "sectorscope",
    author,
    version,
    about = "S&P 500 constituents, sector breakdown and price history"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Network timeout per request in milliseconds.
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Page holding the constituent table.
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// Increase log verbosity on stderr.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::from_env();
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        if let Some(url) = &self.catalog_url {
            config = config.with_catalog_url(url.clone());
        }
        config
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display.
    Table,
    /// Single JSON document.
    Json,
    /// Comma-separated rows with a header line.
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the constituent table, optionally filtered by sector.
    Constituents(ConstituentsArgs),
    /// Show how many companies each sector holds.
    Sectors(SectorsArgs),
    /// Show daily closes and profile for one company.
    History(HistoryArgs),
    /// List supported lookback periods.
    Periods,
}

#[derive(Debug, Args)]
pub struct ConstituentsArgs {
    /// Only keep companies in this GICS sector.
    #[arg(long)]
    pub sector: Option<String>,

    /// Write the (filtered) table to this CSV file.
    #[arg(long)]
    pub output: Option<std::path::PathBuf>,

    /// Print an HTML anchor embedding the table as a base64 CSV download.
    #[arg(long, default_value_t = false)]
    pub download_link: bool,
}

#[derive(Debug, Args)]
pub struct SectorsArgs {
    /// Break this sector down by GICS sub-industry.
    #[arg(long)]
    pub sector: Option<String>,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("company_ref").required(true).args(["symbol", "company"])))]
pub struct HistoryArgs {
    /// Ticker symbol, e.g. MMM.
    #[arg(long)]
    pub symbol: Option<String>,

    /// Company name as listed in the constituent table.
    #[arg(long)]
    pub company: Option<String>,

    /// Lookback period label.
    #[arg(long, default_value = "1 year")]
    pub period: String,
}
