use std::str::FromStr;

use sectorscope_core::{CompanyHistory, Period, SourceError};

use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::output::{CommandResult, TableView};

use super::Dashboard;

const MISSING: &str = "n/a";

pub async fn run(args: &HistoryArgs, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    // Checked up front so a bad label never triggers the catalog fetch.
    Period::from_str(&args.period).map_err(|error| SourceError::invalid_period(error.to_string()))?;

    let symbol = match (&args.symbol, &args.company) {
        (Some(symbol), _) => symbol.clone(),
        (None, Some(company)) => {
            let constituents = dashboard.catalog.load().await?;
            constituents
                .symbol_for_name(company)
                .map(|symbol| symbol.to_string())
                .ok_or_else(|| {
                    CliError::Command(format!("no constituent named '{company}'"))
                })?
        }
        (None, None) => {
            return Err(CliError::Command(String::from(
                "either --symbol or --company is required",
            )))
        }
    };

    let history = dashboard.fetcher.fetch(&symbol, &args.period).await?;
    build(&history)
}

fn build(history: &CompanyHistory) -> Result<CommandResult, CliError> {
    let mut table = TableView::new(["Date", "Close"]);
    for point in &history.prices {
        table.push_row([point.date.to_string(), format!("{:.2}", point.close)]);
    }

    let profile = &history.profile;
    let mut table = table
        .with_note(format!(
            "{} closing prices for {} over {}",
            history.prices.len(),
            history.symbol,
            history.period
        ))
        .with_note(format!("Market cap: {}", or_missing(profile.market_cap)))
        .with_note(format!(
            "Full-time employees: {}",
            or_missing(profile.full_time_employees)
        ))
        .with_note(format!(
            "Business summary: {}",
            profile.business_summary.as_deref().unwrap_or(MISSING)
        ));

    if let (Some(first), Some(last)) = (history.first_close(), history.last_close()) {
        if first > 0.0 {
            table = table.with_note(format!("Change: {:+.2}%", (last - first) / first * 100.0));
        }
    }

    Ok(CommandResult::new(serde_json::to_value(history)?, table))
}

fn or_missing(value: Option<u64>) -> String {
    value.map_or_else(|| MISSING.to_owned(), |value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{dashboard, sample_records, StubSeries};
    use sectorscope_core::{CompanyProfile, SourceErrorKind};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn args(symbol: Option<&str>, company: Option<&str>, period: &str) -> HistoryArgs {
        HistoryArgs {
            symbol: symbol.map(str::to_owned),
            company: company.map(str::to_owned),
            period: period.to_owned(),
        }
    }

    #[tokio::test]
    async fn company_name_resolves_to_symbol() {
        let series = Arc::new(StubSeries::default());
        let dashboard = dashboard(sample_records(), series.clone());

        let result = run(&args(None, Some("Microsoft"), "6 months"), &dashboard)
            .await
            .expect("history fetched");

        assert_eq!(result.data["symbol"], "MSFT");
        assert_eq!(result.data["period"], "6 months");
        assert_eq!(result.table.rows.len(), 3);
        assert_eq!(result.table.rows[0], vec!["2024-01-02", "100.00"]);
        assert_eq!(series.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_profile_fields_render_as_not_available() {
        let series = Arc::new(StubSeries {
            profile: CompanyProfile {
                market_cap: None,
                full_time_employees: Some(0),
                business_summary: None,
            },
            ..StubSeries::default()
        });
        let dashboard = dashboard(sample_records(), series);

        let result = run(&args(Some("AAPL"), None, "1 year"), &dashboard)
            .await
            .expect("history fetched");

        assert!(result.table.notes.contains(&String::from("Market cap: n/a")));
        assert!(result
            .table
            .notes
            .contains(&String::from("Full-time employees: 0")));
        assert!(result.table.notes.contains(&String::from("Change: +2.00%")));
    }

    #[tokio::test]
    async fn invalid_period_is_rejected_before_any_fetch() {
        let series = Arc::new(StubSeries::default());
        let dashboard = dashboard(sample_records(), series.clone());

        let error = run(&args(None, Some("Apple Inc."), "3 weeks"), &dashboard)
            .await
            .expect_err("must fail");

        assert!(matches!(
            &error,
            CliError::Source(source) if source.kind() == SourceErrorKind::InvalidPeriod
        ));
        assert_eq!(error.exit_code(), 2);
        assert!(!dashboard.catalog.is_loaded().await);
        assert_eq!(series.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_company_name_is_a_command_error() {
        let dashboard = dashboard(sample_records(), Arc::new(StubSeries::default()));

        let error = run(&args(None, Some("Initech"), "1 year"), &dashboard)
            .await
            .expect_err("must fail");

        assert!(matches!(error, CliError::Command(_)));
    }

    #[tokio::test]
    async fn unknown_symbol_surfaces_source_error() {
        let dashboard = dashboard(sample_records(), Arc::new(StubSeries::default()));

        let error = run(&args(Some("GONE"), None, "1 year"), &dashboard)
            .await
            .expect_err("must fail");

        assert!(matches!(
            error,
            CliError::Source(source) if source.kind() == SourceErrorKind::UnknownSymbol
        ));
    }
}
