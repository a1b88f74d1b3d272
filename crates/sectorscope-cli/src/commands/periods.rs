use sectorscope_core::Period;
use serde::Serialize;

use crate::error::CliError;
use crate::output::{CommandResult, TableView};

#[derive(Debug, Serialize)]
struct PeriodData {
    label: &'static str,
    code: &'static str,
}

pub fn run() -> Result<CommandResult, CliError> {
    let mut table = TableView::new(["Period", "Code"]);
    let mut data = Vec::with_capacity(Period::ALL.len());
    for period in Period::ALL {
        table.push_row([period.label(), period.lookback_code()]);
        data.push(PeriodData {
            label: period.label(),
            code: period.lookback_code(),
        });
    }
    Ok(CommandResult::new(serde_json::to_value(data)?, table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_eight_periods_in_order() {
        let result = run().expect("periods listed");
        assert_eq!(result.table.rows.len(), 8);
        assert_eq!(result.table.rows[0], vec!["1 month", "1mo"]);
        assert_eq!(result.table.rows[7], vec!["all time", "max"]);
        assert_eq!(result.data[3]["code"], "1y");
    }
}
