use std::io::{self, Write};

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Rows shown by the table and CSV formats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Free-form lines printed after the table (table format only).
    pub notes: Vec<String>,
}

impl TableView {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Command output in both machine (`data`) and human (`table`) shape.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub data: Value,
    pub table: TableView,
}

impl CommandResult {
    pub fn new(data: Value, table: TableView) -> Self {
        Self { data, table }
    }
}

pub fn render(result: &CommandResult, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, result, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn write_result<W: Write>(
    out: &mut W,
    result: &CommandResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&result.data)?
            } else {
                serde_json::to_string(&result.data)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Csv => write_csv(out, &result.table)?,
        OutputFormat::Table => write_table(out, &result.table)?,
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, table: &TableView) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(out: &mut W, table: &TableView) -> Result<(), CliError> {
    let mut widths = table
        .headers
        .iter()
        .map(|header| header.chars().count())
        .collect::<Vec<_>>();
    for row in &table.rows {
        for (index, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(index) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }

    if !table.headers.is_empty() {
        writeln!(out, "{}", format_line(&table.headers, &widths))?;
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>();
        writeln!(out, "{}", format_line(&rule, &widths))?;
    }
    for row in &table.rows {
        writeln!(out, "{}", format_line(row, &widths))?;
    }

    if !table.notes.is_empty() {
        writeln!(out)?;
        for note in &table.notes {
            writeln!(out, "{note}")?;
        }
    }
    Ok(())
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CommandResult {
        let mut table = TableView::new(["Sector", "Companies"]);
        table.push_row(["Health Care", "1"]);
        table.push_row(["Technology", "2"]);
        CommandResult::new(
            json!({"entries": [["Health Care", 1], ["Technology", 2]]}),
            table.with_note("3 companies"),
        )
    }

    fn rendered(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        write_result(&mut buffer, &sample(), format, false).expect("render succeeds");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn table_columns_are_aligned() {
        let text = rendered(OutputFormat::Table);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Sector       Companies");
        assert_eq!(lines[1], "-----------  ---------");
        assert_eq!(lines[2], "Health Care  1");
        assert_eq!(lines[3], "Technology   2");
        assert_eq!(lines.last().copied(), Some("3 companies"));
    }

    #[test]
    fn csv_has_header_and_rows_without_notes() {
        let text = rendered(OutputFormat::Csv);
        assert_eq!(text, "Sector,Companies\nHealth Care,1\nTechnology,2\n");
    }

    #[test]
    fn json_emits_data_only() {
        let text = rendered(OutputFormat::Json);
        let value: Value = serde_json::from_str(text.trim()).expect("valid json");
        assert_eq!(value["entries"][1][1], 2);
    }
}
