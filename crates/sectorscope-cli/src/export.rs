//! CSV export of constituent tables and base64 download anchors.

use std::path::Path;

use base64::engine::general_purpose;
use base64::Engine;
use sectorscope_core::CompanyRecord;

use crate::error::CliError;

/// Download name for a table, optionally narrowed to one sector.
pub fn file_name(sector: Option<&str>) -> String {
    match sector {
        Some(sector) => format!("SP500_{}.csv", sector.replace(char::is_whitespace, "_")),
        None => String::from("SP500.csv"),
    }
}

pub fn write_records<W: std::io::Write>(
    out: W,
    records: &[&CompanyRecord],
) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CompanyRecord::COLUMNS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv(records: &[&CompanyRecord]) -> Result<Vec<u8>, CliError> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    Ok(buffer)
}

pub fn write_file(path: &Path, records: &[&CompanyRecord]) -> Result<(), CliError> {
    let file = std::fs::File::create(path)?;
    write_records(file, records)
}

/// HTML anchor that downloads `records` as a CSV file when clicked.
pub fn download_link(records: &[&CompanyRecord], sector: Option<&str>) -> Result<String, CliError> {
    let encoded = general_purpose::STANDARD.encode(to_csv(records)?);
    let label = match sector {
        Some(sector) => format!("Download CSV File (Sector - {sector})"),
        None => String::from("Download CSV File"),
    };
    Ok(format!(
        "<a href=\"data:file/csv;base64,{encoded}\" download=\"{}\">{label}</a>",
        file_name(sector)
    ))
}
