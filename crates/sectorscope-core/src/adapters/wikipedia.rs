use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use time::macros::format_description;
use time::Date;
use tracing::debug;

use crate::config::FetchConfig;
use crate::data_source::{ConstituentSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{CompanyRecord, Constituents, Symbol};

/// Accepted header captions per projected field, compared after normalization.
const SYMBOL_HEADERS: &[&str] = &["symbol", "ticker symbol", "ticker"];
const NAME_HEADERS: &[&str] = &["security", "company"];
const SECTOR_HEADERS: &[&str] = &["gics sector"];
const SUB_INDUSTRY_HEADERS: &[&str] = &["gics sub-industry", "gics sub industry"];
const HEADQUARTERS_HEADERS: &[&str] = &["headquarters location", "headquarters"];
const DATE_ADDED_HEADERS: &[&str] = &["date added", "date first added"];
const FOUNDED_HEADERS: &[&str] = &["founded"];

/// Constituent source that scrapes the first table of an HTML page.
#[derive(Clone)]
pub struct WikipediaConstituentSource {
    http_client: Arc<dyn HttpClient>,
    url: String,
    timeout_ms: u64,
}

impl WikipediaConstituentSource {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &FetchConfig) -> Self {
        Self {
            http_client,
            url: config.catalog_url.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_document(&self) -> Result<String, SourceError> {
        let request = HttpRequest::get(self.url.as_str()).with_timeout_ms(self.timeout_ms);
        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("catalog transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "catalog source returned status {}",
                response.status
            )));
        }

        debug!(bytes = response.body.len(), url = %self.url, "catalog document received");
        Ok(response.body)
    }
}

impl ConstituentSource for WikipediaConstituentSource {
    fn constituents<'a>(&'a self) -> SourceFuture<'a, Constituents> {
        Box::pin(async move {
            let body = self.fetch_document().await?;
            parse_constituents(&body)
        })
    }
}

/// Column positions of the projected fields within the source table.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    symbol: usize,
    name: usize,
    sector: usize,
    sub_industry: usize,
    headquarters: usize,
    date_added: usize,
    founded: usize,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Result<Self, SourceError> {
        let mut missing = Vec::new();
        let mut locate = |aliases: &[&'static str]| -> usize {
            match headers
                .iter()
                .position(|header| aliases.contains(&header.as_str()))
            {
                Some(index) => index,
                None => {
                    missing.push(aliases[0]);
                    usize::MAX
                }
            }
        };

        let map = Self {
            symbol: locate(SYMBOL_HEADERS),
            name: locate(NAME_HEADERS),
            sector: locate(SECTOR_HEADERS),
            sub_industry: locate(SUB_INDUSTRY_HEADERS),
            headquarters: locate(HEADQUARTERS_HEADERS),
            date_added: locate(DATE_ADDED_HEADERS),
            founded: locate(FOUNDED_HEADERS),
        };

        if !missing.is_empty() {
            return Err(SourceError::schema_mismatch(format!(
                "constituent table is missing column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(map)
    }

    fn width(&self) -> usize {
        [
            self.symbol,
            self.name,
            self.sector,
            self.sub_industry,
            self.headquarters,
            self.date_added,
            self.founded,
        ]
        .into_iter()
        .max()
        .map_or(0, |index| index + 1)
    }
}

/// Projects the first table of `html` onto [`CompanyRecord`]s.
///
/// Extra source columns are discarded. A missing required column, a missing
/// table or a truncated row is a schema mismatch.
pub fn parse_constituents(html: &str) -> Result<Constituents, SourceError> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| SourceError::schema_mismatch("catalog document contains no table"))?;

    let mut rows = table.select(&row_selector).map(row_cells);

    let header = rows
        .by_ref()
        .find(|cells| !cells.is_empty() && cells.iter().all(|cell| cell.is_header))
        .ok_or_else(|| SourceError::schema_mismatch("constituent table has no header row"))?;
    let headers = header
        .iter()
        .map(|cell| cell.text.to_ascii_lowercase())
        .collect::<Vec<_>>();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for (index, cells) in rows
        .filter(|cells| cells.iter().any(|cell| !cell.is_header))
        .enumerate()
    {
        records.push(project_row(&columns, &cells, index + 1)?);
    }

    if records.is_empty() {
        return Err(SourceError::schema_mismatch(
            "constituent table has no data rows",
        ));
    }

    Ok(Constituents::new(records))
}

fn project_row(
    columns: &ColumnMap,
    cells: &[Cell],
    row_number: usize,
) -> Result<CompanyRecord, SourceError> {
    if cells.len() < columns.width() {
        return Err(SourceError::schema_mismatch(format!(
            "constituent row {row_number} has {} cells, expected at least {}",
            cells.len(),
            columns.width()
        )));
    }

    let text = |index: usize| cells[index].text.clone();
    let symbol = Symbol::parse(&cells[columns.symbol].text).map_err(|error| {
        SourceError::schema_mismatch(format!("constituent row {row_number}: {error}"))
    })?;

    Ok(CompanyRecord {
        symbol,
        name: text(columns.name),
        sector: text(columns.sector),
        sub_industry: text(columns.sub_industry),
        headquarters: text(columns.headquarters),
        date_added: parse_date_added(&cells[columns.date_added].text),
        founded: Some(text(columns.founded)).filter(|value| !value.is_empty()),
    })
}

/// Reads the leading `YYYY-MM-DD` of a cell; annotations after it are ignored.
fn parse_date_added(text: &str) -> Option<Date> {
    let prefix = text.get(..10)?;
    Date::parse(prefix, format_description!("[year]-[month]-[day]")).ok()
}

#[derive(Debug)]
struct Cell {
    text: String,
    is_header: bool,
}

fn row_cells(row: ElementRef<'_>) -> Vec<Cell> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| match element.value().name() {
            "th" => Some(Cell {
                text: clean_text(element),
                is_header: true,
            }),
            "td" => Some(Cell {
                text: clean_text(element),
                is_header: false,
            }),
            _ => None,
        })
        .collect()
}

/// Cell text with footnote markers such as `[1]` removed and whitespace collapsed.
fn clean_text(element: ElementRef<'_>) -> String {
    strip_notes(&element.text().collect::<String>())
}

fn strip_notes(raw: &str) -> String {
    let mut kept = String::with_capacity(raw.len());
    let mut rest = raw;
    // An unmatched `[` is ordinary text.
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']') else {
            break;
        };
        kept.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    kept.push_str(rest);
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|error| SourceError::internal(format!("invalid selector '{css}': {error}")))
}
