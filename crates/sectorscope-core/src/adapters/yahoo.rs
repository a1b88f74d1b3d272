use std::sync::Arc;

use serde::Deserialize;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::data_source::{SourceError, SourceFuture, TimeSeriesSource};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{CompanyProfile, Period, PricePoint, Symbol};

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_BASE: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const PROFILE_MODULES: &str = "assetProfile,price";
const SESSION_URL: &str = "https://fc.yahoo.com";
const CRUMB_ENDPOINTS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";
const COOKIE_ENV: &str = "YAHOO_COOKIE";

// ============================================================================
// Yahoo Session - cookie/crumb handling
// ============================================================================

/// Yahoo session state.
///
/// quoteSummary requires a session cookie from fc.yahoo.com (kept by the HTTP
/// client's cookie store, or supplied through `YAHOO_COOKIE`) and a crumb
/// token passed as a query parameter.
#[derive(Debug, Default)]
pub struct YahooSession {
    crumb: Mutex<Option<String>>,
    cookie_override: Option<String>,
}

impl YahooSession {
    pub fn new(cookie_override: Option<String>) -> Self {
        Self {
            crumb: Mutex::new(None),
            cookie_override,
        }
    }

    /// Session whose cookie comes from `YAHOO_COOKIE` when set.
    pub fn from_env() -> Self {
        Self::new(std::env::var(COOKIE_ENV).ok().filter(|value| !value.is_empty()))
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie_override.as_deref()
    }

    /// Returns the cached crumb, fetching a new one if none is held.
    ///
    /// The lock is held across the refresh so concurrent callers wait for a
    /// single refresh.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        let mut crumb = self.crumb.lock().await;
        if let Some(value) = crumb.as_ref() {
            return Ok(value.clone());
        }

        let fresh = self.refresh(http_client, timeout_ms).await?;
        *crumb = Some(fresh.clone());
        Ok(fresh)
    }

    /// Drops the cached crumb; the next call refreshes it.
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }

    async fn refresh(
        &self,
        http_client: &dyn HttpClient,
        timeout_ms: u64,
    ) -> Result<String, SourceError> {
        debug!("refreshing yahoo session");
        let session_request = HttpRequest::get(SESSION_URL)
            .with_header("referer", REFERER)
            .with_cookie(self.cookie())
            .with_timeout_ms(timeout_ms);
        http_client.execute(session_request).await.map_err(|error| {
            SourceError::unavailable(format!("failed to open yahoo session: {}", error.message()))
        })?;

        for endpoint in CRUMB_ENDPOINTS {
            let request = HttpRequest::get(endpoint)
                .with_header("referer", REFERER)
                .with_cookie(self.cookie())
                .with_timeout_ms(timeout_ms);

            match http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    let body = response.body.trim();
                    if body.to_ascii_lowercase().contains("too many requests") {
                        return Err(SourceError::unavailable(
                            "yahoo rate limited while fetching crumb",
                        ));
                    }
                    if is_plausible_crumb(body) {
                        return Ok(body.to_owned());
                    }
                }
                Ok(response) => {
                    debug!(endpoint, status = response.status, "crumb endpoint rejected request");
                }
                Err(error) => {
                    debug!(endpoint, %error, "crumb endpoint unreachable");
                }
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }
}

fn is_plausible_crumb(body: &str) -> bool {
    !body.is_empty()
        && body.len() < 100
        && !body.contains(char::is_whitespace)
        && !body.contains('<')
}

// ============================================================================
// Yahoo Time Series Source
// ============================================================================

/// Daily closes from the chart endpoint, profile from quoteSummary.
#[derive(Clone)]
pub struct YahooTimeSeriesSource {
    http_client: Arc<dyn HttpClient>,
    session: Arc<YahooSession>,
    timeout_ms: u64,
}

impl YahooTimeSeriesSource {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &FetchConfig) -> Self {
        Self::with_session(http_client, Arc::new(YahooSession::from_env()), config)
    }

    pub fn with_session(
        http_client: Arc<dyn HttpClient>,
        session: Arc<YahooSession>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            http_client,
            session,
            timeout_ms: config.timeout_ms,
        }
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_cookie(self.session.cookie())
            .with_timeout_ms(self.timeout_ms)
    }

    async fn send(&self, url: String) -> Result<HttpResponse, SourceError> {
        self.http_client
            .execute(self.request(url))
            .await
            .map_err(|error| {
                let reason = if error.timed_out() { "timeout" } else { "transport error" };
                SourceError::unavailable(format!("yahoo {reason}: {}", error.message()))
            })
    }

    async fn fetch_closes(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Vec<PricePoint>, SourceError> {
        let url = format!(
            "{CHART_BASE}/{}?range={}&interval=1d&includePrePost=false",
            urlencoding::encode(&yahoo_ticker(symbol)),
            period.lookback_code()
        );

        let response = self.send(url).await?;
        let body = classify_response(symbol, response)?;
        parse_chart(symbol, &body)
    }

    async fn fetch_profile(&self, symbol: &Symbol) -> Result<CompanyProfile, SourceError> {
        let crumb = self
            .session
            .crumb(self.http_client.as_ref(), self.timeout_ms)
            .await?;
        let response = self.send(self.profile_url(symbol, &crumb)).await?;

        // A stale crumb shows up as 401, throttling as 429; refresh once.
        let response = if response.status == 401 || response.status == 429 {
            warn!(%symbol, status = response.status, "yahoo rejected crumb, refreshing session");
            self.session.invalidate().await;
            let crumb = self
                .session
                .crumb(self.http_client.as_ref(), self.timeout_ms)
                .await?;
            self.send(self.profile_url(symbol, &crumb)).await?
        } else {
            response
        };

        let body = classify_response(symbol, response)?;
        parse_profile(symbol, &body)
    }

    fn profile_url(&self, symbol: &Symbol, crumb: &str) -> String {
        format!(
            "{QUOTE_SUMMARY_BASE}/{}?modules={PROFILE_MODULES}&crumb={}",
            urlencoding::encode(&yahoo_ticker(symbol)),
            urlencoding::encode(crumb)
        )
    }
}

impl TimeSeriesSource for YahooTimeSeriesSource {
    fn daily_closes<'a>(
        &'a self,
        symbol: &'a Symbol,
        period: Period,
    ) -> SourceFuture<'a, Vec<PricePoint>> {
        Box::pin(self.fetch_closes(symbol, period))
    }

    fn profile<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, CompanyProfile> {
        Box::pin(self.fetch_profile(symbol))
    }
}

/// Ticker as Yahoo spells it: share-class dots become dashes (`BRK.B` -> `BRK-B`).
pub fn yahoo_ticker(symbol: &Symbol) -> String {
    match symbol.share_class() {
        Some(class) => format!("{}-{class}", symbol.root()),
        None => symbol.root().to_owned(),
    }
}

fn classify_response(symbol: &Symbol, response: HttpResponse) -> Result<String, SourceError> {
    match response.status {
        404 => Err(SourceError::unknown_symbol(format!(
            "yahoo has no data for '{symbol}'"
        ))),
        status if !(200..300).contains(&status) => Err(SourceError::unavailable(format!(
            "yahoo returned status {status}"
        ))),
        _ => Ok(response.body),
    }
}

fn api_error(symbol: &Symbol, error: YahooApiError) -> SourceError {
    let detail = error.description.unwrap_or_else(|| error.code.clone());
    if error.code.eq_ignore_ascii_case("not found") {
        SourceError::unknown_symbol(format!("yahoo has no data for '{symbol}': {detail}"))
    } else {
        SourceError::unavailable(format!("yahoo API error {}: {detail}", error.code))
    }
}

/// Decodes a chart payload into daily closes ordered by date.
///
/// Bars without a close are skipped. Dates are exchange-local.
pub fn parse_chart(symbol: &Symbol, body: &str) -> Result<Vec<PricePoint>, SourceError> {
    let envelope: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {}", e)))?;

    if let Some(error) = envelope.chart.error {
        return Err(api_error(symbol, error));
    }

    let result = envelope
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::unknown_symbol(format!("no chart data for '{symbol}'")))?;

    if result.timestamp.is_empty() {
        return Err(SourceError::unknown_symbol(format!(
            "no price history for '{symbol}'"
        )));
    }

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (ts, close) in result.timestamp.iter().zip(closes) {
        let Some(close) = close else {
            continue;
        };
        let date = exchange_date(*ts, result.meta.gmt_offset)?;
        let point = PricePoint::new(date, close)
            .map_err(|e| SourceError::internal(format!("invalid close for {date}: {e}")))?;
        points.push(point);
    }

    points.sort_by_key(|point| point.date);
    Ok(points)
}

fn exchange_date(ts: i64, gmt_offset: i64) -> Result<Date, SourceError> {
    OffsetDateTime::from_unix_timestamp(ts.saturating_add(gmt_offset))
        .map(OffsetDateTime::date)
        .map_err(|e| SourceError::internal(format!("invalid timestamp {ts}: {e}")))
}

/// Decodes a quoteSummary payload into a profile; absent fields stay `None`.
pub fn parse_profile(symbol: &Symbol, body: &str) -> Result<CompanyProfile, SourceError> {
    let envelope: YahooQuoteSummaryResponse = serde_json::from_str(body).map_err(|e| {
        SourceError::internal(format!("failed to parse yahoo quote summary: {}", e))
    })?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(api_error(symbol, error));
    }

    let result = envelope
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::unknown_symbol(format!("no profile for '{symbol}'")))?;

    let asset_profile = result.asset_profile.unwrap_or_default();
    let market_cap = result
        .price
        .and_then(|price| price.market_cap)
        .and_then(|value| value.raw)
        .filter(|raw| raw.is_finite() && *raw >= 0.0)
        .map(|raw| raw.round() as u64);

    Ok(CompanyProfile {
        market_cap,
        full_time_employees: asset_profile.full_time_employees,
        business_summary: asset_profile
            .long_business_summary
            .map(|summary| summary.trim().to_owned())
            .filter(|summary| !summary.is_empty()),
    })
}

// Yahoo Finance API response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "gmtoffset", default)]
    gmt_offset: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResult {
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<YahooAssetProfile>,
    #[serde(default)]
    price: Option<YahooPriceData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooAssetProfile {
    #[serde(rename = "fullTimeEmployees", default)]
    full_time_employees: Option<u64>,
    #[serde(rename = "longBusinessSummary", default)]
    long_business_summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooPriceData {
    #[serde(rename = "marketCap", default)]
    market_cap: Option<YahooRawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; only `raw` is read.
#[derive(Debug, Clone, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<f64>,
}
