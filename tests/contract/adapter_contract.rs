//! Contract tests for the upstream adapters
//!
//! Every adapter is driven through a scripted `HttpClient`, so these tests
//! pin the request shape each adapter sends and the error classification it
//! applies to upstream responses, without touching the network.

use sectorscope_core::{
    ConstituentSource, FetchConfig, HttpClient, HttpError, HttpFuture, HttpRequest, HttpResponse,
    Period, SourceErrorKind, Symbol, TimeSeriesSource, WikipediaConstituentSource, YahooSession,
    YahooTimeSeriesSource,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Replies are matched by URL substring; every request is recorded.
struct ScriptedHttpClient {
    routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn new(routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>) -> Arc<Self> {
        Arc::new(Self {
            routes,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        let reply = self
            .routes
            .iter()
            .find(|(needle, _)| request.url.contains(needle))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Err(HttpError::new(format!("unrouted {}", request.url))));
        self.requests.lock().expect("lock").push(request);
        Box::pin(async move { reply })
    }
}

fn config() -> FetchConfig {
    FetchConfig::default()
        .with_catalog_url("https://catalog.test/sp500")
        .with_timeout_ms(1_500)
}

const CATALOG_PAGE: &str = r#"
<html><body>
<table id="constituents">
  <tr><th>Symbol</th><th>Security</th><th>GICS Sector</th><th>GICS Sub-Industry</th>
      <th>Headquarters Location</th><th>Date added</th><th>CIK</th><th>Founded</th></tr>
  <tr><td>AAPL</td><td>Apple Inc.</td><td>Information Technology</td>
      <td>Technology Hardware, Storage &amp; Peripherals</td><td>Cupertino, California</td>
      <td>1982-11-30</td><td>0000320193</td><td>1977</td></tr>
  <tr><td>ABT</td><td>Abbott Laboratories</td><td>Health Care</td>
      <td>Health Care Equipment</td><td>North Chicago, Illinois</td>
      <td>1957-03-04</td><td>0000001800</td><td>1888</td></tr>
</table>
</body></html>
"#;

// =============================================================================
// Wikipedia constituent source
// =============================================================================

#[tokio::test]
async fn wikipedia_source_gets_configured_url_with_timeout() {
    // Given: A source over a scripted transport
    let http = ScriptedHttpClient::new(vec![("catalog.test", Ok(HttpResponse::ok(CATALOG_PAGE)))]);
    let source = WikipediaConstituentSource::new(http.clone(), &config());

    // When: The table is fetched
    let constituents = source.constituents().await.expect("table parses");

    // Then: One GET to the configured URL carrying the timeout budget
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://catalog.test/sp500");
    assert_eq!(requests[0].timeout_ms, 1_500);

    // And: Both rows are projected, extra columns discarded
    assert_eq!(constituents.len(), 2);
    let apple = &constituents.records()[0];
    assert_eq!(apple.sub_industry, "Technology Hardware, Storage & Peripherals");
    assert_eq!(apple.founded.as_deref(), Some("1977"));
}

#[tokio::test]
async fn wikipedia_source_maps_error_status_to_unavailable() {
    // Given: The page returns a server error
    let http = ScriptedHttpClient::new(vec![(
        "catalog.test",
        Ok(HttpResponse::with_status(503, "maintenance")),
    )]);
    let source = WikipediaConstituentSource::new(http, &config());

    // When / Then: The failure is transient
    let error = source.constituents().await.expect_err("must fail");
    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    assert!(error.message().contains("503"));
}

#[tokio::test]
async fn wikipedia_source_maps_timeout_to_unavailable() {
    // Given: The transport times out
    let http = ScriptedHttpClient::new(vec![(
        "catalog.test",
        Err(HttpError::timeout("request timeout after 1500ms")),
    )]);
    let source = WikipediaConstituentSource::new(http, &config());

    // When / Then: The timeout surfaces as unavailable
    let error = source.constituents().await.expect_err("must fail");
    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    assert!(error.retryable());
}

#[tokio::test]
async fn wikipedia_source_reports_layout_change_as_schema_mismatch() {
    // Given: A page whose table lost the sector column
    let page = CATALOG_PAGE.replace("<th>GICS Sector</th>", "");
    let http = ScriptedHttpClient::new(vec![("catalog.test", Ok(HttpResponse::ok(page)))]);
    let source = WikipediaConstituentSource::new(http, &config());

    // When / Then: The failure names the layout change
    let error = source.constituents().await.expect_err("must fail");
    assert_eq!(error.kind(), SourceErrorKind::SchemaMismatch);
}

// =============================================================================
// Yahoo time-series source
// =============================================================================

fn yahoo(http: Arc<ScriptedHttpClient>) -> YahooTimeSeriesSource {
    YahooTimeSeriesSource::with_session(http, Arc::new(YahooSession::new(None)), &config())
}

fn chart_body(days: usize) -> String {
    // 2023-01-03 14:30 UTC, stepping one day at a time, newest first.
    let start = 1_672_756_200_i64;
    let timestamps = (0..days)
        .rev()
        .map(|day| start + day as i64 * 86_400)
        .collect::<Vec<_>>();
    let closes = (0..days).rev().map(|day| 100.0 + day as f64).collect::<Vec<_>>();
    json!({
        "chart": {
            "result": [{
                "meta": { "symbol": "SYM1", "gmtoffset": -18000 },
                "timestamp": timestamps,
                "indicators": { "quote": [{ "close": closes }] }
            }],
            "error": null
        }
    })
    .to_string()
}

#[tokio::test]
async fn yahoo_chart_yields_one_ascending_point_per_bar() {
    // Given: The provider returns 252 daily bars out of order
    let http = ScriptedHttpClient::new(vec![("/v8/finance/chart/", Ok(HttpResponse::ok(chart_body(252))))]);
    let source = yahoo(http.clone());
    let symbol = Symbol::parse("SYM1").expect("valid");

    // When: Daily closes are requested for a year
    let points = source
        .daily_closes(&symbol, Period::OneYear)
        .await
        .expect("closes");

    // Then: 252 points ordered by date ascending
    assert_eq!(points.len(), 252);
    assert!(points.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert_eq!(points[0].close, 100.0);

    // And: The request asked for daily bars over the one-year lookback
    let url = &http.requests()[0].url;
    assert!(url.contains("/SYM1?range=1y&interval=1d"));
}

#[tokio::test]
async fn yahoo_sends_share_class_symbols_with_dash() {
    // Given: A share-class symbol
    let http = ScriptedHttpClient::new(vec![("/v8/finance/chart/", Ok(HttpResponse::ok(chart_body(3))))]);
    let source = yahoo(http.clone());
    let symbol = Symbol::parse("BRK.B").expect("valid");

    // When: Closes are requested
    source
        .daily_closes(&symbol, Period::AllTime)
        .await
        .expect("closes");

    // Then: The provider sees BRK-B
    assert!(http.requests()[0].url.contains("/chart/BRK-B?range=max"));
}

#[tokio::test]
async fn yahoo_not_found_maps_to_unknown_symbol() {
    // Given: The provider has no such ticker
    let body = json!({
        "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } }
    })
    .to_string();
    let http = ScriptedHttpClient::new(vec![("/v8/finance/chart/", Ok(HttpResponse::ok(body)))]);
    let source = yahoo(http);

    // When / Then: The failure is UnknownSymbol, not retryable
    let error = source
        .daily_closes(&Symbol::parse("ZZZZ").expect("valid"), Period::OneMonth)
        .await
        .expect_err("must fail");
    assert_eq!(error.kind(), SourceErrorKind::UnknownSymbol);
    assert!(!error.retryable());
}

#[tokio::test]
async fn yahoo_profile_distinguishes_missing_from_zero() {
    // Given: A profile without an employee count and a zero market cap
    let summary = json!({
        "quoteSummary": {
            "result": [{
                "assetProfile": { "longBusinessSummary": "Shell company." },
                "price": { "marketCap": { "raw": 0, "fmt": "0" } }
            }],
            "error": null
        }
    })
    .to_string();
    let http = ScriptedHttpClient::new(vec![
        ("fc.yahoo.com", Ok(HttpResponse::ok(""))),
        ("getcrumb", Ok(HttpResponse::ok("abcDEF123"))),
        ("quoteSummary", Ok(HttpResponse::ok(summary))),
    ]);
    let source = yahoo(http.clone());

    // When: The profile is fetched
    let profile = source
        .profile(&Symbol::parse("SHEL").expect("valid"))
        .await
        .expect("profile");

    // Then: Missing stays missing, zero stays zero
    assert_eq!(profile.full_time_employees, None);
    assert_eq!(profile.market_cap, Some(0));
    assert_eq!(profile.business_summary.as_deref(), Some("Shell company."));

    // And: The crumb was attached to the summary request
    let requests = http.requests();
    let summary_request = requests
        .iter()
        .find(|request| request.url.contains("quoteSummary"))
        .expect("summary requested");
    assert!(summary_request.url.contains("modules=assetProfile,price"));
    assert!(summary_request.url.ends_with("crumb=abcDEF123"));
}

#[tokio::test]
async fn yahoo_cookie_override_is_sent_on_every_request() {
    // Given: A session with an explicit cookie
    let http = ScriptedHttpClient::new(vec![("/v8/finance/chart/", Ok(HttpResponse::ok(chart_body(2))))]);
    let source = YahooTimeSeriesSource::with_session(
        http.clone(),
        Arc::new(YahooSession::new(Some(String::from("A3=d=AQAB")))),
        &config(),
    );

    // When: Closes are requested
    source
        .daily_closes(&Symbol::parse("MMM").expect("valid"), Period::OneMonth)
        .await
        .expect("closes");

    // Then: The cookie header is present
    let requests = http.requests();
    assert_eq!(
        requests[0].headers.get("cookie").map(String::as_str),
        Some("A3=d=AQAB")
    );
}
