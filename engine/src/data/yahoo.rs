// Yahoo Finance chart endpoint as the market-data provider.
use crate::config::settings::ProviderSettings;
use crate::data::market_data::{FetchFuture, MarketDataFetcher};
use crate::error::{EngineError, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use shared::models::{Bar, DateRange, OhlcvSeries};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct YahooFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFetcher {
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| EngineError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Daily bars for `[start, end)`, with dividends and splits so the payload carries adjclose.
    ///
    /// `period1` reaches back one extra day: exchanges east of UTC stamp their first
    /// session before UTC midnight. `parse_chart` trims to the range in exchange time.
    pub fn chart_url(&self, symbol: &str, range: DateRange) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=div%7Csplit&includeAdjustedClose=true",
            self.base_url,
            urlencoding::encode(symbol),
            epoch_seconds(range.start) - SECONDS_PER_DAY,
            epoch_seconds(range.end),
        )
    }

    async fn fetch_series(&self, symbol: &str, range: DateRange) -> Result<OhlcvSeries> {
        let url = self.chart_url(symbol, range);
        tracing::debug!(symbol = %symbol, url = %url, "Requesting Yahoo chart");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::FetchFailure(format!("request timeout for '{}': {}", symbol, e))
            } else if e.is_connect() {
                EngineError::FetchFailure(format!("connection failed for '{}': {}", symbol, e))
            } else {
                EngineError::FetchFailure(format!("request failed for '{}': {}", symbol, e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| EngineError::FetchFailure(format!("failed to read response body: {}", e)))?;

        match status {
            200..=299 => parse_chart(symbol, &body, range),
            404 => Err(EngineError::FetchFailure(format!(
                "unknown symbol '{}': {}",
                symbol,
                provider_error_description(&body).unwrap_or_else(|| "not found".to_string())
            ))),
            429 => Err(EngineError::FetchFailure(format!(
                "provider rate limit reached while fetching '{}'",
                symbol
            ))),
            _ => Err(EngineError::FetchFailure(format!(
                "provider returned status {} for '{}'",
                status, symbol
            ))),
        }
    }
}

impl MarketDataFetcher for YahooFetcher {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch<'a>(&'a self, symbol: &'a str, range: DateRange) -> FetchFuture<'a> {
        Box::pin(self.fetch_series(symbol, range))
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default, rename = "gmtoffset")]
    gmt_offset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn provider_error_description(body: &str) -> Option<String> {
    let envelope: ChartEnvelope = serde_json::from_str(body).ok()?;
    envelope.chart.error.map(|e| e.description)
}

/// Decodes a chart payload into auto-adjusted daily bars inside `range`.
///
/// Each row's OHLC is multiplied by `adjclose / close`, so close becomes the
/// adjusted close. Rows with any missing price are dropped; missing volume is 0.
pub fn parse_chart(symbol: &str, body: &str, range: DateRange) -> Result<OhlcvSeries> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(err) = envelope.chart.error {
        return Err(EngineError::FetchFailure(format!(
            "provider error for '{}': {} ({})",
            symbol, err.description, err.code
        )));
    }

    let result = match envelope.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => {
            return Err(EngineError::FetchFailure(format!(
                "provider returned no chart for '{}'",
                symbol
            )))
        }
    };

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(OhlcvSeries::empty()),
    };
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|c| c.adjclose)
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let date = match DateTime::from_timestamp(ts + result.meta.gmt_offset, 0) {
            Some(dt) => dt.date_naive(),
            None => continue,
        };
        if !range.contains(date) {
            continue;
        }

        let column = |values: &[Option<f64>]| values.get(i).copied().flatten();
        let (open, high, low, close) = match (
            column(&quote.open),
            column(&quote.high),
            column(&quote.low),
            column(&quote.close),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };

        let ratio = match column(&adjclose) {
            Some(adj) if close != 0.0 => adj / close,
            _ => 1.0,
        };

        bars.push(Bar {
            date,
            open: open * ratio,
            high: high * ratio,
            low: low * ratio,
            close: close * ratio,
            volume: column(&quote.volume).unwrap_or(0.0),
        });
    }

    Ok(OhlcvSeries::from_unsorted(bars))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wide_range() -> DateRange {
        DateRange { start: date(2024, 1, 1), end: date(2024, 2, 1) }
    }

    // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC (09:30 New York)
    const PAYLOAD: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "currency": "USD", "symbol": "AAPL", "gmtoffset": -18000, "timezone": "EST" },
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, 110.0, null],
                        "high":   [104.0, 112.0, 130.0],
                        "low":    [ 99.0, 108.0, 120.0],
                        "close":  [102.0, 111.0, 125.0],
                        "volume": [1000, 2000, 3000]
                    }],
                    "adjclose": [{ "adjclose": [51.0, 111.0, 125.0] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_auto_adjusts_and_drops_incomplete_rows() {
        let series = parse_chart("AAPL", PAYLOAD, wide_range()).unwrap();
        assert_eq!(series.len(), 2);

        let first = series.bars()[0];
        assert_eq!(first.date, date(2024, 1, 2));
        // adjclose / close = 0.5
        assert!((first.open - 50.0).abs() < 1e-9);
        assert!((first.high - 52.0).abs() < 1e-9);
        assert!((first.low - 49.5).abs() < 1e-9);
        assert!((first.close - 51.0).abs() < 1e-9);
        assert_eq!(first.volume, 1000.0);

        let second = series.bars()[1];
        assert_eq!(second.date, date(2024, 1, 3));
        assert_eq!(second.close, 111.0);
    }

    #[test]
    fn test_parse_chart_filters_to_range() {
        let range = DateRange { start: date(2024, 1, 3), end: date(2024, 1, 4) };
        let series = parse_chart("AAPL", PAYLOAD, range).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].date, date(2024, 1, 3));
    }

    #[test]
    fn test_parse_chart_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart("ZZZZ", body, wide_range()).unwrap_err();
        assert!(matches!(err, EngineError::FetchFailure(_)));
        assert!(err.to_string().contains("symbol may be delisted"));
        assert_eq!(
            provider_error_description(body).as_deref(),
            Some("No data found, symbol may be delisted")
        );
    }

    #[test]
    fn test_parse_chart_without_rows_is_empty() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let series = parse_chart("BTC-USD", body, wide_range()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_chart_garbage_is_fetch_failure() {
        let err = parse_chart("AAPL", "<html>Too Many Requests</html>", wide_range()).unwrap_err();
        assert!(matches!(err, EngineError::Json { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::FetchFailure);
    }

    #[test]
    fn test_chart_url_encodes_symbol_and_range() {
        let fetcher = YahooFetcher::new(&ProviderSettings::default()).unwrap();
        let url = fetcher.chart_url("^GSPC", DateRange { start: date(2024, 1, 1), end: date(2024, 1, 2) });
        assert!(url.starts_with("https://query1.finance.yahoo.com/v8/finance/chart/%5EGSPC?"));
        assert!(url.contains("period1=1703980800"));
        assert!(url.contains("period2=1704153600"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn test_first_session_east_of_utc_is_requested_and_kept() {
        // Tokyo sessions at local midnight: 2024-01-03 and 2024-01-04 (UTC+9)
        let body = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":32400},
            "timestamp":[1704207600,1704294000],
            "indicators":{"quote":[{
                "open":[10.0,11.0],"high":[10.0,11.0],"low":[10.0,11.0],
                "close":[10.0,11.0],"volume":[5,6]}]}}],"error":null}}"#;
        let range = DateRange { start: date(2024, 1, 4), end: date(2024, 1, 5) };

        let fetcher = YahooFetcher::new(&ProviderSettings::default()).unwrap();
        let url = fetcher.chart_url("7203.T", range);
        let period1: i64 = url
            .split("period1=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert!(period1 <= 1704294000, "period1 {} skips the first session", period1);

        let series = parse_chart("7203.T", body, range).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].date, date(2024, 1, 4));
        assert_eq!(series.bars()[0].close, 11.0);
    }
}
