use crate::data::market_data::{FetchFuture, MarketDataFetcher};
use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use shared::models::{Bar, DateRange, OhlcvSeries};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Offline provider reading `<dir>/<SYMBOL>.csv` history exports.
///
/// CSV Header: Date,Open,High,Low,Close,Volume (extra columns such as
/// Dividends or Stock Splits are ignored, header match is case-insensitive).
/// Example Row: 2024-01-02 00:00:00-05:00,187.15,188.44,183.89,185.64,82488700
#[derive(Debug, Clone)]
pub struct CsvFetcher {
    dir: PathBuf,
}

impl CsvFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> Result<PathBuf> {
        if symbol.contains(['/', '\\']) || symbol.contains("..") {
            return Err(EngineError::InvalidArgument(format!(
                "symbol '{}' cannot be used as a file name",
                symbol
            )));
        }
        Ok(self.dir.join(format!("{}.csv", symbol)))
    }

    pub fn load_series(&self, symbol: &str, range: DateRange) -> Result<OhlcvSeries> {
        let path = self.path_for(symbol)?;
        if !path.is_file() {
            return Err(EngineError::FetchFailure(format!(
                "unknown symbol '{}': no file at {}",
                symbol,
                path.display()
            )));
        }
        let bars = load_bars_from_csv(&path)?;
        let in_range = bars.into_iter().filter(|bar| range.contains(bar.date)).collect();
        Ok(OhlcvSeries::from_unsorted(in_range))
    }
}

impl MarketDataFetcher for CsvFetcher {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch<'a>(&'a self, symbol: &'a str, range: DateRange) -> FetchFuture<'a> {
        Box::pin(async move {
            let series = self.load_series(symbol, range)?;
            tracing::debug!(symbol = %symbol, dir = %self.dir.display(), count = series.len(), "Loaded bars from CSV");
            Ok(series)
        })
    }
}

pub fn load_bars_from_csv(file_path: &Path) -> Result<Vec<Bar>> {
    let file = File::open(file_path)?;
    read_bars(BufReader::new(file))
}

pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut bars = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let record = result?;

        let date_str = required_field(&record, &headers, "Date", line)?;
        let date = parse_date(date_str).ok_or_else(|| {
            EngineError::FetchFailure(format!("Error parsing 'Date' at line {}: '{}'", line, date_str))
        })?;

        let open = parse_number(&record, &headers, "Open", line)?;
        let high = parse_number(&record, &headers, "High", line)?;
        let low = parse_number(&record, &headers, "Low", line)?;
        let close = parse_number(&record, &headers, "Close", line)?;
        let volume = parse_number(&record, &headers, "Volume", line)?;

        bars.push(Bar { date, open, high, low, close, volume });
    }
    Ok(bars)
}

// Dates may carry a time and offset suffix; the calendar date is the first ten characters.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_number(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
    let raw = required_field(record, headers, name, line)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            EngineError::FetchFailure(format!("Error parsing '{}' at line {}: '{}'", name, line, raw))
        })
}

fn required_field<'a>(
    record: &'a StringRecord,
    headers: &StringRecord,
    name: &str,
    line: usize,
) -> Result<&'a str> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
        .and_then(|pos| record.get(pos))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            EngineError::FetchFailure(format!("Missing '{}' field in CSV record at line {}", name, line))
        })
}
