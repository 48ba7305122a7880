use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One daily OHLCV record as returned by a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars for a single instrument, ascending by date with no duplicate dates.
///
/// The ordering is what every rolling and statistical computation downstream
/// relies on, so the only way to build a series is through
/// [`OhlcvSeries::from_unsorted`], which restores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OhlcvSeries {
    bars: Vec<Bar>,
}

impl OhlcvSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorts by date and collapses duplicated dates, keeping the bar seen last.
    pub fn from_unsorted(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|bar| bar.date);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn head(&self, n: usize) -> &[Bar] {
        &self.bars[..n.min(self.bars.len())]
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|bar| bar.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|bar| bar.date)
    }
}

/// Symbolic look-back window picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl TimeFrame {
    /// All tokens in the order the selectors list them.
    pub const ALL: [TimeFrame; 9] = [
        TimeFrame::OneDay,
        TimeFrame::FiveDays,
        TimeFrame::OneMonth,
        TimeFrame::ThreeMonths,
        TimeFrame::SixMonths,
        TimeFrame::OneYear,
        TimeFrame::TwoYears,
        TimeFrame::FiveYears,
        TimeFrame::Max,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            TimeFrame::OneDay => "1d",
            TimeFrame::FiveDays => "5d",
            TimeFrame::OneMonth => "1mo",
            TimeFrame::ThreeMonths => "3mo",
            TimeFrame::SixMonths => "6mo",
            TimeFrame::OneYear => "1y",
            TimeFrame::TwoYears => "2y",
            TimeFrame::FiveYears => "5y",
            TimeFrame::Max => "max",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized time frame '{0}' (expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, max)")]
pub struct ParseTimeFrameError(pub String);

impl FromStr for TimeFrame {
    type Err = ParseTimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        TimeFrame::ALL
            .into_iter()
            .find(|tf| tf.token() == token)
            .ok_or_else(|| ParseTimeFrameError(s.to_string()))
    }
}

/// Calendar-date window handed to the provider. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stock,
    Crypto,
}

impl AssetClass {
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Stock => "Stock",
            AssetClass::Crypto => "Crypto",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized asset class '{0}' (expected stock or crypto)")]
pub struct ParseAssetClassError(pub String);

impl FromStr for AssetClass {
    type Err = ParseAssetClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Ok(AssetClass::Stock),
            "crypto" => Ok(AssetClass::Crypto),
            _ => Err(ParseAssetClassError(s.to_string())),
        }
    }
}

/// Descriptive statistics over the close column.
///
/// `stddev` and `mean_pct_change` are `None` when fewer than two closes exist;
/// renderers show that as "no data", never as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub stddev: Option<f64>,
    pub mean_pct_change: Option<f64>,
}

/// 50- and 200-day simple moving averages, aligned by position with the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub ma50: Vec<Option<f64>>,
    pub ma200: Vec<Option<f64>>,
}

/// Everything a renderer needs for one dashboard refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub symbol: String,
    pub time_frame: TimeFrame,
    pub range: DateRange,
    pub currency_label: String,
    pub series: OhlcvSeries,
    pub statistics: SummaryStatistics,
    pub moving_averages: MovingAverages,
}
