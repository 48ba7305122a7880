// Provider contract for daily OHLCV history, plus an in-memory provider.
use crate::error::{EngineError, Result};
use shared::models::{Bar, DateRange, OhlcvSeries};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<OhlcvSeries>> + Send + 'a>>;

/// Source of split/dividend adjusted daily bars.
///
/// Implementations return bars dated inside `range` (end exclusive), ascending,
/// or fail with [`EngineError::FetchFailure`]. An empty series is a valid answer
/// and is left for the caller to judge. Nothing is retried here.
pub trait MarketDataFetcher: Send + Sync {
    fn name(&self) -> &str;

    fn fetch<'a>(&'a self, symbol: &'a str, range: DateRange) -> FetchFuture<'a>;
}

impl<T: MarketDataFetcher + ?Sized> MarketDataFetcher for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch<'a>(&'a self, symbol: &'a str, range: DateRange) -> FetchFuture<'a> {
        (**self).fetch(symbol, range)
    }
}

/// Bars held in memory per symbol. Unknown symbols fail like they would upstream.
#[derive(Debug, Default, Clone)]
pub struct MarketDataStore {
    data: HashMap<String, OhlcvSeries>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bars(&mut self, symbol: &str, new_bars: Vec<Bar>) {
        let mut bars = self
            .data
            .remove(symbol)
            .map(|s| s.bars().to_vec())
            .unwrap_or_default();
        bars.extend(new_bars);
        self.data.insert(symbol.to_string(), OhlcvSeries::from_unsorted(bars));
    }

    pub fn get_bars(&self, symbol: &str, range: DateRange) -> Option<OhlcvSeries> {
        self.data.get(symbol).map(|series| {
            OhlcvSeries::from_unsorted(
                series
                    .bars()
                    .iter()
                    .filter(|bar| range.contains(bar.date))
                    .copied()
                    .collect(),
            )
        })
    }
}

impl MarketDataFetcher for MarketDataStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch<'a>(&'a self, symbol: &'a str, range: DateRange) -> FetchFuture<'a> {
        Box::pin(async move {
            self.get_bars(symbol, range).ok_or_else(|| {
                EngineError::FetchFailure(format!("unknown symbol '{}'", symbol))
            })
        })
    }
}
