// One dashboard refresh: resolve -> fetch -> adjust -> summarize / moving averages.
use crate::data::currency::{self, CurrencyProfile};
use crate::data::market_data::MarketDataFetcher;
use crate::data::time_frame;
use crate::error::{EngineError, Result};
use crate::indicators;
use chrono::NaiveDate;
use shared::models::{Dashboard, TimeFrame};

/// Caller selection for one refresh. `now` is injected so runs are reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub symbol: String,
    pub time_frame: TimeFrame,
    pub currency: CurrencyProfile,
    pub now: NaiveDate,
}

pub struct TrendPipeline<F> {
    fetcher: F,
}

impl<F: MarketDataFetcher> TrendPipeline<F> {
    pub fn new(fetcher: F) -> Self {
        TrendPipeline { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs every stage or fails with the first error; there is no partial dashboard.
    pub async fn run(&self, request: &DashboardRequest) -> Result<Dashboard> {
        let symbol = request.symbol.trim();
        if symbol.is_empty() {
            return Err(EngineError::InvalidArgument("symbol must not be empty".to_string()));
        }
        tracing::info!(
            symbol = %symbol,
            time_frame = %request.time_frame,
            provider = %self.fetcher.name(),
            "Received dashboard request"
        );

        let range = time_frame::resolve(request.time_frame, request.now);
        tracing::debug!(symbol = %symbol, start = %range.start, end = %range.end, "Resolved date range");

        let fetched = self.fetcher.fetch(symbol, range).await?;
        if fetched.is_empty() {
            tracing::warn!(symbol = %symbol, start = %range.start, end = %range.end, "Provider returned no bars");
            return Err(EngineError::InsufficientData(format!(
                "no data for '{}' between {} and {}",
                symbol, range.start, range.end
            )));
        }

        let series = currency::adjust(&fetched, request.currency.factor);
        let statistics = indicators::summarize(&series)?;
        let moving_averages = indicators::moving_averages(&series);

        tracing::info!(symbol = %symbol, bars = series.len(), "Dashboard prepared");

        Ok(Dashboard {
            symbol: symbol.to_string(),
            time_frame: request.time_frame,
            range,
            currency_label: request.currency.label.clone(),
            series,
            statistics,
            moving_averages,
        })
    }
}
