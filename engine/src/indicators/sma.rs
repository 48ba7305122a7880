// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::{Bar, MovingAverages, OhlcvSeries};

pub const SHORT_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::InvalidArgument(
                "SMA period must be greater than 0".to_string(),
            ));
        }
        Ok(Self::windowed(period))
    }

    fn windowed(period: usize) -> Self {
        Self {
            name: format!("SMA({})", period),
            period,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        rolling(data, self.period)
    }
}

/// Trailing mean of `window` closes, `None` for the first `window - 1` positions.
/// A window longer than the data yields all `None`.
pub fn rolling(data: &[Bar], window: usize) -> Vec<Option<f64>> {
    if window == 0 || data.len() < window {
        return vec![None; data.len()];
    }

    // Each window is summed on its own; a running sum loses small closes after a spike.
    let mut results = vec![None; window - 1];
    results.extend(
        data.windows(window)
            .map(|w| Some(w.iter().map(|b| b.close).sum::<f64>() / window as f64)),
    );
    results
}

/// The two fixed-window averages shown on the moving-average chart.
pub fn moving_averages(series: &OhlcvSeries) -> MovingAverages {
    let short = Sma::windowed(SHORT_WINDOW);
    let long = Sma::windowed(LONG_WINDOW);
    tracing::debug!(short = %short.name(), long = %long.name(), bars = series.len(), "Computing moving averages");
    MovingAverages {
        ma50: short.calculate(series.bars()),
        ma200: long.calculate(series.bars()),
    }
}
