// Optional rescaling of prices into another display currency
use crate::error::{EngineError, Result};
use serde::Deserialize;
use shared::models::{Bar, OhlcvSeries};

/// Display label plus the static multiplier applied to OHLC prices.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrencyProfile {
    pub label: String,
    #[serde(default = "default_factor")]
    pub factor: f64,
}

fn default_factor() -> f64 {
    1.0
}

impl CurrencyProfile {
    pub fn new(label: impl Into<String>, factor: f64) -> Result<Self> {
        let profile = Self { label: label.into(), factor };
        profile.validate()?;
        Ok(profile)
    }

    pub fn usd() -> Self {
        Self { label: "$".to_string(), factor: 1.0 }
    }

    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(EngineError::Config("currency label must not be empty".to_string()));
        }
        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Err(EngineError::Config(format!(
                "conversion factor must be a positive number, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

impl Default for CurrencyProfile {
    fn default() -> Self {
        Self::usd()
    }
}

/// Scales open/high/low/close by `factor`; volume is a share count and stays as is.
pub fn adjust(series: &OhlcvSeries, factor: f64) -> OhlcvSeries {
    if factor == 1.0 {
        return series.clone();
    }
    let bars = series
        .bars()
        .iter()
        .map(|bar| Bar {
            open: bar.open * factor,
            high: bar.high * factor,
            low: bar.low * factor,
            close: bar.close * factor,
            ..*bar
        })
        .collect();
    OhlcvSeries::from_unsorted(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> OhlcvSeries {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        OhlcvSeries::from_unsorted(vec![
            Bar { date: d(2), open: 10.0, high: 12.0, low: 9.5, close: 11.0, volume: 1_000.0 },
            Bar { date: d(3), open: 11.0, high: 11.5, low: 10.0, close: 10.25, volume: 2_500.0 },
        ])
    }

    #[test]
    fn test_factor_one_is_identity() {
        let series = sample();
        assert_eq!(adjust(&series, 1.0), series);
    }

    #[test]
    fn test_scales_prices_not_volume() {
        let series = sample();
        let scaled = adjust(&series, 82.5);
        for (orig, new) in series.bars().iter().zip(scaled.bars()) {
            assert_eq!(new.date, orig.date);
            assert_eq!(new.open, orig.open * 82.5);
            assert_eq!(new.high, orig.high * 82.5);
            assert_eq!(new.low, orig.low * 82.5);
            assert_eq!(new.close, orig.close * 82.5);
            assert_eq!(new.volume, orig.volume);
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let series = sample();
        let before = series.clone();
        let _ = adjust(&series, 2.0);
        assert_eq!(series, before);
    }

    #[test]
    fn test_empty_series() {
        assert!(adjust(&OhlcvSeries::empty(), 3.0).is_empty());
    }

    #[test]
    fn test_profile_validation() {
        assert!(CurrencyProfile::new("₹", 82.5).is_ok());
        assert!(matches!(CurrencyProfile::new("₹", 0.0), Err(EngineError::Config(_))));
        assert!(matches!(CurrencyProfile::new("₹", f64::NAN), Err(EngineError::Config(_))));
        assert!(matches!(CurrencyProfile::new(" ", 1.0), Err(EngineError::Config(_))));
        assert_eq!(CurrencyProfile::default(), CurrencyProfile::usd());
    }
}
