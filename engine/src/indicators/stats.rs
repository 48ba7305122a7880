// Descriptive statistics over the close column
use crate::error::{EngineError, Result};
use shared::models::{OhlcvSeries, SummaryStatistics};

pub fn summarize(series: &OhlcvSeries) -> Result<SummaryStatistics> {
    let closes = series.closes();
    if closes.is_empty() {
        return Err(EngineError::InsufficientData(
            "no bars returned for the requested range".to_string(),
        ));
    }

    let mut sorted = closes.clone();
    sorted.sort_by(f64::total_cmp);

    Ok(SummaryStatistics {
        max: sorted[sorted.len() - 1],
        min: sorted[0],
        mean: mean(&closes),
        median: quantile(&sorted, 0.5),
        p25: quantile(&sorted, 0.25),
        p75: quantile(&sorted, 0.75),
        stddev: sample_stddev(&closes),
        mean_pct_change: mean_pct_change(&closes),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Linear-interpolation quantile over already sorted, non-empty data.
pub fn quantile(sorted: &[f64], fraction: f64) -> f64 {
    let pos = fraction * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Divisor n - 1; undefined below two points.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Mean day-over-day change in percent. 0/0 terms are skipped; none left means undefined.
pub fn mean_pct_change(values: &[f64]) -> Option<f64> {
    let changes: Vec<f64> = values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|c| !c.is_nan())
        .collect();
    if changes.is_empty() {
        return None;
    }
    Some(mean(&changes) * 100.0)
}
