// Close-price indicators: moving averages and summary statistics
pub mod sma;
pub mod stats;

pub use sma::{moving_averages, rolling, Sma};
pub use stats::summarize;

use serde_json::Value;
use shared::models::Bar;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>>; // None where the window is not yet full
}
