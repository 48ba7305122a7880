// Everything between the user's selection and a prepared price series:
// date-range resolution, providers, and currency rescaling.
pub mod csv_parser;
pub mod currency;
pub mod market_data;
pub mod time_frame;
pub mod yahoo;

use crate::config::settings::{ProviderKind, ProviderSettings};
use crate::error::{EngineError, Result};
use market_data::MarketDataFetcher;

/// Builds the fetcher named by the provider settings.
pub fn fetcher_from_settings(settings: &ProviderSettings) -> Result<Box<dyn MarketDataFetcher>> {
    match settings.kind {
        ProviderKind::Yahoo => Ok(Box::new(yahoo::YahooFetcher::new(settings)?)),
        ProviderKind::Csv => {
            let dir = settings
                .csv_dir
                .clone()
                .ok_or_else(|| EngineError::Config("csv provider requires csv_dir".to_string()))?;
            Ok(Box::new(csv_parser::CsvFetcher::new(dir)))
        }
    }
}
