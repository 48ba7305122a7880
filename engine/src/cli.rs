// Shared runner behind the three dashboard binaries. Each binary only picks a FrontEnd.
use crate::config::settings::{DashboardProfile, DashboardSettings, EngineSettings, ProviderKind};
use crate::data::fetcher_from_settings;
use crate::services::dashboard::{DashboardRequest, TrendPipeline};
use crate::services::report;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser};
use shared::models::{AssetClass, TimeFrame};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Ticker to chart, e.g. AAPL or BTC-USD (defaults to the dashboard's symbol)
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// One of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, max
    #[arg(short = 't', long = "time-frame")]
    pub time_frame: Option<TimeFrame>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long = "as-of")]
    pub as_of: Option<NaiveDate>,

    /// Print the dashboard as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Settings file overriding the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read <SYMBOL>.csv files from this directory instead of calling the provider
    #[arg(long = "csv-dir")]
    pub csv_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Parser)]
#[command(version, about = "Historical price and volume trend dashboard")]
pub struct SingleAssetCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Parser)]
#[command(version, about = "Trend dashboard for stocks or cryptocurrencies")]
pub struct MultiAssetCli {
    /// Asset class selecting the default symbol and currency pairing
    #[arg(short, long, default_value = "stock")]
    pub asset: AssetClass,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEnd {
    Stock,
    Crypto,
    MultiAsset(AssetClass),
}

impl FrontEnd {
    pub fn profile<'a>(&self, dashboards: &'a DashboardSettings) -> &'a DashboardProfile {
        match self {
            FrontEnd::Stock => &dashboards.stock,
            FrontEnd::Crypto => &dashboards.crypto,
            FrontEnd::MultiAsset(asset) => dashboards.multi_asset.for_asset(*asset),
        }
    }
}

pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

/// Applies command-line overrides to the loaded settings.
pub fn load_settings(args: &CommonArgs) -> crate::error::Result<EngineSettings> {
    let mut settings = EngineSettings::load(args.config.as_deref())?;
    if let Some(dir) = &args.csv_dir {
        settings.provider.kind = ProviderKind::Csv;
        settings.provider.csv_dir = Some(dir.clone());
    }
    Ok(settings)
}

/// Title and request for one refresh from the front-end profile plus user input.
pub fn build_request(
    front_end: FrontEnd,
    args: &CommonArgs,
    settings: &EngineSettings,
    today: NaiveDate,
) -> (String, DashboardRequest) {
    let profile = front_end.profile(&settings.dashboards);
    let request = DashboardRequest {
        symbol: args.symbol.clone().unwrap_or_else(|| profile.default_symbol.clone()),
        time_frame: args.time_frame.unwrap_or(profile.default_time_frame),
        currency: profile.currency.clone(),
        now: args.as_of.unwrap_or(today),
    };
    (profile.title.clone(), request)
}

pub async fn run(front_end: FrontEnd, args: CommonArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args).context("failed to load settings")?;
    let fetcher = fetcher_from_settings(&settings.provider).context("failed to set up market data provider")?;
    let pipeline = TrendPipeline::new(fetcher);

    let today = chrono::Local::now().date_naive();
    let (title, request) = build_request(front_end, &args, &settings, today);

    let dashboard = match pipeline.run(&request).await {
        Ok(dashboard) => dashboard,
        Err(e) => {
            tracing::error!(symbol = %request.symbol, error_detail = ?e, "Dashboard refresh failed");
            anyhow::bail!(report::render_failure(&e));
        }
    };

    if args.json {
        println!("{}", report::render_json(&dashboard)?);
    } else {
        print!("{}", report::render_text(&title, &dashboard, report::HEAD_ROWS));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_single_asset_defaults() {
        let cli = SingleAssetCli::try_parse_from(["stock-dashboard"]).unwrap();
        let settings = EngineSettings::load(None).unwrap();
        let (title, request) = build_request(FrontEnd::Stock, &cli.common, &settings, today());
        assert_eq!(title, "Stock Trend Analysis");
        assert_eq!(request.symbol, "AAPL");
        assert_eq!(request.time_frame, TimeFrame::Max);
        assert_eq!(request.currency.label, "₹");
        assert_eq!(request.currency.factor, 1.0);
        assert_eq!(request.now, today());
    }

    #[test]
    fn test_crypto_overrides() {
        let cli = SingleAssetCli::try_parse_from([
            "crypto-dashboard", "--symbol", "ETH-USD", "-t", "6mo", "--as-of", "2023-12-31", "--json",
        ])
        .unwrap();
        let settings = EngineSettings::load(None).unwrap();
        let (_, request) = build_request(FrontEnd::Crypto, &cli.common, &settings, today());
        assert_eq!(request.symbol, "ETH-USD");
        assert_eq!(request.time_frame, TimeFrame::SixMonths);
        assert_eq!(request.now, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(request.currency.label, "$");
        assert!(cli.common.json);
    }

    #[test]
    fn test_multi_asset_picks_currency_pairing() {
        let cli = MultiAssetCli::try_parse_from(["trend-dashboard"]).unwrap();
        assert_eq!(cli.asset, AssetClass::Stock);
        let settings = EngineSettings::load(None).unwrap();
        let (title, request) = build_request(FrontEnd::MultiAsset(cli.asset), &cli.common, &settings, today());
        assert_eq!(title, "Trend Analysis for Stock");
        assert_eq!(request.currency.factor, 82.5);

        let cli = MultiAssetCli::try_parse_from(["trend-dashboard", "--asset", "crypto"]).unwrap();
        let (_, request) = build_request(FrontEnd::MultiAsset(cli.asset), &cli.common, &settings, today());
        assert_eq!(request.symbol, "BTC-USD");
        assert_eq!(request.currency.factor, 1.0);
    }

    #[test]
    fn test_rejects_unknown_time_frame_flag() {
        assert!(SingleAssetCli::try_parse_from(["stock-dashboard", "-t", "1w"]).is_err());
        assert!(MultiAssetCli::try_parse_from(["trend-dashboard", "--asset", "forex"]).is_err());
    }

    #[test]
    fn test_csv_dir_switches_provider() {
        let cli = SingleAssetCli::try_parse_from(["stock-dashboard", "--csv-dir", "/tmp/prices"]).unwrap();
        let settings = load_settings(&cli.common).unwrap();
        assert_eq!(settings.provider.kind, ProviderKind::Csv);
        assert_eq!(settings.provider.csv_dir, Some(PathBuf::from("/tmp/prices")));
    }
}
