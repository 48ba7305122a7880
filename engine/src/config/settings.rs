// Engine settings: provider selection and the per-front-end dashboard profiles.
use crate::data::currency::CurrencyProfile;
use crate::error::{EngineError, Result};
use serde::Deserialize;
use shared::models::{AssetClass, TimeFrame};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.json");

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    pub provider: ProviderSettings,
    pub dashboards: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Csv,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Directory of `<SYMBOL>.csv` files, used by the csv provider.
    #[serde(default)]
    pub csv_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; trend-dashboard/0.1)".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            kind: ProviderKind::Yahoo,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            csv_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub stock: DashboardProfile,
    pub crypto: DashboardProfile,
    pub multi_asset: MultiAssetProfile,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardProfile {
    pub title: String,
    pub default_symbol: String,
    pub default_time_frame: TimeFrame,
    #[serde(default)]
    pub currency: CurrencyProfile,
}

/// One dashboard where the user picks the asset class, each with its own currency pairing.
#[derive(Debug, Deserialize, Clone)]
pub struct MultiAssetProfile {
    pub title: String,
    pub stock: DashboardProfile,
    pub crypto: DashboardProfile,
}

impl MultiAssetProfile {
    pub fn for_asset(&self, asset: AssetClass) -> &DashboardProfile {
        match asset {
            AssetClass::Stock => &self.stock,
            AssetClass::Crypto => &self.crypto,
        }
    }
}

impl EngineSettings {
    /// Reads a JSON settings file, or the built-in defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    EngineError::Config(format!("cannot read settings file {}: {}", path.display(), e))
                })?;
                Self::from_json(&raw)?
            }
            None => Self::from_json(DEFAULT_CONFIG)?,
        };
        tracing::debug!(provider = ?settings.provider.kind, "Loaded engine settings");
        Ok(settings)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(raw)
            .map_err(|e| EngineError::Config(format!("invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.provider.timeout_ms == 0 {
            return Err(EngineError::Config("provider timeout_ms must be greater than 0".to_string()));
        }
        if self.provider.kind == ProviderKind::Csv && self.provider.csv_dir.is_none() {
            return Err(EngineError::Config("csv provider requires csv_dir".to_string()));
        }
        let d = &self.dashboards;
        for profile in [&d.stock, &d.crypto, &d.multi_asset.stock, &d.multi_asset.crypto] {
            if profile.default_symbol.trim().is_empty() {
                return Err(EngineError::Config(format!(
                    "dashboard '{}' has an empty default symbol",
                    profile.title
                )));
            }
            profile.currency.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_embedded_defaults_parse() {
        let settings = EngineSettings::from_json(DEFAULT_CONFIG).unwrap();
        assert_eq!(settings.provider.kind, ProviderKind::Yahoo);
        assert_eq!(settings.provider.timeout_ms, 10_000);

        let d = &settings.dashboards;
        assert_eq!(d.stock.default_symbol, "AAPL");
        assert_eq!(d.stock.currency.label, "₹");
        assert_eq!(d.stock.currency.factor, 1.0);
        assert_eq!(d.crypto.default_symbol, "BTC-USD");
        assert_eq!(d.crypto.currency.label, "$");
        assert_eq!(d.stock.default_time_frame, TimeFrame::Max);

        let stock = d.multi_asset.for_asset(AssetClass::Stock);
        assert_eq!(stock.currency.factor, 82.5);
        let crypto = d.multi_asset.for_asset(AssetClass::Crypto);
        assert_eq!(crypto.currency.factor, 1.0);
        assert_eq!(crypto.default_symbol, "BTC-USD");
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let settings = EngineSettings::load(None).unwrap();
        let d = &settings.dashboards;
        assert_eq!(d.crypto.title, "Cryptocurrency Trend Analysis");
        assert_eq!(d.stock.currency.label, "₹");
        assert_eq!(d.multi_asset.for_asset(AssetClass::Stock).currency.label, "₹");
        assert_eq!(d.multi_asset.for_asset(AssetClass::Stock).currency.factor, 82.5);
    }

    #[test]
    fn test_load_from_file() {
        let raw = DEFAULT_CONFIG
            .replace("\"yahoo\"", "\"csv\"")
            .replace("\"timeout_ms\": 10000", "\"timeout_ms\": 500, \"csv_dir\": \"/data\"");
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", raw).unwrap();
        let settings = EngineSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.provider.kind, ProviderKind::Csv);
        assert_eq!(settings.provider.timeout_ms, 500);
        assert_eq!(settings.provider.csv_dir, Some(PathBuf::from("/data")));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = EngineSettings::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_conversion_factor() {
        let raw = DEFAULT_CONFIG.replace("\"factor\": 82.5", "\"factor\": -1.0");
        assert!(matches!(EngineSettings::from_json(&raw), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_time_frame() {
        let raw = DEFAULT_CONFIG.replacen("\"default_time_frame\": \"max\"", "\"default_time_frame\": \"1w\"", 1);
        assert!(matches!(EngineSettings::from_json(&raw), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_csv_provider_requires_directory() {
        let raw = DEFAULT_CONFIG.replace("\"yahoo\"", "\"csv\"");
        assert!(matches!(EngineSettings::from_json(&raw), Err(EngineError::Config(_))));
    }
}
