//! TOML run configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use momenta_core::schedule::Frequency;
use serde::{Deserialize, Serialize};

/// Where prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Seeded random walk — offline, deterministic.
    Synthetic,
    /// Directory of per-symbol `date,close` CSV files.
    Csv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub source: SourceKind,
    /// Required when `source = "csv"`.
    pub csv_dir: Option<PathBuf>,
    /// Master seed for the synthetic source.
    pub seed: u64,
    /// History window requested for signal generation, in calendar days.
    pub lookback_days: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Synthetic,
            csv_dir: None,
            seed: 42,
            lookback_days: 365,
        }
    }
}

/// Full configuration for a paper-trading run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub tickers: Vec<String>,
    pub initial_capital: f64,
    pub rebalance_frequency: Frequency,
    /// Minutes between trading cycles.
    pub check_interval_minutes: u64,
    /// Ledger snapshot location.
    pub state_path: PathBuf,
    pub data: DataConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tickers: [
                "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "JPM",
                "V", "JNJ", "WMT", "PG", "MA", "UNH", "HD", "BAC",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            initial_capital: 100_000.0,
            rebalance_frequency: Frequency::Monthly,
            check_interval_minutes: 60,
            state_path: PathBuf::from("portfolio_state.json"),
            data: DataConfig::default(),
        }
    }
}

/// Ceiling on the configured cycle interval: one week. Keeps `Instant`
/// deadline arithmetic in range whatever the config says.
const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

impl RunConfig {
    /// Time between trading cycles, clamped to [1 minute, 1 week].
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_minutes.clamp(1, MAX_INTERVAL_MINUTES) * 60)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to render config as TOML")
    }

    /// Default config rendered with a key reference comment, for `init-config`.
    pub fn annotated_default_toml() -> Result<String> {
        let body = Self::default().to_toml()?;
        Ok(format!(
            "# momenta paper-trading configuration\n\
             #\n\
             # tickers                 symbols traded each cycle\n\
             # initial_capital         starting cash for a fresh ledger\n\
             # rebalance_frequency     daily | weekly | monthly\n\
             # check_interval_minutes  minutes between trading cycles\n\
             # state_path              ledger snapshot location\n\
             # data.source             synthetic | csv\n\
             # data.csv_dir            per-symbol CSV directory (csv source only)\n\
             # data.seed               master seed for the synthetic source\n\
             # data.lookback_days      history window for signal generation\n\
             \n{body}"
        ))
    }
}
