//! Market-data collaborators: price source and market clock.
//!
//! The `PriceSource` trait abstracts over data feeds (synthetic random walk,
//! CSV directory) so the controller can swap implementations and tests can
//! mock them. Sources may return partial quote maps — a missing symbol is a
//! per-symbol degradation, not a failure of the whole fetch.

pub mod clock;
pub mod csv_dir;
pub mod history;
pub mod synthetic;

pub use clock::{AlwaysOpenClock, UsEquityClock};
pub use csv_dir::CsvDirSource;
pub use history::{ClosePoint, HistoryError, PriceHistory};
pub use synthetic::SyntheticSource;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::Symbol;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("price source returned no data")]
    NoData,

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("price source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Trait for price feeds.
///
/// `current_prices` may return a partial map (failed symbols are simply
/// absent); `history` returns a time-ordered close table for signal
/// generation. Neither call is allowed to invent a price.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fresh quotes for the given symbols, possibly partial.
    fn current_prices(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, f64>, DataError>;

    /// Daily close history over the last `lookback_days` calendar days.
    fn history(&self, symbols: &[Symbol], lookback_days: u32) -> Result<PriceHistory, DataError>;
}

/// Trait for market-hours determination. Time is injected, never sampled.
pub trait MarketClock: Send + Sync {
    fn is_open(&self, now: DateTime<Utc>) -> bool;
}
