//! CSV-directory price source.
//!
//! Layout: `{dir}/{SYMBOL}.csv`, header `date,close`, one row per trading
//! day, oldest first. The last row doubles as the current quote. A missing
//! file means the symbol is absent from the result (partial quotes are fine);
//! a malformed file is a real error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use log::warn;
use serde::Deserialize;

use super::history::PriceHistory;
use super::{DataError, PriceSource};
use crate::domain::Symbol;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: f64,
}

/// Price source backed by a directory of per-symbol CSV files.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// All rows for a symbol, or `None` if the file does not exist.
    fn read_rows(&self, symbol: &str) -> Result<Option<Vec<CsvRow>>, DataError> {
        let path = self.symbol_path(symbol);
        if !path.exists() {
            warn!("no CSV data for {symbol} at {}", path.display());
            return Ok(None);
        }
        let mut reader = csv::Reader::from_path(&path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(Some(rows))
    }
}

impl PriceSource for CsvDirSource {
    fn name(&self) -> &str {
        "csv-dir"
    }

    fn current_prices(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, f64>, DataError> {
        let mut prices = HashMap::new();
        for symbol in symbols {
            if let Some(rows) = self.read_rows(symbol)? {
                if let Some(last) = rows.last() {
                    prices.insert(symbol.clone(), last.close);
                }
            }
        }
        Ok(prices)
    }

    fn history(&self, symbols: &[Symbol], lookback_days: u32) -> Result<PriceHistory, DataError> {
        let mut history = PriceHistory::new();
        for symbol in symbols {
            let Some(rows) = self.read_rows(symbol)? else {
                continue;
            };
            let Some(last) = rows.last() else {
                continue;
            };
            let cutoff = last.date - Duration::days(lookback_days as i64);
            for row in rows.iter().filter(|r| r.date > cutoff) {
                history.push(symbol, row.date, row.close)?;
            }
        }
        Ok(history)
    }
}

/// Directory used by `CsvDirSource`, exposed for CLI validation.
pub fn validate_dir(dir: &Path) -> Result<(), DataError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(DataError::SourceUnavailable(format!(
            "csv directory not found: {}",
            dir.display()
        )))
    }
}
