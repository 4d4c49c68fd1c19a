//! Price history — per-symbol time-ordered close series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Symbol;

/// One observed daily close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: f64,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("out-of-order observation for {symbol}: {date} does not advance past {prev}")]
    OutOfOrder {
        symbol: String,
        date: NaiveDate,
        prev: NaiveDate,
    },
}

/// Time-ordered close table, one series per symbol.
///
/// Observation dates within a series are strictly increasing; `push` rejects
/// anything else. Symbols iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    series: BTreeMap<Symbol, Vec<ClosePoint>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation to a symbol's series.
    pub fn push(&mut self, symbol: &str, date: NaiveDate, close: f64) -> Result<(), HistoryError> {
        let series = self.series.entry(symbol.to_string()).or_default();
        if let Some(last) = series.last() {
            if date <= last.date {
                return Err(HistoryError::OutOfOrder {
                    symbol: symbol.to_string(),
                    date,
                    prev: last.date,
                });
            }
        }
        series.push(ClosePoint { date, close });
        Ok(())
    }

    /// The close series for a symbol, oldest first.
    pub fn closes(&self, symbol: &str) -> Option<&[ClosePoint]> {
        self.series.get(symbol).map(|s| s.as_slice())
    }

    /// Number of observations for a symbol.
    pub fn observations(&self, symbol: &str) -> usize {
        self.series.get(symbol).map_or(0, |s| s.len())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.series.keys()
    }

    /// True when the table holds no observations at all.
    pub fn is_empty(&self) -> bool {
        self.series.values().all(|s| s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn push_and_read_back() {
        let mut history = PriceHistory::new();
        history.push("AAPL", d(2024, 1, 2), 185.0).unwrap();
        history.push("AAPL", d(2024, 1, 3), 186.5).unwrap();

        let closes = history.closes("AAPL").unwrap();
        assert_eq!(closes.len(), 2);
        assert_eq!(closes[1].close, 186.5);
        assert_eq!(history.observations("AAPL"), 2);
        assert!(!history.is_empty());
    }

    #[test]
    fn rejects_stale_or_duplicate_dates() {
        let mut history = PriceHistory::new();
        history.push("AAPL", d(2024, 1, 3), 186.5).unwrap();

        assert!(history.push("AAPL", d(2024, 1, 3), 187.0).is_err());
        assert!(history.push("AAPL", d(2024, 1, 2), 185.0).is_err());
        // Other symbols are unaffected.
        assert!(history.push("MSFT", d(2024, 1, 2), 370.0).is_ok());
    }

    #[test]
    fn empty_table_reports_empty() {
        let history = PriceHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.observations("AAPL"), 0);
        assert!(history.closes("AAPL").is_none());
    }
}
