//! Synthetic price source — seeded per-symbol geometric random walk.
//!
//! Used for offline runs and tests: no network, fully deterministic per
//! (seed, symbol). Quotes and history come from the same walk, so the last
//! historical close always equals the current quote.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::history::{ClosePoint, PriceHistory};
use super::{DataError, PriceSource};
use crate::domain::Symbol;

/// Deterministic random-walk price source.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
    as_of: NaiveDate,
    walk_days: u32,
    daily_drift: f64,
    daily_volatility: f64,
}

impl SyntheticSource {
    /// Walk of `walk_days` daily closes ending at `as_of`.
    pub fn new(seed: u64, as_of: NaiveDate, walk_days: u32) -> Self {
        Self {
            seed,
            as_of,
            walk_days: walk_days.max(1),
            daily_drift: 0.0003,
            daily_volatility: 0.02,
        }
    }

    /// Derive a deterministic sub-seed for one symbol.
    ///
    /// Hash-based derivation keeps sub-seeds stable across toolchain versions
    /// and independent of the order symbols are walked in.
    fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap())
    }

    /// Generate the full walk for one symbol, oldest first.
    fn walk(&self, symbol: &str) -> Vec<ClosePoint> {
        let mut rng = StdRng::seed_from_u64(self.symbol_seed(symbol));
        let mut close = 20.0 + rng.gen::<f64>() * 480.0;
        let start = self.as_of - Duration::days(self.walk_days as i64 - 1);

        (0..self.walk_days)
            .map(|i| {
                let step = self.daily_drift + self.daily_volatility * rng.gen_range(-1.0..1.0);
                close *= 1.0 + step;
                ClosePoint {
                    date: start + Duration::days(i as i64),
                    close,
                }
            })
            .collect()
    }
}

impl PriceSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn current_prices(&self, symbols: &[Symbol]) -> Result<HashMap<Symbol, f64>, DataError> {
        Ok(symbols
            .iter()
            .filter_map(|symbol| {
                self.walk(symbol)
                    .last()
                    .map(|point| (symbol.clone(), point.close))
            })
            .collect())
    }

    fn history(&self, symbols: &[Symbol], lookback_days: u32) -> Result<PriceHistory, DataError> {
        let mut history = PriceHistory::new();
        for symbol in symbols {
            let walk = self.walk(symbol);
            let keep = (lookback_days as usize).min(walk.len());
            for point in &walk[walk.len() - keep..] {
                history.push(symbol, point.date, point.close)?;
            }
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    #[test]
    fn deterministic_per_seed() {
        let universe = vec!["AAPL".to_string(), "MSFT".to_string()];
        let a = SyntheticSource::new(42, as_of(), 365);
        let b = SyntheticSource::new(42, as_of(), 365);

        assert_eq!(a.current_prices(&universe).unwrap(), b.current_prices(&universe).unwrap());
        assert_eq!(a.history(&universe, 90).unwrap(), b.history(&universe, 90).unwrap());
    }

    #[test]
    fn sub_seeds_are_stable_and_order_independent() {
        let source = SyntheticSource::new(42, as_of(), 365);

        let aapl_first = source.symbol_seed("AAPL");
        let msft_second = source.symbol_seed("MSFT");
        let msft_first = source.symbol_seed("MSFT");
        let aapl_second = source.symbol_seed("AAPL");

        assert_eq!(aapl_first, aapl_second);
        assert_eq!(msft_first, msft_second);
        assert_ne!(aapl_first, msft_first);
    }

    #[test]
    fn different_master_seeds_different_walks() {
        let universe = vec!["AAPL".to_string()];
        let a = SyntheticSource::new(42, as_of(), 365);
        let b = SyntheticSource::new(43, as_of(), 365);
        assert_ne!(
            a.current_prices(&universe).unwrap(),
            b.current_prices(&universe).unwrap()
        );
    }

    #[test]
    fn different_symbols_get_different_walks() {
        let source = SyntheticSource::new(42, as_of(), 365);
        let prices = source
            .current_prices(&["AAPL".to_string(), "MSFT".to_string()])
            .unwrap();
        assert_ne!(prices["AAPL"], prices["MSFT"]);
    }

    #[test]
    fn quote_matches_last_historical_close() {
        let universe = vec!["AAPL".to_string()];
        let source = SyntheticSource::new(7, as_of(), 365);

        let quote = source.current_prices(&universe).unwrap()["AAPL"];
        let history = source.history(&universe, 365).unwrap();
        let closes = history.closes("AAPL").unwrap();
        assert_eq!(closes.last().unwrap().close, quote);
        assert_eq!(closes.last().unwrap().date, as_of());
    }

    #[test]
    fn lookback_truncates_the_walk() {
        let universe = vec!["AAPL".to_string()];
        let source = SyntheticSource::new(7, as_of(), 365);
        let history = source.history(&universe, 30).unwrap();
        assert_eq!(history.observations("AAPL"), 30);
    }

    #[test]
    fn prices_stay_positive() {
        let source = SyntheticSource::new(1234, as_of(), 2000);
        let universe = vec!["VOLATILE".to_string()];
        let history = source.history(&universe, 2000).unwrap();
        assert!(history.closes("VOLATILE").unwrap().iter().all(|p| p.close > 0.0));
    }
}
