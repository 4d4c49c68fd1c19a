//! Ledger — cash, positions, and append-only trade/valuation history.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use super::trade::{Trade, ValuationRecord};
use super::Symbol;

/// The mutable state of the simulated account.
///
/// Invariants:
/// - A position of exactly zero is never stored (absence ≡ zero).
/// - `trade_history` and `value_history` are append-only; insertion order is
///   chronological order.
/// - For every trade, `cash_after == cash_before - shares * price`.
///
/// Cash may go negative — this is paper trading, no margin check is enforced.
/// Positions iterate in lexicographic symbol order (`BTreeMap`), which keeps
/// trade sequencing reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    cash: f64,
    initial_capital: f64,
    positions: BTreeMap<Symbol, i64>,
    trade_history: Vec<Trade>,
    value_history: Vec<ValuationRecord>,
}

impl Ledger {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            positions: BTreeMap::new(),
            trade_history: Vec::new(),
            value_history: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Held shares for a symbol; absent entries are zero.
    pub fn position(&self, symbol: &str) -> i64 {
        self.positions.get(symbol).copied().unwrap_or(0)
    }

    pub fn positions(&self) -> &BTreeMap<Symbol, i64> {
        &self.positions
    }

    pub fn trade_history(&self) -> &[Trade] {
        &self.trade_history
    }

    pub fn value_history(&self) -> &[ValuationRecord] {
        &self.value_history
    }

    /// Total portfolio value: cash + Σ position × price.
    ///
    /// A held symbol missing from `prices` contributes zero to the sum but is
    /// NOT removed — it is treated as a stale quote and left untouched.
    pub fn portfolio_value(&self, prices: &HashMap<Symbol, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(symbol, shares)| *shares as f64 * prices.get(symbol).copied().unwrap_or(0.0))
            .sum();
        self.cash + position_value
    }

    /// Execute a trade of `shares` (signed) at `price`.
    ///
    /// This is the atomic unit of ledger mutation: cash and position update
    /// together, a resulting zero position is pruned, and the trade record is
    /// appended with the post-trade cash balance.
    pub fn execute_trade(&mut self, symbol: &str, shares: i64, price: f64, timestamp: DateTime<Utc>) {
        let cost = shares as f64 * price;
        self.cash -= cost;

        let entry = self.positions.entry(symbol.to_string()).or_insert(0);
        *entry += shares;
        if *entry == 0 {
            self.positions.remove(symbol);
        }

        self.trade_history.push(Trade {
            timestamp,
            symbol: symbol.to_string(),
            shares,
            price,
            cost,
            cash_after: self.cash,
        });

        info!(
            "{} {} shares of {} @ ${:.2}",
            if shares > 0 { "BUY" } else { "SELL" },
            shares.abs(),
            symbol,
            price
        );
    }

    /// Append a valuation record for `value` observed at `timestamp`.
    pub fn record_valuation(&mut self, timestamp: DateTime<Utc>, value: f64) {
        let return_pct = (value / self.initial_capital - 1.0) * 100.0;
        self.value_history.push(ValuationRecord {
            timestamp,
            value,
            return_pct,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(pairs: &[(&str, f64)]) -> HashMap<Symbol, f64> {
        pairs.iter().map(|(s, p)| (s.to_string(), *p)).collect()
    }

    #[test]
    fn fresh_ledger_holds_only_cash() {
        let ledger = Ledger::new(100_000.0);
        assert_eq!(ledger.cash(), 100_000.0);
        assert!(ledger.positions().is_empty());
        assert!(ledger.trade_history().is_empty());
        assert_eq!(ledger.portfolio_value(&HashMap::new()), 100_000.0);
    }

    #[test]
    fn buy_moves_cash_into_position() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.execute_trade("AAPL", 100, 150.0, Utc::now());

        assert_eq!(ledger.cash(), 85_000.0);
        assert_eq!(ledger.position("AAPL"), 100);
        let trade = &ledger.trade_history()[0];
        assert_eq!(trade.cost, 15_000.0);
        assert_eq!(trade.cash_after, 85_000.0);
    }

    #[test]
    fn sell_to_flat_prunes_the_position() {
        let mut ledger = Ledger::new(100_000.0);
        let now = Utc::now();
        ledger.execute_trade("AAPL", 100, 150.0, now);
        ledger.execute_trade("AAPL", -100, 160.0, now);

        assert!(!ledger.positions().contains_key("AAPL"));
        assert_eq!(ledger.position("AAPL"), 0);
        assert_eq!(ledger.cash(), 100_000.0 - 15_000.0 + 16_000.0);
    }

    #[test]
    fn short_position_is_negative() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.execute_trade("TSLA", -50, 200.0, Utc::now());

        assert_eq!(ledger.position("TSLA"), -50);
        // Short sale proceeds are credited to cash.
        assert_eq!(ledger.cash(), 110_000.0);
    }

    #[test]
    fn missing_quote_contributes_zero_to_value() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.execute_trade("AAPL", 100, 150.0, Utc::now());

        // AAPL quote missing: value = cash only, position stays.
        assert_eq!(ledger.portfolio_value(&prices(&[("MSFT", 300.0)])), 85_000.0);
        assert_eq!(ledger.position("AAPL"), 100);

        // With a quote the position is marked at market.
        assert_eq!(
            ledger.portfolio_value(&prices(&[("AAPL", 160.0)])),
            85_000.0 + 16_000.0
        );
    }

    #[test]
    fn valuation_record_tracks_return_against_initial_capital() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.record_valuation(Utc::now(), 110_000.0);

        let record = &ledger.value_history()[0];
        assert_eq!(record.value, 110_000.0);
        assert!((record.return_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn cash_may_go_negative() {
        let mut ledger = Ledger::new(1_000.0);
        ledger.execute_trade("NVDA", 100, 500.0, Utc::now());
        assert_eq!(ledger.cash(), -49_000.0);
    }

    #[test]
    fn snapshot_round_trip() {
        let mut ledger = Ledger::new(100_000.0);
        let now = Utc::now();
        ledger.execute_trade("AAPL", 100, 150.0, now);
        ledger.record_valuation(now, ledger.cash() + 100.0 * 150.0);

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ledger);
    }
}
