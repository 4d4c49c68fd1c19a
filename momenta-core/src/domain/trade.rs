//! Trade and valuation records — immutable once appended to the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Symbol;

/// A single executed trade.
///
/// `shares` is the signed delta (positive = buy, negative = sell/short).
/// `cash_after` is the ledger's cash balance immediately after the trade
/// settled, so the trade history doubles as a cash audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub timestamp: DateTime<Utc>,
    pub symbol: Symbol,
    pub shares: i64,
    pub price: f64,
    /// Notional cost of the trade: `shares * price`.
    pub cost: f64,
    pub cash_after: f64,
}

impl Trade {
    pub fn is_buy(&self) -> bool {
        self.shares > 0
    }
}

/// Portfolio valuation at a single instant.
///
/// Appended exactly once per rebalance call, after all trades of that call
/// have settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub timestamp: DateTime<Utc>,
    /// Total portfolio value: cash + Σ position × price.
    pub value: f64,
    /// Cumulative return relative to initial capital, in percent.
    pub return_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_sell_classification() {
        let trade = Trade {
            timestamp: Utc::now(),
            symbol: "AAPL".into(),
            shares: 10,
            price: 100.0,
            cost: 1000.0,
            cash_after: 99_000.0,
        };
        assert!(trade.is_buy());

        let sell = Trade { shares: -10, ..trade };
        assert!(!sell.is_buy());
    }
}
