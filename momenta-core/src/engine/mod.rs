//! Rebalance engine — target weights → delta trades → ledger mutation.
//!
//! One call reconciles the ledger against a target-weight map:
//!
//! 1. Value the portfolio at current prices (stale positions count as zero
//!    but are never touched).
//! 2. Convert each weight into a whole-share target, truncating toward zero.
//! 3. Walk the union of held and targeted symbols in lexicographic order and
//!    trade each nonzero delta at the quoted price.
//! 4. Append exactly one valuation record at the post-trade value.
//!
//! Nothing here is fatal: a missing quote skips that symbol for the cycle,
//! and an empty target map produces zero trades, not a liquidation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::domain::{Ledger, Symbol};

/// Outcome of one rebalance call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RebalanceResult {
    /// Number of trades executed; each symbol trades at most once per call.
    pub trades_executed: usize,
    /// Portfolio value before any trade of this call.
    pub total_value_before: f64,
    /// Portfolio value after the reconciliation pass, as recorded in the
    /// ledger's valuation history.
    pub total_value_after: f64,
}

/// Move the ledger toward `targets` at `prices`.
///
/// `targets` maps symbol → desired fraction of total portfolio value in
/// [-1, 1]; an explicit 0.0 closes any held position. Share counts truncate
/// toward zero for longs and shorts alike, so a target never overshoots its
/// weight in either direction.
pub fn rebalance(
    ledger: &mut Ledger,
    targets: &BTreeMap<Symbol, f64>,
    prices: &HashMap<Symbol, f64>,
    timestamp: DateTime<Utc>,
) -> RebalanceResult {
    let total_value_before = ledger.portfolio_value(prices);

    // An empty target map means "no opinion", not "flatten everything":
    // skip the reconciliation pass entirely, keeping the valuation record.
    if targets.is_empty() {
        warn!("empty target weights, holding all positions");
        ledger.record_valuation(timestamp, total_value_before);
        return RebalanceResult {
            trades_executed: 0,
            total_value_before,
            total_value_after: total_value_before,
        };
    }

    let mut target_shares: BTreeMap<Symbol, i64> = BTreeMap::new();
    for (symbol, weight) in targets {
        let Some(&price) = prices.get(symbol) else {
            continue;
        };
        if !price.is_finite() || price == 0.0 {
            continue;
        }
        let raw = total_value_before * weight / price;
        if !raw.is_finite() {
            continue;
        }
        target_shares.insert(symbol.clone(), raw.trunc() as i64);
    }

    // Union of held and targeted symbols; BTreeSet fixes the trade order.
    let universe: BTreeSet<Symbol> = ledger
        .positions()
        .keys()
        .chain(target_shares.keys())
        .cloned()
        .collect();

    let mut trades_executed = 0;
    for symbol in &universe {
        let current = ledger.position(symbol);
        let target = target_shares.get(symbol).copied().unwrap_or(0);
        let delta = target - current;
        if delta == 0 {
            continue;
        }
        match prices.get(symbol) {
            Some(&price) => {
                ledger.execute_trade(symbol, delta, price, timestamp);
                trades_executed += 1;
            }
            None => {
                warn!("no quote for {symbol}, leaving {current} shares untouched this cycle");
            }
        }
    }

    let total_value_after = ledger.portfolio_value(prices);
    ledger.record_valuation(timestamp, total_value_after);
    info!("rebalancing complete: {trades_executed} trades executed");

    RebalanceResult {
        trades_executed,
        total_value_before,
        total_value_after,
    }
}
