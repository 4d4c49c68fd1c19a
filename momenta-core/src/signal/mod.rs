//! Momentum signal generation.
//!
//! Ranks the universe by 3-month momentum and maps percentile ranks to target
//! weights: top quintile long, bottom quintile short, middle flat. Pure
//! functions of their inputs — no clocks, no I/O.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::{debug, warn};

use crate::data::PriceHistory;
use crate::domain::Symbol;

/// Momentum lookback in observations: close[t] / close[t - 63] - 1.
/// A symbol needs `MOMENTUM_LOOKBACK + 1` rows to be ranked.
pub const MOMENTUM_LOOKBACK: usize = 63;

/// Percentile at or above which a symbol goes long.
pub const LONG_PERCENTILE: f64 = 0.8;

/// Percentile at or below which a symbol goes short.
pub const SHORT_PERCENTILE: f64 = 0.2;

/// Absolute target weight assigned to each long/short pick.
pub const TARGET_WEIGHT: f64 = 0.05;

/// Compute target weights for the universe from close history.
///
/// Symbols with fewer than `MOMENTUM_LOOKBACK + 1` observations are excluded
/// from ranking entirely (absent from the result, not zero-weighted). Ranked
/// symbols outside both quintiles get an explicit 0.0 so the rebalance engine
/// actively closes decayed positions.
///
/// An empty history yields an empty map; the caller must treat that as "skip
/// this rebalance", never as "flatten everything".
///
/// With fewer than two ranked symbols the quintile thresholds degenerate (a
/// single symbol ranks 1.0 and goes long). That is a known approximation of
/// the ranking scheme; the symbol tie-break keeps it deterministic.
pub fn compute_signals(history: &PriceHistory, universe: &[Symbol]) -> BTreeMap<Symbol, f64> {
    if history.is_empty() {
        warn!("no historical data available, no signals generated");
        return BTreeMap::new();
    }

    let mut scores: Vec<(Symbol, f64)> = Vec::with_capacity(universe.len());
    for symbol in universe {
        let Some(closes) = history.closes(symbol) else {
            debug!("{symbol}: no history, excluded from ranking");
            continue;
        };
        if closes.len() <= MOMENTUM_LOOKBACK {
            debug!(
                "{symbol}: insufficient history ({} of {} observations), excluded from ranking",
                closes.len(),
                MOMENTUM_LOOKBACK + 1
            );
            continue;
        }
        let last = closes[closes.len() - 1].close;
        let base = closes[closes.len() - 1 - MOMENTUM_LOOKBACK].close;
        let momentum = last / base - 1.0;
        if !momentum.is_finite() {
            debug!("{symbol}: non-finite momentum, excluded from ranking");
            continue;
        }
        scores.push((symbol.clone(), momentum));
    }

    let signals: BTreeMap<Symbol, f64> = percentile_ranks(&scores)
        .into_iter()
        .map(|(symbol, percentile)| (symbol, classify(percentile)))
        .collect();

    let active = signals.values().filter(|w| **w != 0.0).count();
    debug!("signals calculated: {active} active positions out of {} ranked", signals.len());
    signals
}

/// Map a percentile rank to a target weight.
fn classify(percentile: f64) -> f64 {
    if percentile >= LONG_PERCENTILE {
        TARGET_WEIGHT
    } else if percentile <= SHORT_PERCENTILE {
        -TARGET_WEIGHT
    } else {
        0.0
    }
}

/// Fractional percentile ranks in (0, 1], average-rank tie semantics.
///
/// Equal scores share the mean of their 1-based ordinal ranks divided by the
/// population size — the same transform as pandas `rank(pct=True)`. The sort
/// key includes the symbol so ordering is deterministic even across ties.
fn percentile_ranks(scores: &[(Symbol, f64)]) -> Vec<(Symbol, f64)> {
    let n = scores.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .1
            .partial_cmp(&scores[b].1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| scores[a].0.cmp(&scores[b].0))
    });

    let mut percentiles = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]].1 == scores[order[i]].1 {
            j += 1;
        }
        // Mean of the 1-based ranks i+1 ..= j+1, shared across the tie group.
        let shared = (i + j + 2) as f64 / 2.0 / n as f64;
        for k in i..=j {
            percentiles[order[k]] = shared;
        }
        i = j + 1;
    }

    scores
        .iter()
        .zip(percentiles)
        .map(|((symbol, _), pct)| (symbol.clone(), pct))
        .collect()
}
