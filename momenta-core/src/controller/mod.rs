//! Cycle controller — orchestrates one trading cycle.
//!
//! One call to [`CycleController::run_cycle`] is one cycle: market-hours
//! check, quote fetch, due-check, signal generation, rebalance, persistence.
//! Every failure is contained within the cycle — the controller logs and
//! returns an outcome instead of propagating, so the outer loop always gets
//! to try again next cycle. Callers must serialize calls strictly; the
//! controller owns the ledger and assumes no concurrent access.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::data::{MarketClock, PriceHistory, PriceSource};
use crate::domain::{Ledger, Symbol};
use crate::engine::rebalance;
use crate::schedule::{should_rebalance, Frequency};
use crate::signal::compute_signals;
use crate::store::SnapshotStore;

/// Static configuration of a controller.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub universe: Vec<Symbol>,
    pub initial_capital: f64,
    pub frequency: Frequency,
    /// History window requested from the price source for signal generation.
    pub lookback_days: u32,
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Market closed — nothing happened.
    MarketClosed,
    /// Price source returned nothing usable — cycle abandoned.
    NoPrices,
    /// Prices fetched, but no rebalance was due.
    NotDue,
    /// A rebalance was due but signal generation produced nothing;
    /// the last-rebalance timestamp was NOT advanced.
    SkippedNoSignals,
    /// Rebalance ran to completion.
    Rebalanced { trades_executed: usize },
}

/// Orchestrator for the trading loop. Owns the ledger; collaborators come in
/// as trait objects so tests can mock every seam.
pub struct CycleController {
    settings: EngineSettings,
    ledger: Ledger,
    last_rebalance: Option<DateTime<Utc>>,
    prices: Box<dyn PriceSource>,
    clock: Box<dyn MarketClock>,
    store: Box<dyn SnapshotStore>,
}

impl CycleController {
    /// Build a controller, resuming from a persisted ledger when one exists.
    ///
    /// The last-rebalance timestamp is not persisted, so a restart re-triggers
    /// the due-check on its first cycle; against already-adjusted positions
    /// that produces zero-delta trades.
    pub fn new(
        settings: EngineSettings,
        resume_from: Option<Ledger>,
        prices: Box<dyn PriceSource>,
        clock: Box<dyn MarketClock>,
        store: Box<dyn SnapshotStore>,
    ) -> Self {
        let ledger = resume_from.unwrap_or_else(|| Ledger::new(settings.initial_capital));
        Self {
            settings,
            ledger,
            last_rebalance: None,
            prices,
            clock,
            store,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn last_rebalance(&self) -> Option<DateTime<Utc>> {
        self.last_rebalance
    }

    /// Fetch current quotes, for shutdown reporting.
    pub fn current_prices(&self) -> Result<HashMap<Symbol, f64>, crate::data::DataError> {
        self.prices.current_prices(&self.settings.universe)
    }

    /// Execute one trading cycle at the injected instant `now`.
    pub fn run_cycle(&mut self, now: DateTime<Utc>) -> CycleOutcome {
        info!("running trading cycle at {now}");

        if !self.clock.is_open(now) {
            info!("market is closed, skipping cycle");
            return CycleOutcome::MarketClosed;
        }

        let quotes = match self.prices.current_prices(&self.settings.universe) {
            Ok(quotes) if !quotes.is_empty() => quotes,
            Ok(_) => {
                error!("price source '{}' returned no quotes", self.prices.name());
                return CycleOutcome::NoPrices;
            }
            Err(e) => {
                error!("failed to fetch quotes from '{}': {e}", self.prices.name());
                return CycleOutcome::NoPrices;
            }
        };

        // Informational only: valuation records are appended by `rebalance`.
        let value = self.ledger.portfolio_value(&quotes);
        let pnl = (value / self.ledger.initial_capital() - 1.0) * 100.0;
        info!("portfolio value: ${value:.2} (pnl {pnl:+.2}%)");

        let outcome = if should_rebalance(self.last_rebalance, now, self.settings.frequency) {
            info!("rebalancing portfolio ({})", self.settings.frequency);
            let history = match self
                .prices
                .history(&self.settings.universe, self.settings.lookback_days)
            {
                Ok(history) => history,
                Err(e) => {
                    warn!("history fetch failed: {e}");
                    PriceHistory::new()
                }
            };

            let signals = compute_signals(&history, &self.settings.universe);
            if signals.is_empty() {
                warn!("no signals generated, skipping rebalance");
                CycleOutcome::SkippedNoSignals
            } else {
                let result = rebalance(&mut self.ledger, &signals, &quotes, now);
                self.last_rebalance = Some(now);
                CycleOutcome::Rebalanced {
                    trades_executed: result.trades_executed,
                }
            }
        } else {
            info!("no rebalancing needed at this time");
            CycleOutcome::NotDue
        };

        self.persist();
        outcome
    }

    /// Persist the ledger; failure is a warning, never an abort.
    pub fn persist(&self) {
        if let Err(e) = self.store.save(&self.ledger) {
            warn!("failed to persist ledger snapshot: {e}");
        }
    }
}
