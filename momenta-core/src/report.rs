//! Performance summary over the ledger's valuation history.

use std::fmt;

use crate::domain::Ledger;

/// Headline numbers for the run so far.
///
/// Derived entirely from the ledger; `None` until the first rebalance has
/// appended a valuation record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceSummary {
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub max_value: f64,
    pub min_value: f64,
    pub trade_count: usize,
}

impl PerformanceSummary {
    pub fn from_ledger(ledger: &Ledger) -> Option<Self> {
        let history = ledger.value_history();
        let last = history.last()?;

        let mut max_value = f64::MIN;
        let mut min_value = f64::MAX;
        for record in history {
            max_value = max_value.max(record.value);
            min_value = min_value.min(record.value);
        }

        Some(Self {
            initial_capital: ledger.initial_capital(),
            final_value: last.value,
            total_return_pct: last.return_pct,
            max_value,
            min_value,
            trade_count: ledger.trade_history().len(),
        })
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "PERFORMANCE SUMMARY")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Initial Capital: ${:.2}", self.initial_capital)?;
        writeln!(f, "Final Value:     ${:.2}", self.final_value)?;
        writeln!(f, "Total Return:    {:+.2}%", self.total_return_pct)?;
        writeln!(f, "Max Value:       ${:.2}", self.max_value)?;
        writeln!(f, "Min Value:       ${:.2}", self.min_value)?;
        writeln!(f, "Total Trades:    {}", self.trade_count)?;
        write!(f, "{}", "=".repeat(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn empty_history_has_no_summary() {
        let ledger = Ledger::new(100_000.0);
        assert!(PerformanceSummary::from_ledger(&ledger).is_none());
    }

    #[test]
    fn summary_tracks_extremes_and_final_value() {
        let mut ledger = Ledger::new(100_000.0);
        let now = Utc::now();
        ledger.execute_trade("X", 100, 100.0, now);
        ledger.record_valuation(now, 100_000.0);
        ledger.record_valuation(now, 120_000.0);
        ledger.record_valuation(now, 95_000.0);
        ledger.record_valuation(now, 110_000.0);

        let summary = PerformanceSummary::from_ledger(&ledger).unwrap();
        assert_eq!(summary.final_value, 110_000.0);
        assert_eq!(summary.max_value, 120_000.0);
        assert_eq!(summary.min_value, 95_000.0);
        assert!((summary.total_return_pct - 10.0).abs() < 1e-9);
        assert_eq!(summary.trade_count, 1);
    }

    #[test]
    fn display_renders_the_block() {
        let summary = PerformanceSummary {
            initial_capital: 100_000.0,
            final_value: 110_000.0,
            total_return_pct: 10.0,
            max_value: 120_000.0,
            min_value: 95_000.0,
            trade_count: 12,
        };
        let text = summary.to_string();
        assert!(text.contains("PERFORMANCE SUMMARY"));
        assert!(text.contains("Total Return:    +10.00%"));
        assert!(text.contains("Total Trades:    12"));
    }
}
