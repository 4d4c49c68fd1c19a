//! Domain types for the paper-trading ledger.

pub mod ledger;
pub mod trade;

pub use ledger::Ledger;
pub use trade::{Trade, ValuationRecord};

/// Symbol type alias
pub type Symbol = String;
