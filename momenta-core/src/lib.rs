//! Momenta Core — paper-trading rebalance engine.
//!
//! This crate contains the heart of the momentum rebalancing system:
//! - Domain types (ledger, trades, valuation records)
//! - Momentum signal generation with percentile ranking
//! - Rebalance engine (target weights → delta trades → ledger mutation)
//! - Rebalance scheduler (daily / weekly / monthly due-check)
//! - Cycle controller orchestrating one trading cycle
//! - Collaborator traits (price source, market clock, snapshot store)
//!   with synthetic, CSV-directory, and JSON-file implementations
//!
//! The engine is single-threaded and performs no I/O of its own: prices,
//! market status, and persistence all come in through trait objects, and the
//! current time is injected into every decision for determinism.

pub mod controller;
pub mod data;
pub mod domain;
pub mod engine;
pub mod report;
pub mod schedule;
pub mod signal;
pub mod store;
