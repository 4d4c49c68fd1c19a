//! Rebalance scheduling — pure due-check against an injected clock.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How often the portfolio is rebalanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Error)]
#[error("unknown rebalance frequency '{0}' (expected daily, weekly, or monthly)")]
pub struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(ParseFrequencyError(other.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// Decide whether a rebalance is due.
///
/// - No previous rebalance ⇒ always due (bootstrap).
/// - Daily ⇒ due on every consulted cycle.
/// - Weekly ⇒ due once the calendar-day difference reaches 7 (date
///   difference, not elapsed seconds divided by 86400).
/// - Monthly ⇒ due when the month number changes. This is a single boundary
///   check: it stays true for every cycle observed inside the new month, so
///   callers must advance `last` only after a successful rebalance. The year
///   is deliberately ignored; with cycles at most hours apart the month
///   number always changes first.
pub fn should_rebalance(last: Option<DateTime<Utc>>, now: DateTime<Utc>, frequency: Frequency) -> bool {
    let Some(last) = last else {
        return true;
    };
    match frequency {
        Frequency::Daily => true,
        Frequency::Weekly => {
            now.date_naive()
                .signed_duration_since(last.date_naive())
                .num_days()
                >= 7
        }
        Frequency::Monthly => now.month() != last.month(),
    }
}
