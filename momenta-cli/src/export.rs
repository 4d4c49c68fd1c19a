//! Equity curve export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use momenta_core::domain::Ledger;

/// Write the valuation history as `timestamp,value,return_pct` CSV.
pub fn write_equity_csv(path: &Path, ledger: &Ledger) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writeln!(file, "timestamp,value,return_pct")?;
    for record in ledger.value_history() {
        writeln!(
            file,
            "{},{:.4},{:.4}",
            record.timestamp.to_rfc3339(),
            record.value,
            record.return_pct
        )?;
    }
    Ok(())
}
