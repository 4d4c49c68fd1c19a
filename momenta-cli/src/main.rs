//! Momenta CLI — momentum rebalancing paper trader.
//!
//! Commands:
//! - `run` — the trading loop: one cycle per check interval until Ctrl-C,
//!   then persist, export the equity curve, and print a summary
//! - `report` — print the performance summary from a saved snapshot
//! - `init-config` — emit a default TOML configuration

mod config;
mod export;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::{info, warn};

use momenta_core::controller::{CycleController, EngineSettings};
use momenta_core::data::{
    csv_dir, AlwaysOpenClock, CsvDirSource, MarketClock, PriceSource, SyntheticSource,
    UsEquityClock,
};
use momenta_core::report::PerformanceSummary;
use momenta_core::store::{JsonSnapshotStore, SnapshotStore};

use config::{RunConfig, SourceKind};

#[derive(Parser)]
#[command(name = "momenta", about = "Momentum rebalancing paper trader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trading loop until interrupted.
    Run {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the snapshot location from the config.
        #[arg(long)]
        state: Option<PathBuf>,

        /// Execute a single cycle and exit (for external schedulers).
        #[arg(long, default_value_t = false)]
        once: bool,

        /// Force the synthetic price source, whatever the config says.
        #[arg(long, default_value_t = false)]
        offline: bool,
    },
    /// Print the performance summary from a saved snapshot.
    Report {
        /// Snapshot location.
        #[arg(long, default_value = "portfolio_state.json")]
        state: PathBuf,
    },
    /// Write a default TOML configuration.
    InitConfig {
        /// Destination file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            state,
            once,
            offline,
        } => cmd_run(config, state, once, offline),
        Commands::Report { state } => cmd_report(state),
        Commands::InitConfig { out } => cmd_init_config(out),
    }
}

fn build_source(config: &RunConfig) -> Result<(Box<dyn PriceSource>, Box<dyn MarketClock>)> {
    match config.data.source {
        SourceKind::Synthetic => {
            let source = SyntheticSource::new(
                config.data.seed,
                Utc::now().date_naive(),
                config.data.lookback_days,
            );
            // Synthetic runs should trade regardless of wall-clock hours.
            Ok((Box::new(source), Box::new(AlwaysOpenClock)))
        }
        SourceKind::Csv => {
            let Some(dir) = &config.data.csv_dir else {
                bail!("data.csv_dir is required when data.source = \"csv\"");
            };
            csv_dir::validate_dir(dir)?;
            Ok((Box::new(CsvDirSource::new(dir)), Box::new(UsEquityClock)))
        }
    }
}

fn cmd_run(
    config_path: Option<PathBuf>,
    state: Option<PathBuf>,
    once: bool,
    offline: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(state) = state {
        config.state_path = state;
    }
    if offline && config.data.source != SourceKind::Synthetic {
        info!("offline mode: overriding data source with synthetic prices");
        config.data.source = SourceKind::Synthetic;
    }

    info!("starting paper trading");
    info!("tickers: {}", config.tickers.len());
    info!("initial capital: ${:.2}", config.initial_capital);
    info!("rebalance frequency: {}", config.rebalance_frequency);
    info!("check interval: {} minutes", config.check_interval_minutes);

    let store = JsonSnapshotStore::new(&config.state_path);
    let resume = store
        .load()
        .with_context(|| format!("failed to load snapshot {}", config.state_path.display()))?;
    if resume.is_none() {
        warn!(
            "no saved state found at {}, starting fresh",
            config.state_path.display()
        );
    }

    let (source, clock) = build_source(&config)?;
    let settings = EngineSettings {
        universe: config.tickers.clone(),
        initial_capital: config.initial_capital,
        frequency: config.rebalance_frequency,
        lookback_days: config.data.lookback_days,
    };
    let mut controller = CycleController::new(settings, resume, source, clock, Box::new(store));

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    let interval = config.check_interval();
    loop {
        controller.run_cycle(Utc::now());
        if once {
            break;
        }

        // Sleep in short slices so Ctrl-C is picked up promptly.
        let deadline = Instant::now() + interval;
        while running.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_secs(1));
        }
        if !running.load(Ordering::SeqCst) {
            info!("shutting down");
            break;
        }
    }

    controller.persist();
    match controller.current_prices() {
        Ok(prices) if !prices.is_empty() => {
            let value = controller.ledger().portfolio_value(&prices);
            let pnl = (value / controller.ledger().initial_capital() - 1.0) * 100.0;
            info!("final portfolio value: ${value:.2} (pnl {pnl:+.2}%)");
        }
        Ok(_) => warn!("no final quotes available"),
        Err(e) => warn!("could not fetch final quotes: {e}"),
    }
    finish(&config.state_path, controller.ledger())
}

fn cmd_report(state: PathBuf) -> Result<()> {
    let store = JsonSnapshotStore::new(&state);
    let Some(ledger) = store
        .load()
        .with_context(|| format!("failed to load snapshot {}", state.display()))?
    else {
        bail!("no snapshot found at {}", state.display());
    };
    finish(&state, &ledger)
}

fn cmd_init_config(out: Option<PathBuf>) -> Result<()> {
    let text = RunConfig::annotated_default_toml()?;
    match out {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("failed to write config {}", path.display()))?;
            info!("default config written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Export the equity curve next to the snapshot and print the summary.
fn finish(state_path: &std::path::Path, ledger: &momenta_core::domain::Ledger) -> Result<()> {
    match PerformanceSummary::from_ledger(ledger) {
        Some(summary) => {
            let equity_path = state_path.with_extension("equity.csv");
            export::write_equity_csv(&equity_path, ledger)?;
            info!("equity curve written to {}", equity_path.display());
            println!("{summary}");
        }
        None => println!("No portfolio history available yet."),
    }
    Ok(())
}
