#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Bastion scenario headlessly.

mod hud;
mod scenario;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use bastion_core::{GameOutcome, TowerKind};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{scenario::Scenario, simulation::Simulation};

/// Runs a tower defence scenario and prints the HUD as it changes.
#[derive(Debug, Parser)]
#[command(name = "bastion", version)]
struct Args {
    /// Scenario JSON file. Uses the built-in level when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,
    /// Stops the run after this many simulated seconds.
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
    /// Prints the built-in scenario as JSON and exits.
    #[arg(long)]
    print_scenario: bool,
}

/// Entry point for the Bastion command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.print_scenario {
        let json = serde_json::to_string_pretty(&Scenario::builtin())
            .context("failed to serialize the built-in scenario")?;
        println!("{json}");
        return Ok(());
    }

    ensure!(args.tick_ms > 0, "--tick-ms must be positive");
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("could not load scenario {}", path.display()))?,
        None => Scenario::builtin(),
    };

    println!("Towers:");
    for kind in TowerKind::ALL {
        println!("  {}", hud::tower_card(kind));
    }

    let dt = Duration::from_millis(args.tick_ms);
    let limit = Duration::from_secs(args.max_seconds);
    let mut simulation = Simulation::new(scenario);
    let mut last_status = String::new();

    loop {
        let finished = simulation.step(dt);
        let hud = simulation.hud_mut();
        for popup in hud.take_popups() {
            println!("  {popup}");
        }
        let status = hud.status_line();
        if status != last_status {
            println!("{status}");
            last_status = status;
        }
        if finished || simulation.report().elapsed >= limit {
            break;
        }
    }

    let report = simulation.report();
    if let Some(banner) = simulation.hud_mut().banner() {
        println!("{banner}");
    }
    info!(
        wave = ?report.wave.map(|wave| wave.number()),
        elapsed = report.elapsed.as_secs_f32(),
        balance = report.balance,
        lives = report.lives,
        outcome = ?report.outcome,
        "run finished"
    );

    match report.outcome {
        Some(GameOutcome::Won) => println!("All waves cleared with {} lives left", report.lives),
        Some(GameOutcome::Lost) => println!("The bastion fell"),
        None => match report.wave {
            Some(wave) => println!(
                "Time limit reached after {}s during wave {}",
                args.max_seconds,
                wave.number()
            ),
            None => println!("Time limit reached after {}s", args.max_seconds),
        },
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
