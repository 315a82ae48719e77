//! Headless Invasion Runner
//!
//! Loads a scenario, runs the invasion to the end and prints the result.
//! Player-controlled defenders are played by the built-in policy.

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dungeon_invasion::core::error::Result;
use dungeon_invasion::core::rng::seeded;
use dungeon_invasion::invasion::{AdvanceResult, DetailedInvasionResult, InvasionEngine};
use dungeon_invasion::scenario::Scenario;

/// Headless Invasion Runner - run a scenario and report the outcome
#[derive(Parser, Debug)]
#[command(name = "dungeon-invasion")]
#[command(about = "Run a dungeon invasion scenario and output the result")]
struct Args {
    /// Scenario TOML file
    #[arg(long, default_value = "data/scenarios/crypt_raid.toml")]
    scenario: String,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's turn limit
    #[arg(long)]
    max_turns: Option<u32>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every invasion event and enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    scenario: String,
    seed: u64,
    #[serde(flatten)]
    result: DetailedInvasionResult,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "dungeon_invasion=debug"
    } else {
        "dungeon_invasion=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = seeded(seed);

    let mut scenario = Scenario::load(&args.scenario)?;
    if let Some(max_turns) = args.max_turns {
        scenario.setup.max_turns = Some(max_turns);
    }
    tracing::info!("Loaded scenario '{}' (seed {})", scenario.name, seed);

    let graph = scenario.graph();
    let mut engine = InvasionEngine::new(&scenario.setup, graph, scenario.content, scenario.config)?;

    let result = loop {
        match engine.advance(&mut rng)? {
            AdvanceResult::AwaitingDefender(id) => {
                let action = engine.suggest_action(id);
                engine.submit_action(id, action, &mut rng)?;
            }
            AdvanceResult::RoundComplete(_) => {}
            AdvanceResult::Finished(result) => break result,
        }
        if args.verbose {
            for event in engine.drain_events() {
                eprintln!("  [{}] {}", event.round, event.description);
            }
        }
    };
    if args.verbose {
        for event in engine.drain_events() {
            eprintln!("  [{}] {}", event.round, event.description);
        }
    }

    match args.format.as_str() {
        "text" => {
            println!("=== {} ===", scenario.name);
            println!("Outcome: {:?} ({:?})", result.outcome, result.reason);
            println!("Rounds: {}", result.turns_taken);
            println!(
                "Casualties: {} invaders, {} defenders",
                result.invaders_lost, result.defenders_lost
            );
            println!(
                "Objectives: {}/{} (secondary {}/{})",
                result.objectives_completed,
                result.objectives_total,
                result.secondary_completed,
                result.secondary_total
            );
            println!("Altar hp: {}", result.altar_hp_remaining);
            println!("Reward multiplier: {:.2}", result.reward_multiplier);
        }
        _ => {
            let report = RunReport {
                scenario: scenario.name,
                seed,
                result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
