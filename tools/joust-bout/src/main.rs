//! joust-bout: play a headless autopilot match and print the result.
//!
//! Usage:
//!   joust-bout run [--config match.json] [--seed 7] [--rounds 3] [--json]

use std::path::PathBuf;
use std::process;

use serde::Serialize;

use joust_core::commands::PlayerCommand;
use joust_core::config::MatchConfig;
use joust_core::enums::{BoutPhase, Team, Winner};
use joust_core::types::{RoundRecord, RoundResult, Scores};
use joust_sim::MatchEngine;

/// Hard stop so a misconfigured match cannot spin forever (one hour of frames).
const MAX_TICKS: u64 = 60 * 60 * 60;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("joust_sim=info,joust_bout=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "joust-bout: headless joust match runner\n\
         \n\
         Commands:\n\
         \n\
         run       Play one match with both lances on autopilot\n\
         \n\
           --config <path>    JSON match config (optional, defaults otherwise)\n\
           --seed <N>         Override the RNG seed\n\
           --rounds <N>       Override the number of rounds\n\
           --json             Print the summary as JSON\n\
         \n\
         Examples:\n\
         \n\
           joust-bout run --seed 7\n\
           RUST_LOG=joust_sim=debug joust-bout run --rounds 1 --json\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let raw = flag_value(args, flag)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("Error: invalid value for {flag}: {raw}");
            process::exit(1);
        }
    }
}

fn load_config(args: &[String]) -> MatchConfig {
    let mut config = match flag_value(args, "--config").map(PathBuf::from) {
        Some(path) => match MatchConfig::from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => MatchConfig::default(),
    };

    if let Some(seed) = parse_flag(args, "--seed") {
        config.seed = seed;
    }
    if let Some(rounds) = parse_flag(args, "--rounds") {
        config.max_rounds = rounds;
    }
    config.autopilot = true;

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    config
}

#[derive(Serialize)]
struct MatchSummary {
    seed: u64,
    ticks: u64,
    elapsed_secs: f64,
    rounds: Vec<RoundRecord>,
    scores: Scores,
    winner: Winner,
}

fn cmd_run(args: &[String]) {
    let config = load_config(args);
    let as_json = args.iter().any(|a| a == "--json");
    let seed = config.seed;

    let mut engine = MatchEngine::new(config);
    engine.queue_command(PlayerCommand::StartMatch);

    while engine.phase() != BoutPhase::MatchComplete {
        if engine.time().tick >= MAX_TICKS {
            tracing::error!(ticks = MAX_TICKS, "match did not finish");
            process::exit(2);
        }
        engine.tick();
    }
    engine.dispose();

    let controller = engine.controller();
    let summary = MatchSummary {
        seed,
        ticks: engine.time().tick,
        elapsed_secs: engine.time().elapsed_secs,
        rounds: controller.rounds().to_vec(),
        scores: controller.scores(),
        winner: controller.winner(),
    };

    if as_json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: failed to encode summary: {e}");
                process::exit(1);
            }
        }
        return;
    }

    print_table(&summary);
}

fn describe(result: &RoundResult) -> String {
    if result.is_miss() {
        return "miss".to_string();
    }
    format!(
        "{} +{} @ {:.1} mph",
        result.region_hit.as_deref().unwrap_or("?"),
        result.points_earned,
        result.speed_on_contact
    )
}

fn print_table(summary: &MatchSummary) {
    println!("Seed {}  ({:.1} s simulated)", summary.seed, summary.elapsed_secs);
    println!();
    println!("{:>5}  {:<26}  {:<26}", "Round", "Team A", "Team B");
    for record in &summary.rounds {
        println!(
            "{:>5}  {:<26}  {:<26}",
            record.round,
            describe(record.result(Team::A)),
            describe(record.result(Team::B))
        );
    }
    println!();
    println!("Score  A {}  B {}", summary.scores.a, summary.scores.b);
    match summary.winner.team() {
        Some(team) => println!("Winner: team {team}"),
        None => println!("Result: tie"),
    }
}
