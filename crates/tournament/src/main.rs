//! Tournament CLI
//!
//! Run a Swiss event from the command line. State lives in a JSON file that
//! every command loads and saves.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use swiss_core::GameResult;
use tournament::{simulate, Tournament, TournamentConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_STATE_FILE: &str = "tournament.json";

fn print_usage() {
    println!("Swiss Tournament Runner");
    println!();
    println!("Usage:");
    println!("  tournament new [--config FILE] [--player NAME[:RATING]]...");
    println!("  tournament pair");
    println!("  tournament result <board> <1-0|0-1|1/2|+/-|-/+|-/->");
    println!("  tournament checkin <player-id>...");
    println!("  tournament noshow");
    println!("  tournament withdraw <player-id>");
    println!("  tournament late <name> [--rating R]");
    println!("  tournament standings");
    println!("  tournament simulate [--players N] [--rounds R] [--seed S] [--config FILE]");
    println!();
    println!("Options:");
    println!("  --state FILE  tournament state file (default: {DEFAULT_STATE_FILE})");
    println!();
    println!("Examples:");
    println!("  tournament new --config club.toml --player Ann:2210 --player Bob:2105 --player Cid");
    println!("  tournament result 3 1/2");
    println!("  tournament simulate --players 24 --rounds 7 --seed 7");
}

/// Pull `--state FILE` out of the arguments.
fn split_state(args: &[String]) -> (PathBuf, Vec<String>) {
    let mut state = PathBuf::from(DEFAULT_STATE_FILE);
    let mut rest = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--state" && i + 1 < args.len() {
            state = PathBuf::from(&args[i + 1]);
            i += 2;
            continue;
        }
        rest.push(args[i].clone());
        i += 1;
    }
    (state, rest)
}

/// Value following `flag`, if present.
fn option<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(args: &[String]) -> Result<TournamentConfig> {
    match option(args, "--config") {
        Some(path) => TournamentConfig::from_path(path)
            .with_context(|| format!("loading config {path}")),
        None => Ok(TournamentConfig::default()),
    }
}

fn load(state: &Path) -> Result<Tournament> {
    Tournament::load(state).with_context(|| {
        format!(
            "no tournament at {}; start one with `tournament new`",
            state.display()
        )
    })
}

fn parse_player_id(arg: Option<&String>) -> Result<u32> {
    let Some(arg) = arg else {
        bail!("a player id is required");
    };
    arg.parse()
        .with_context(|| format!("invalid player id: {arg}"))
}

// =============================================================================
// Commands
// =============================================================================

fn run_new(state: &Path, args: &[String]) -> Result<()> {
    let config = load_config(args)?;
    let mut tournament = Tournament::new(config);

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--player" || args[i] == "-p" {
            let Some(entry) = args.get(i + 1) else {
                bail!("--player needs NAME[:RATING]");
            };
            let (name, rating) = match entry.rsplit_once(':') {
                Some((name, rating)) => (
                    name,
                    Some(
                        rating
                            .parse()
                            .with_context(|| format!("invalid rating in {entry}"))?,
                    ),
                ),
                None => (entry.as_str(), None),
            };
            tournament.register(name, rating)?;
            i += 1;
        }
        i += 1;
    }

    tournament.save(state)?;
    println!(
        "Created '{}' with {} players, {} rounds",
        tournament.config.name,
        tournament.players.len(),
        tournament.config.total_rounds
    );
    Ok(())
}

fn run_pair(state: &Path) -> Result<()> {
    let mut tournament = load(state)?;
    tournament.pair_next_round(Utc::now())?;
    tournament.save(state)?;
    tournament.print_report();
    Ok(())
}

fn run_result(state: &Path, args: &[String]) -> Result<()> {
    if args.len() < 2 {
        bail!("result requires a board number and a result");
    }
    let board: u32 = args[0]
        .parse()
        .with_context(|| format!("invalid board: {}", args[0]))?;
    let Some(result) = GameResult::from_notation(&args[1]) else {
        bail!("unknown result '{}'", args[1]);
    };

    let mut tournament = load(state)?;
    tournament.record_result(board, result)?;
    tournament.save(state)?;
    println!("Board {}: {}", board, result.notation());
    Ok(())
}

fn run_checkin(state: &Path, args: &[String]) -> Result<()> {
    if args.is_empty() {
        bail!("checkin requires at least one player id");
    }
    let mut tournament = load(state)?;
    let now = Utc::now();
    for arg in args {
        let id = parse_player_id(Some(arg))?;
        tournament.check_in(id, now)?;
        println!("Checked in {}", tournament.player(id)?.name);
    }
    tournament.save(state)?;
    Ok(())
}

fn run_noshow(state: &Path) -> Result<()> {
    let mut tournament = load(state)?;
    let boards = tournament.resolve_no_shows(Utc::now())?;
    tournament.save(state)?;
    if boards.is_empty() {
        println!("No games forfeited");
    } else {
        println!("Forfeited boards: {:?}", boards);
    }
    Ok(())
}

fn run_withdraw(state: &Path, args: &[String]) -> Result<()> {
    let id = parse_player_id(args.first())?;
    let mut tournament = load(state)?;
    tournament.withdraw(id)?;
    tournament.save(state)?;
    println!("Withdrew {}", tournament.player(id)?.name);
    Ok(())
}

fn run_late(state: &Path, args: &[String]) -> Result<()> {
    let Some(name) = args.first() else {
        bail!("late requires a player name");
    };
    let rating = option(args, "--rating")
        .map(|r| r.parse::<u32>().with_context(|| format!("invalid rating: {r}")))
        .transpose()?;

    let mut tournament = load(state)?;
    let id = tournament.admit_late_entry(name, rating)?;
    tournament.save(state)?;
    let player = tournament.player(id)?;
    println!("Admitted {} as #{} (seed {})", player.name, id, player.seed);
    Ok(())
}

fn run_standings(state: &Path) -> Result<()> {
    load(state)?.print_report();
    Ok(())
}

fn run_simulate(args: &[String]) -> Result<()> {
    let mut config = load_config(args)?;
    let players: u32 = option(args, "--players").unwrap_or("16").parse().context("invalid --players")?;
    let seed: u64 = option(args, "--seed").unwrap_or("1").parse().context("invalid --seed")?;
    if let Some(rounds) = option(args, "--rounds") {
        config.total_rounds = rounds.parse().context("invalid --rounds")?;
    }
    config.validate()?;

    println!("=== Simulating {} players, {} rounds ===", players, config.total_rounds);
    let tournament = simulate(config, players, seed, Utc::now())?;
    tournament.print_report();
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tournament=info,swiss_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return Ok(());
    }
    let (state, rest) = split_state(&args[2..]);

    match args[1].as_str() {
        "new" => run_new(&state, &rest),
        "pair" => run_pair(&state),
        "result" => run_result(&state, &rest),
        "checkin" => run_checkin(&state, &rest),
        "noshow" => run_noshow(&state),
        "withdraw" => run_withdraw(&state, &rest),
        "late" => run_late(&state, &rest),
        "standings" | "report" => run_standings(&state),
        "simulate" => run_simulate(&rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
            Ok(())
        }
    }
}
