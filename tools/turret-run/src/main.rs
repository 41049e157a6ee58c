//! turret-run: headless scenario runner.
//!
//! Usage:
//!   turret-run run --scenario defense.toml --ticks 600 --every 30
//!   turret-run run --scenario defense.toml --events
//!   turret-run check --scenario defense.toml

use std::path::{Path, PathBuf};
use std::process;

use turret_core::events::TurretEventRecord;
use turret_sim::scenario::Scenario;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "check" => cmd_check(&args[2..]),
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
        "turret-run: autonomous turret scenario runner\n\
         \n\
         Commands:\n\
         \n\
         run       Simulate a scenario and print JSON lines to stdout\n\
         \n\
           --scenario <path>  Scenario TOML file\n\
           --ticks <N>        Ticks to run (default: the scenario's duration)\n\
           --every <N>        Print a snapshot every N ticks (default: 1)\n\
           --events           Print turret events only\n\
         \n\
         check     Parse a scenario and build its engine without running it\n\
         \n\
           --scenario <path>  Scenario TOML file\n\
         \n\
         Set RUST_LOG=debug for engagement logging.\n"
    );
}

fn parse_flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_scenario_path(args: &[String]) -> PathBuf {
    match parse_flag_value(args, "--scenario") {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Error: --scenario is required");
            process::exit(1);
        }
    }
}

fn parse_count(args: &[String], flag: &str) -> Option<u64> {
    let raw = parse_flag_value(args, flag)?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            eprintln!("Error: {flag} expects a whole number, got {raw}");
            process::exit(1);
        }
    }
}

fn load(path: &Path) -> Scenario {
    match Scenario::load(path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error loading {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn cmd_run(args: &[String]) {
    let path = parse_scenario_path(args);
    let scenario = load(&path);
    let ticks = parse_count(args, "--ticks").unwrap_or_else(|| scenario.tick_count());
    let every = parse_count(args, "--every").unwrap_or(1).max(1);
    let events_only = args.iter().any(|a| a == "--events");

    let mut engine = match scenario.build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error building {}: {e}", path.display());
            process::exit(1);
        }
    };

    log::info!("running {} for {ticks} ticks", path.display());
    let mut event_count = 0usize;
    for tick in 0..ticks {
        let snapshot = engine.tick();
        event_count += snapshot.events.len();

        let line = if events_only {
            snapshot
                .events
                .iter()
                .map(|record: &TurretEventRecord| serde_json::to_string(record))
                .collect::<Result<Vec<_>, _>>()
                .map(|lines| lines.join("\n"))
        } else if tick % every == 0 {
            serde_json::to_string(&snapshot)
        } else {
            continue;
        };

        match line {
            Ok(line) if line.is_empty() => {}
            Ok(line) => println!("{line}"),
            Err(e) => {
                eprintln!("Error serializing tick {tick}: {e}");
                process::exit(1);
            }
        }
    }
    log::info!("done: {event_count} turret events");
}

fn cmd_check(args: &[String]) {
    let path = parse_scenario_path(args);
    let scenario = load(&path);
    if let Err(e) = scenario.build_engine() {
        eprintln!("Error building {}: {e}", path.display());
        process::exit(1);
    }
    println!(
        "{}: {} turrets, {} targets, {} swarms, {} ticks",
        path.display(),
        scenario.turrets.len(),
        scenario.targets.len(),
        scenario.swarms.len(),
        scenario.tick_count()
    );
}
