#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the seed search.

mod args;

use std::{fs, io::Write, path::Path};

use anyhow::{bail, Context, Result};
use args::{Cli, Command, LevelArgs, SearchArgs};
use clap::Parser;
use seedfinder_core::Route;
use seedfinder_system_rng::Jump;
use seedfinder_system_search::{default_last_seed, search, SearchConfig};
use seedfinder_system_verifier::{verify, VerifiedRoute};
use seedfinder_world::Level;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Entry point for the seed finder command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Search(args) => run_search(&args),
        Command::Verify(args) => run_verify(&args),
        Command::Jump { steps } => {
            let jump = Jump::new(steps);
            println!(
                "steps {steps}: multiplier {} increment {}",
                jump.multiplier(),
                jump.increment()
            );
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    } else {
        EnvFilter::new(fallback)
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load(args: &LevelArgs) -> Result<(Level, VerifiedRoute)> {
    let level_bytes = fs::read(&args.level)
        .with_context(|| format!("failed to read level {}", args.level.display()))?;
    let level = Level::from_bytes(&level_bytes, args.chips_required)
        .with_context(|| format!("invalid level {}", args.level.display()))?;
    info!(
        path = %args.level.display(),
        fingerprint = %format!("{:016x}", level.fingerprint()),
        monsters = level.monsters().len(),
        player_start = %level.player_start(),
        "level loaded"
    );
    if level.suppressed_monsters() > 0 {
        warn!(
            suppressed = level.suppressed_monsters(),
            "monster capacity exceeded; extra monsters were removed"
        );
    }

    let route = load_route(&args.route)?;
    let verified = verify(&level, route)
        .with_context(|| format!("route {} is not legal", args.route.display()))?;
    info!(
        moves = verified.route().len(),
        chips = verified.chips_collected(),
        end = %verified.end(),
        "route verified"
    );
    Ok((level, verified))
}

fn load_route(path: &Path) -> Result<Route> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read route {}", path.display()))?;
    let trimmed = trim_line_ending(&bytes);
    Route::parse(trimmed).with_context(|| format!("invalid route {}", path.display()))
}

/// Route files saved by editors usually end in a newline.
fn trim_line_ending(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && matches!(bytes[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    &bytes[..end]
}

fn run_verify(args: &LevelArgs) -> Result<()> {
    let (_, verified) = load(args)?;
    println!(
        "Route is legal: {} moves, {} chips, ends on {}",
        verified.route().len(),
        verified.chips_collected(),
        verified.end()
    );
    Ok(())
}

fn run_search(args: &SearchArgs) -> Result<()> {
    let (level, route) = load(&args.input)?;
    let variants = args.variant.variants();
    let last_seed = args
        .last_seed
        .unwrap_or_else(|| default_last_seed(variants));
    if args.first_seed > last_seed {
        bail!(
            "first seed {} is past last seed {last_seed}",
            args.first_seed
        );
    }

    let config = SearchConfig::new(args.first_seed..=last_seed)
        .with_variants(variants)
        .with_parities(args.parity.parities())
        .with_threads(args.threads)
        .with_stop_on_first(args.stop_on_first);

    let json = args.json;
    let summary = search(&level, &route, &config, |success| {
        let line = if json {
            serde_json::to_string(success).unwrap_or_else(|_| success.to_string())
        } else {
            success.to_string()
        };
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
    })?;

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "Searched {} seeds ({} runs) on {} threads in {:.2?}: {} successes, {:.0} seeds/s, {:.0} moves/s, {:.1} moves/seed",
            summary.seeds_searched,
            summary.runs,
            summary.threads,
            summary.elapsed,
            summary.successes.len(),
            summary.seeds_per_second(),
            summary.moves_per_second(),
            summary.moves_per_seed()
        );
    }
    Ok(())
}
