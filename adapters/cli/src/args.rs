//! Command-line surface of the seed finder.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use seedfinder_core::{Parity, Variant};
use seedfinder_world::DEFAULT_CHIPS_REQUIRED;

/// Brute-forces generator seeds under which a fixed route survives every monster.
#[derive(Debug, Parser)]
#[command(name = "seedfinder", author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Raises log output to debug; repeat for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Searches a seed range for runs in which the route survives.
    Search(SearchArgs),
    /// Checks that a route is legal on a level without simulating monsters.
    Verify(LevelArgs),
    /// Prints the affine constants that skip the alternate generator ahead.
    Jump {
        /// Number of generator steps to skip.
        #[arg(long)]
        steps: u64,
    },
}

/// Inputs shared by every subcommand that loads a level.
#[derive(Debug, Args)]
pub(crate) struct LevelArgs {
    /// Raw 1024-byte level layout.
    #[arg(long)]
    pub(crate) level: PathBuf,

    /// Route file made of `u`, `d`, `l`, `r` and idle markers.
    #[arg(long)]
    pub(crate) route: PathBuf,

    /// Chips the route must collect before reaching the exit.
    #[arg(long, default_value_t = DEFAULT_CHIPS_REQUIRED)]
    pub(crate) chips_required: u32,
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    #[command(flatten)]
    pub(crate) input: LevelArgs,

    #[arg(long, value_enum, default_value_t = VariantChoice::Both)]
    pub(crate) variant: VariantChoice,

    #[arg(long, value_enum, default_value_t = ParityChoice::Both)]
    pub(crate) parity: ParityChoice,

    #[arg(long, default_value_t = 0)]
    pub(crate) first_seed: u32,

    /// Defaults to the last seed of the widest selected variant.
    #[arg(long)]
    pub(crate) last_seed: Option<u32>,

    /// Worker threads; 0 uses one per core.
    #[arg(long, env = "SEEDFINDER_THREADS", default_value_t = 0)]
    pub(crate) threads: usize,

    /// Stops handing out seeds after the first success.
    #[arg(long)]
    pub(crate) stop_on_first: bool,

    /// Emits one JSON object per success and a JSON summary.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum VariantChoice {
    Classic,
    Alternate,
    Both,
}

impl VariantChoice {
    pub(crate) fn variants(self) -> &'static [Variant] {
        match self {
            Self::Classic => &[Variant::Classic],
            Self::Alternate => &[Variant::Alternate],
            Self::Both => &Variant::ALL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ParityChoice {
    Even,
    Odd,
    Both,
}

impl ParityChoice {
    pub(crate) fn parities(self) -> &'static [Parity] {
        match self {
            Self::Even => &[Parity::Even],
            Self::Odd => &[Parity::Odd],
            Self::Both => &Parity::ALL,
        }
    }
}
