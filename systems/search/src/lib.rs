#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Parallel seed search.
//!
//! Every seed × variant × parity run is independent: it copies the shared
//! template, mutates only its copy and reports back a move count and an
//! outcome. Runs are fanned out over a rayon pool; per-worker tallies are
//! merged at the join, so nothing is locked on the hot path.

use std::{
    ops::RangeInclusive,
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use seedfinder_core::{Outcome, Parity, Success, Variant};
use seedfinder_system_simulation::run;
use seedfinder_system_verifier::VerifiedRoute;
use seedfinder_world::Level;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// What to search and how widely to fan out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    seeds: RangeInclusive<u32>,
    variants: Vec<Variant>,
    parities: Vec<Parity>,
    threads: usize,
    stop_on_first: bool,
}

impl SearchConfig {
    /// Searches `seeds` with every variant and parity on the default pool size.
    #[must_use]
    pub fn new(seeds: RangeInclusive<u32>) -> Self {
        Self {
            seeds,
            variants: Variant::ALL.to_vec(),
            parities: Parity::ALL.to_vec(),
            threads: 0,
            stop_on_first: false,
        }
    }

    /// Restricts the search to `variants`.
    #[must_use]
    pub fn with_variants(mut self, variants: &[Variant]) -> Self {
        self.variants = dedup(variants);
        self
    }

    /// Restricts the search to `parities`.
    #[must_use]
    pub fn with_parities(mut self, parities: &[Parity]) -> Self {
        self.parities = dedup(parities);
        self
    }

    /// Sets the worker count; zero lets rayon pick.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Stops handing out new seeds once any run succeeds.
    #[must_use]
    pub fn with_stop_on_first(mut self, stop_on_first: bool) -> Self {
        self.stop_on_first = stop_on_first;
        self
    }

    /// Seeds to search.
    #[must_use]
    pub fn seeds(&self) -> &RangeInclusive<u32> {
        &self.seeds
    }

    /// Variants to run for each seed.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Parities to run for each seed.
    #[must_use]
    pub fn parities(&self) -> &[Parity] {
        &self.parities
    }
}

fn dedup<T: Copy + Ord>(items: &[T]) -> Vec<T> {
    let mut unique = items.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique
}

/// Widest seed span among `variants`, used when no last seed is given.
#[must_use]
pub fn default_last_seed(variants: &[Variant]) -> u32 {
    variants
        .iter()
        .map(|variant| *variant.seed_span().end())
        .max()
        .unwrap_or(0)
}

/// Reasons a search cannot start.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The configured seed range is empty.
    #[error("seed range {first}..={last} is empty")]
    EmptySeedRange {
        /// First seed requested.
        first: u32,
        /// Last seed requested.
        last: u32,
    },
    /// No variant or no parity was selected.
    #[error("at least one variant and one parity must be selected")]
    NothingToRun,
    /// The worker pool could not be created.
    #[error("failed to build the worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Aggregate results of a finished search.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchSummary {
    /// Seeds handed to workers.
    pub seeds_searched: u64,
    /// Individual runs performed.
    pub runs: u64,
    /// Route moves played across every run.
    pub moves: u64,
    /// Successful runs, sorted by seed, parity and variant.
    pub successes: Vec<Success>,
    /// Wall-clock duration of the search.
    pub elapsed: Duration,
    /// Workers the search ran on.
    pub threads: usize,
}

impl SearchSummary {
    /// Seeds searched per second of wall-clock time.
    #[must_use]
    pub fn seeds_per_second(&self) -> f64 {
        per_second(self.seeds_searched, self.elapsed)
    }

    /// Route moves simulated per second of wall-clock time.
    #[must_use]
    pub fn moves_per_second(&self) -> f64 {
        per_second(self.moves, self.elapsed)
    }

    /// Average route moves played per searched seed.
    #[must_use]
    pub fn moves_per_seed(&self) -> f64 {
        if self.seeds_searched == 0 {
            0.0
        } else {
            self.moves as f64 / self.seeds_searched as f64
        }
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        count as f64 / seconds
    } else {
        0.0
    }
}

#[derive(Debug, Default)]
struct Tally {
    seeds: u64,
    runs: u64,
    moves: u64,
    successes: Vec<Success>,
}

impl Tally {
    fn merge(mut self, mut other: Self) -> Self {
        self.seeds += other.seeds;
        self.runs += other.runs;
        self.moves += other.moves;
        self.successes.append(&mut other.successes);
        self
    }
}

/// Runs every configured combination for every seed in the range.
///
/// `on_success` is called from worker threads as soon as a run succeeds, in no
/// particular order; the returned summary lists the same successes sorted.
pub fn search<F>(
    level: &Level,
    route: &VerifiedRoute,
    config: &SearchConfig,
    on_success: F,
) -> Result<SearchSummary, SearchError>
where
    F: Fn(&Success) + Sync,
{
    let (first, last) = (*config.seeds.start(), *config.seeds.end());
    if first > last {
        return Err(SearchError::EmptySeedRange { first, last });
    }
    if config.variants.is_empty() || config.parities.is_empty() {
        return Err(SearchError::NothingToRun);
    }

    let pool = build_pool(config.threads)?;
    let threads = pool.current_num_threads();
    info!(
        first_seed = first,
        last_seed = last,
        variants = ?config.variants,
        parities = ?config.parities,
        threads,
        stop_on_first = config.stop_on_first,
        "starting seed search"
    );

    let started = Instant::now();
    let stop = AtomicBool::new(false);
    let tally = pool.install(|| {
        config
            .seeds
            .clone()
            .into_par_iter()
            .fold(Tally::default, |mut tally, seed| {
                if config.stop_on_first && stop.load(Ordering::Relaxed) {
                    return tally;
                }
                tally.seeds += 1;
                for &variant in &config.variants {
                    if !variant.seed_span().contains(&seed) {
                        continue;
                    }
                    for &parity in &config.parities {
                        let report = run(level, route, seed, parity, variant);
                        tally.runs += 1;
                        tally.moves += report.moves;
                        if report.outcome == Outcome::Succeeded {
                            let success = Success {
                                seed,
                                parity,
                                variant,
                            };
                            debug!(seed, %parity, %variant, "route survives");
                            on_success(&success);
                            tally.successes.push(success);
                            if config.stop_on_first {
                                stop.store(true, Ordering::Relaxed);
                            }
                        }
                    }
                }
                tally
            })
            .reduce(Tally::default, Tally::merge)
    });
    let elapsed = started.elapsed();

    let mut successes = tally.successes;
    successes.sort_unstable();
    let summary = SearchSummary {
        seeds_searched: tally.seeds,
        runs: tally.runs,
        moves: tally.moves,
        successes,
        elapsed,
        threads,
    };
    info!(
        seeds = summary.seeds_searched,
        runs = summary.runs,
        successes = summary.successes.len(),
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "seed search finished"
    );
    Ok(summary)
}

fn build_pool(threads: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("seedfinder-worker-{index}"))
        .build()
}
