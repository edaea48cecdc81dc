#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Replays one seed against a verified route.
//!
//! A run alternates player moves with full monster passes. Each step plays
//! one move, lets every monster move once, then plays the next move; the
//! player is checked for a monster after every one of those three actions.
//! With [`Parity::Odd`] a single leading move comes before the first step,
//! which shifts which pair of moves brackets each monster pass.

use seedfinder_core::{Outcome, Parity, RunReport, Variant};
use seedfinder_system_movement::{AlternateRule, ClassicRule, MonsterRule};
use seedfinder_system_verifier::VerifiedRoute;
use seedfinder_world::{Level, World};

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// More of the route remains to be played.
    Running,
    /// The route was exhausted without the player being caught.
    Succeeded,
    /// A monster reached the player.
    Failed,
}

/// A single run in progress.
#[derive(Debug)]
pub struct Simulation<'route, R> {
    world: World,
    rule: R,
    route: &'route VerifiedRoute,
    cursor: usize,
    moves: u64,
    lead_pending: bool,
    state: RunState,
}

impl<'route, R: MonsterRule> Simulation<'route, R> {
    /// Prepares a run on a private copy of `level`.
    #[must_use]
    pub fn new(level: &Level, route: &'route VerifiedRoute, parity: Parity, rule: R) -> Self {
        Self {
            world: World::new(level),
            rule,
            route,
            cursor: 0,
            moves: 0,
            lead_pending: parity == Parity::Odd,
            state: RunState::Running,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Route moves applied so far.
    #[must_use]
    pub const fn moves(&self) -> u64 {
        self.moves
    }

    /// The run's working state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Performs the next transition and returns the resulting state.
    ///
    /// Terminal states are sticky.
    pub fn step(&mut self) -> RunState {
        if self.state == RunState::Running {
            self.state = self.transition();
        }
        self.state
    }

    /// Steps until the run ends.
    pub fn run(mut self) -> RunReport {
        let outcome = loop {
            match self.step() {
                RunState::Running => continue,
                RunState::Succeeded => break Outcome::Succeeded,
                RunState::Failed => break Outcome::Failed,
            }
        };
        RunReport {
            outcome,
            moves: self.moves,
        }
    }

    fn transition(&mut self) -> RunState {
        if self.lead_pending {
            self.lead_pending = false;
            return self.after_player_move();
        }

        if self.cursor >= self.route.route().len() {
            return RunState::Succeeded;
        }

        if self.after_player_move() == RunState::Failed {
            return RunState::Failed;
        }

        let (monsters, grid) = self.world.monsters_and_grid_mut();
        self.rule.advance_all(monsters, grid);
        if self.world.player_caught() {
            return RunState::Failed;
        }

        self.after_player_move()
    }

    fn after_player_move(&mut self) -> RunState {
        let route = self.route.route();
        let step = route.get(self.cursor);
        if self.cursor < route.len() {
            self.moves += 1;
        }
        self.cursor += 1;

        if self.world.move_player(step) {
            RunState::Running
        } else {
            RunState::Failed
        }
    }
}

/// Runs `seed` to completion under the given parity and variant.
#[must_use]
pub fn run(
    level: &Level,
    route: &VerifiedRoute,
    seed: u32,
    parity: Parity,
    variant: Variant,
) -> RunReport {
    match variant {
        Variant::Classic => Simulation::new(level, route, parity, ClassicRule::new(seed)).run(),
        Variant::Alternate => {
            Simulation::new(level, route, parity, AlternateRule::new(seed)).run()
        }
    }
}
