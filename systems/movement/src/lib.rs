#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster movement rules, one per generator family.
//!
//! A pass visits monsters in list order and writes every move straight into
//! the grid, so a cell vacated by an earlier monster is already open to the
//! monsters after it in the same pass.

use seedfinder_core::{Direction, Grid, Monster, Tile};
use seedfinder_system_rng::{AlternateRng, ClassicRng};

/// Per-variant rule that moves one monster at a time.
pub trait MonsterRule {
    /// Moves `monster` at most one cell, updating `grid` in place.
    fn advance(&mut self, monster: &mut Monster, grid: &mut Grid);

    /// Runs one full pass over `monsters` in list order.
    fn advance_all(&mut self, monsters: &mut [Monster], grid: &mut Grid) {
        for monster in monsters {
            self.advance(monster, grid);
        }
    }
}

/// Preferred direction for each `[row][column]` pair of draws.
///
/// Corners and the centre are not directions and force a fresh pair.
const PREFERENCE_TABLE: [[Option<Direction>; 3]; 3] = [
    [None, Some(Direction::North), None],
    [Some(Direction::West), None, Some(Direction::East)],
    [None, Some(Direction::South), None],
];

/// Classic rule: a random preferred direction, then random turns.
#[derive(Clone, Debug)]
pub struct ClassicRule {
    rng: ClassicRng,
}

impl ClassicRule {
    /// Creates the rule with a generator seeded by `seed`.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            rng: ClassicRng::new(seed),
        }
    }

    /// Generator backing the rule.
    #[must_use]
    pub const fn rng(&self) -> &ClassicRng {
        &self.rng
    }

    fn preferred_direction(&mut self) -> Direction {
        loop {
            let row = self.rng.draw(3) as usize;
            let column = self.rng.draw(3) as usize;
            if let Some(direction) = PREFERENCE_TABLE[row][column] {
                return direction;
            }
        }
    }

    fn next_turn(&mut self, tried: &mut [bool; 3]) -> usize {
        loop {
            let candidate = self.rng.draw(3) as usize;
            if !tried[candidate] {
                tried[candidate] = true;
                return candidate;
            }
        }
    }
}

impl MonsterRule for ClassicRule {
    fn advance(&mut self, monster: &mut Monster, grid: &mut Grid) {
        let preferred = self.preferred_direction();
        if relocate(monster, grid, preferred) {
            return;
        }

        let turns = [preferred.left(), preferred.right(), preferred.back()];
        let mut tried = [false; 3];
        for _ in 0..turns.len() {
            let turn = self.next_turn(&mut tried);
            if relocate(monster, grid, turns[turn]) {
                return;
            }
        }
    }
}

/// Alternate rule: shuffle ahead/left/back/right and take the first open cell.
#[derive(Clone, Debug)]
pub struct AlternateRule {
    rng: AlternateRng,
}

impl AlternateRule {
    /// Creates the rule with a generator seeded by `seed`.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            rng: AlternateRng::new(seed),
        }
    }

    /// Generator backing the rule.
    #[must_use]
    pub const fn rng(&self) -> &AlternateRng {
        &self.rng
    }
}

impl MonsterRule for AlternateRule {
    fn advance(&mut self, monster: &mut Monster, grid: &mut Grid) {
        let facing = monster.facing;
        let mut choices = [facing, facing.left(), facing.back(), facing.right()];
        self.rng.permute4(&mut choices);

        for direction in choices {
            if relocate(monster, grid, direction) {
                monster.facing = direction;
                return;
            }
        }
    }
}

fn relocate(monster: &mut Monster, grid: &mut Grid, direction: Direction) -> bool {
    let Some(destination) = grid.enterable_neighbor(monster.position, direction) else {
        return false;
    };
    grid.set(monster.position, Tile::FLOOR);
    grid.set(destination, Tile::MONSTER);
    monster.position = destination;
    true
}
