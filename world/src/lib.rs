#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level templates and per-run world state for seedfinder.
//!
//! A [`Level`] is built once from the level blob and never changes afterwards;
//! every simulation run takes a private [`World`] copy of it and mutates only
//! that copy.

use seedfinder_core::{
    Direction, Grid, LevelError, Monster, Move, Position, Tile, MAX_MONSTERS,
};
use sha2::{Digest, Sha256};

/// Chips the target level requires before its exit counts.
pub const DEFAULT_CHIPS_REQUIRED: u32 = 88;

/// Immutable template shared by every run of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    grid: Grid,
    monsters: Vec<Monster>,
    player_start: Position,
    chips_required: u32,
    suppressed_monsters: usize,
}

impl Level {
    /// Builds a template from a raw level blob.
    pub fn from_bytes(bytes: &[u8], chips_required: u32) -> Result<Self, LevelError> {
        Self::from_grid(Grid::from_bytes(bytes)?, chips_required)
    }

    /// Builds a template from an already decoded grid.
    ///
    /// Monsters are collected in ascending index order, all facing north. Once
    /// [`MAX_MONSTERS`] are tracked, any further monster tile is cleared to
    /// floor. The player start tile becomes gravel.
    pub fn from_grid(mut grid: Grid, chips_required: u32) -> Result<Self, LevelError> {
        let mut monsters = Vec::new();
        let mut suppressed_monsters = 0;
        let mut player_start = None;

        let cells: Vec<(Position, Tile)> = grid.iter().collect();
        for (position, tile) in cells {
            if tile == Tile::MONSTER {
                if monsters.len() < MAX_MONSTERS {
                    monsters.push(Monster::new(position, Direction::North));
                } else {
                    grid.set(position, Tile::FLOOR);
                    suppressed_monsters += 1;
                }
            } else if tile == Tile::PLAYER_START {
                if let Some(first) = player_start {
                    return Err(LevelError::MultiplePlayers {
                        first,
                        second: position,
                    });
                }
                player_start = Some(position);
                grid.set(position, Tile::GRAVEL);
            }
        }

        let player_start = player_start.ok_or(LevelError::MissingPlayer)?;
        Ok(Self {
            grid,
            monsters,
            player_start,
            chips_required,
            suppressed_monsters,
        })
    }

    /// Template grid with monsters marked and the player start replaced by gravel.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Tracked monsters in list order.
    #[must_use]
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn player_start(&self) -> Position {
        self.player_start
    }

    /// Chips a route must gather before reaching the exit.
    #[must_use]
    pub const fn chips_required(&self) -> u32 {
        self.chips_required
    }

    /// Monster tiles removed because every slot was already taken.
    #[must_use]
    pub const fn suppressed_monsters(&self) -> usize {
        self.suppressed_monsters
    }

    /// Stable digest of everything a run reads from the template.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Sha256::new();
        for byte in self.grid.bytes() {
            hasher.update([byte]);
        }
        for monster in &self.monsters {
            hasher.update((monster.position.index() as u32).to_le_bytes());
            hasher.update([facing_code(monster.facing)]);
        }
        hasher.update((self.player_start.index() as u32).to_le_bytes());
        hasher.update(self.chips_required.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

fn facing_code(direction: Direction) -> u8 {
    match direction {
        Direction::North => 0,
        Direction::East => 1,
        Direction::South => 2,
        Direction::West => 3,
    }
}

/// Working state owned by exactly one simulation run.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    monsters: Vec<Monster>,
    player: Position,
}

impl World {
    /// Copies the template into a fresh working state.
    #[must_use]
    pub fn new(level: &Level) -> Self {
        Self {
            grid: level.grid,
            monsters: level.monsters.clone(),
            player: level.player_start,
        }
    }

    /// Applies one route slot to the player.
    ///
    /// A chip under the destination is cleared to floor. Returns `false` when
    /// the player ends up on a monster, or would leave the grid, in which case
    /// the player stays put.
    pub fn move_player(&mut self, step: Move) -> bool {
        if let Move::Step(direction) = step {
            let Some(destination) = self.player.step(direction) else {
                return false;
            };
            self.player = destination;
            if self.grid.tile(destination) == Tile::CHIP {
                self.grid.set(destination, Tile::FLOOR);
            }
        }
        !self.player_caught()
    }

    /// Reports whether a monster occupies the player's cell.
    #[must_use]
    pub fn player_caught(&self) -> bool {
        self.grid.tile(self.player) == Tile::MONSTER
    }

    /// Mutable access to the monster list and the grid for a monster pass.
    pub fn monsters_and_grid_mut(&mut self) -> (&mut [Monster], &mut Grid) {
        (&mut self.monsters, &mut self.grid)
    }
}

/// Read-only queries over a run's working state.
pub mod query {
    use super::World;
    use seedfinder_core::{Grid, Monster, Position};

    /// Current player cell.
    #[must_use]
    pub fn player(world: &World) -> Position {
        world.player
    }

    /// Current working grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current monster list, in list order.
    #[must_use]
    pub fn monsters(world: &World) -> &[Monster] {
        &world.monsters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(column: usize, row: usize) -> Position {
        Position::from_coords(column, row).expect("cell in range")
    }

    fn walled_grid() -> Grid {
        let mut grid = Grid::filled(Tile::WALL);
        for column in 1..5 {
            grid.set(cell(column, 1), Tile::FLOOR);
        }
        grid
    }

    #[test]
    fn template_collects_monsters_in_index_order() {
        let mut grid = walled_grid();
        grid.set(cell(3, 1), Tile::MONSTER);
        grid.set(cell(1, 1), Tile::MONSTER);
        grid.set(cell(4, 1), Tile::PLAYER_START);

        let level = Level::from_grid(grid, 0).expect("valid level");

        assert_eq!(
            level.monsters(),
            &[
                Monster::new(cell(1, 1), Direction::North),
                Monster::new(cell(3, 1), Direction::North),
            ]
        );
        assert_eq!(level.player_start(), cell(4, 1));
        assert_eq!(level.grid().tile(cell(4, 1)), Tile::GRAVEL);
        assert_eq!(level.suppressed_monsters(), 0);
    }

    #[test]
    fn monsters_past_capacity_are_cleared_to_floor() {
        let mut grid = Grid::filled(Tile::MONSTER);
        grid.set(cell(31, 31), Tile::PLAYER_START);

        let level = Level::from_grid(grid, 0).expect("valid level");

        assert_eq!(level.monsters().len(), MAX_MONSTERS);
        assert_eq!(level.suppressed_monsters(), 1024 - 1 - MAX_MONSTERS);
        assert_eq!(level.grid().count(Tile::MONSTER), MAX_MONSTERS);
        assert_eq!(level.grid().tile(cell(0, 4)), Tile::FLOOR);
        assert_eq!(level.grid().tile(cell(31, 3)), Tile::MONSTER);
    }

    #[test]
    fn level_requires_exactly_one_player() {
        assert_eq!(
            Level::from_grid(walled_grid(), 0),
            Err(LevelError::MissingPlayer)
        );

        let mut grid = walled_grid();
        grid.set(cell(1, 1), Tile::PLAYER_START);
        grid.set(cell(2, 1), Tile::PLAYER_START);
        assert_eq!(
            Level::from_grid(grid, 0),
            Err(LevelError::MultiplePlayers {
                first: cell(1, 1),
                second: cell(2, 1),
            })
        );
    }

    #[test]
    fn player_collects_chips_and_detects_monsters() {
        let mut grid = walled_grid();
        grid.set(cell(1, 1), Tile::PLAYER_START);
        grid.set(cell(2, 1), Tile::CHIP);
        grid.set(cell(4, 1), Tile::MONSTER);
        let level = Level::from_grid(grid, 1).expect("valid level");
        let mut world = World::new(&level);

        assert!(world.move_player(Move::Step(Direction::East)));
        assert_eq!(query::grid(&world).tile(cell(2, 1)), Tile::FLOOR);
        assert!(world.move_player(Move::Idle));
        assert!(world.move_player(Move::Step(Direction::East)));
        assert!(!world.move_player(Move::Step(Direction::East)));
        assert_eq!(query::player(&world), cell(4, 1));

        assert_eq!(level.grid().tile(cell(2, 1)), Tile::CHIP);
    }

    #[test]
    fn leaving_the_grid_counts_as_caught() {
        let mut grid = Grid::filled(Tile::FLOOR);
        grid.set(cell(0, 0), Tile::PLAYER_START);
        let level = Level::from_grid(grid, 0).expect("valid level");
        let mut world = World::new(&level);

        assert!(!world.move_player(Move::Step(Direction::North)));
        assert_eq!(query::player(&world), cell(0, 0));
    }

    #[test]
    fn fingerprint_tracks_template_contents() {
        let mut grid = walled_grid();
        grid.set(cell(1, 1), Tile::PLAYER_START);
        let level = Level::from_grid(grid, 0).expect("valid level");
        let same = Level::from_grid(grid, 0).expect("valid level");
        let stricter = Level::from_grid(grid, 1).expect("valid level");

        assert_eq!(level.fingerprint(), same.fingerprint());
        assert_ne!(level.fingerprint(), stricter.fingerprint());
    }
}
