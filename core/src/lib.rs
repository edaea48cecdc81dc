#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the seedfinder workspace.
//!
//! This crate defines the vocabulary every other crate speaks: the flat tile
//! [`Grid`] and its [`Position`] addressing, cardinal [`Direction`] deltas, the
//! [`Monster`] record, the player's [`Route`], and the identifiers of a single
//! search run ([`Variant`], [`Parity`]). The level template is built by the
//! world crate, monster rules live in the movement system, and the search driver
//! fans runs out over seeds. None of them own the types declared here.

use std::{fmt, ops::RangeInclusive};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of tile columns in a level.
pub const GRID_COLUMNS: usize = 32;

/// Number of tile rows in a level.
pub const GRID_ROWS: usize = 32;

/// Total number of cells in a level; also the exact size of a level blob.
pub const GRID_CELLS: usize = GRID_COLUMNS * GRID_ROWS;

/// Number of monster slots the engine tracks.
///
/// Monsters found past this count are removed from the level instead of
/// being simulated.
pub const MAX_MONSTERS: usize = 128;

/// Single tile code stored in a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(u8);

impl Tile {
    /// Empty floor; the only tile a monster may enter.
    pub const FLOOR: Self = Self(0x00);
    /// Solid wall.
    pub const WALL: Self = Self(0x01);
    /// Collectible chip, cleared to floor when the player steps on it.
    pub const CHIP: Self = Self(0x02);
    /// Level exit.
    pub const EXIT: Self = Self(0x15);
    /// Gravel; left behind where the player started.
    pub const GRAVEL: Self = Self(0x2D);
    /// Occupancy marker for a cell holding a monster.
    pub const MONSTER: Self = Self(0x5C);
    /// Player start tile as stored in the level blob.
    pub const PLAYER_START: Self = Self(0x6E);

    /// Wraps a raw tile code.
    #[must_use]
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Raw tile code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Reports whether a monster may enter a cell holding this tile.
    #[must_use]
    pub const fn is_enterable(self) -> bool {
        self.0 == Self::FLOOR.0
    }
}

/// Cardinal directions expressed as flat index deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Signed change in linear grid index produced by one step.
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::North => -(GRID_COLUMNS as i32),
            Self::East => 1,
            Self::South => GRID_COLUMNS as i32,
            Self::West => -1,
        }
    }

    /// Direction after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Direction after a quarter turn clockwise.
    #[must_use]
    pub const fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Opposite direction.
    #[must_use]
    pub const fn back(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Linear index of a cell within the grid.
///
/// Always in `0..GRID_CELLS`. Row-major: `row * GRID_COLUMNS + column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position(u16);

impl Position {
    /// Creates a position from a linear index, rejecting indices off the grid.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if index < GRID_CELLS {
            u16::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    /// Creates a position from zero-based column and row coordinates.
    #[must_use]
    pub fn from_coords(column: usize, row: usize) -> Option<Self> {
        if column < GRID_COLUMNS && row < GRID_ROWS {
            Self::new(row * GRID_COLUMNS + column)
        } else {
            None
        }
    }

    /// Linear index of the cell.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn column(self) -> usize {
        self.index() % GRID_COLUMNS
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn row(self) -> usize {
        self.index() / GRID_COLUMNS
    }

    /// Position one step away in `direction`.
    ///
    /// Horizontal steps wrap between rows exactly like flat index arithmetic;
    /// only leaving the grid altogether yields `None`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let index = i32::from(self.0) + direction.delta();
        usize::try_from(index).ok().and_then(Self::new)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (column {}, row {})", self.0, self.column(), self.row())
    }
}

/// Fixed-size tile map addressed by [`Position`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Tile; GRID_CELLS],
}

impl Grid {
    /// Creates a grid with every cell holding `tile`.
    #[must_use]
    pub const fn filled(tile: Tile) -> Self {
        Self {
            cells: [tile; GRID_CELLS],
        }
    }

    /// Builds a grid from a raw level blob of exactly [`GRID_CELLS`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LevelError> {
        let raw: &[u8; GRID_CELLS] = bytes.try_into().map_err(|_| LevelError::WrongSize {
            expected: GRID_CELLS,
            actual: bytes.len(),
        })?;
        Ok(Self {
            cells: raw.map(Tile::new),
        })
    }

    /// Tile stored at `position`.
    #[must_use]
    pub fn tile(&self, position: Position) -> Tile {
        self.cells[position.index()]
    }

    /// Overwrites the tile stored at `position`.
    pub fn set(&mut self, position: Position, tile: Tile) {
        self.cells[position.index()] = tile;
    }

    /// Reports whether a monster may step from `from` toward `direction`,
    /// returning the destination when it can.
    #[must_use]
    pub fn enterable_neighbor(&self, from: Position, direction: Direction) -> Option<Position> {
        from.step(direction)
            .filter(|destination| self.tile(*destination).is_enterable())
    }

    /// Iterator over every cell in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, tile)| Position::new(index).map(|position| (position, *tile)))
    }

    /// Number of cells holding `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|cell| **cell == tile).count()
    }

    /// Raw tile codes in index order.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().map(|tile| tile.code())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(GRID_COLUMNS) {
            for tile in row {
                write!(f, "{:02x}", tile.code())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A tracked monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Monster {
    /// Cell the monster currently occupies.
    pub position: Position,
    /// Direction the monster last moved in.
    pub facing: Direction,
}

impl Monster {
    /// Creates a monster at `position` facing `facing`.
    #[must_use]
    pub const fn new(position: Position, facing: Direction) -> Self {
        Self { position, facing }
    }
}

/// A single slot of the player's route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Step one cell in the given direction.
    Step(Direction),
    /// Stay in place for this slot.
    Idle,
}

/// Ordered player moves, fixed before any search begins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    moves: Vec<Move>,
}

impl Route {
    /// Creates a route from explicit moves.
    #[must_use]
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// Parses a route file: `u`, `d`, `l`, `r`, or an idle marker (`0x00`, `-`).
    pub fn parse(bytes: &[u8]) -> Result<Self, RouteParseError> {
        let moves = bytes
            .iter()
            .enumerate()
            .map(|(offset, byte)| match byte {
                b'u' => Ok(Move::Step(Direction::North)),
                b'd' => Ok(Move::Step(Direction::South)),
                b'l' => Ok(Move::Step(Direction::West)),
                b'r' => Ok(Move::Step(Direction::East)),
                0 | b'-' => Ok(Move::Idle),
                other => Err(RouteParseError::IllegalCharacter {
                    offset,
                    byte: *other,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { moves })
    }

    /// Number of slots in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Reports whether the route has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Move at `index`; slots past the end read as [`Move::Idle`].
    #[must_use]
    pub fn get(&self, index: usize) -> Move {
        self.moves.get(index).copied().unwrap_or(Move::Idle)
    }

    /// Iterator over the route's moves in order.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.moves.iter().copied()
    }
}

/// PRNG and movement-rule family driving the monsters of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 32-bit generator with the table-driven preferred-direction rule.
    Classic,
    /// 31-bit generator with the shuffled four-way rule.
    Alternate,
}

impl Variant {
    /// Every variant, in reporting order.
    pub const ALL: [Self; 2] = [Self::Classic, Self::Alternate];

    /// Seeds the game can actually produce for this variant.
    #[must_use]
    pub const fn seed_span(self) -> RangeInclusive<u32> {
        match self {
            Self::Classic => 0..=0xFFFF,
            Self::Alternate => 0..=0x7FFF_FFFF,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => f.write_str("classic"),
            Self::Alternate => f.write_str("alternate"),
        }
    }
}

/// Alignment of the route's move pairs around each monster pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    /// Pairs start at the first move: `[m0, pass, m1] [m2, pass, m3] ...`.
    Even,
    /// One leading move, then pairs: `m0 [m1, pass, m2] ...`.
    Odd,
}

impl Parity {
    /// Both parities, in reporting order.
    pub const ALL: [Self; 2] = [Self::Even, Self::Odd];
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => f.write_str("even"),
            Self::Odd => f.write_str("odd"),
        }
    }
}

/// Terminal result of a single simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The route was exhausted without the player being caught.
    Succeeded,
    /// A monster occupied the player's cell.
    Failed,
}

/// Outcome of one run together with the number of route moves it played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: Outcome,
    /// Route moves applied before the run ended.
    pub moves: u64,
}

/// A seed that lets the route complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Success {
    /// Initial PRNG state.
    pub seed: u32,
    /// Move alignment used by the run.
    pub parity: Parity,
    /// Monster rule family used by the run.
    pub variant: Variant,
}

impl fmt::Display for Success {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successful seed: {} (parity {}, {})",
            self.seed, self.parity, self.variant
        )
    }
}

/// Reasons a level blob cannot be turned into a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The blob does not hold exactly one byte per cell.
    #[error("level must be exactly {expected} bytes, found {actual}")]
    WrongSize {
        /// Required byte count.
        expected: usize,
        /// Byte count supplied.
        actual: usize,
    },
    /// No player start tile was found.
    #[error("level has no player start tile")]
    MissingPlayer,
    /// More than one player start tile was found.
    #[error("level has more than one player start tile (at {first} and {second})")]
    MultiplePlayers {
        /// First start tile in index order.
        first: Position,
        /// Next start tile in index order.
        second: Position,
    },
}

/// Reasons a route file cannot be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RouteParseError {
    /// A byte outside the route alphabet.
    #[error("illegal direction character {byte:#04x} at route position {offset}")]
    IllegalCharacter {
        /// Offset of the byte within the route file.
        offset: usize,
        /// The offending byte.
        byte: u8,
    },
}

/// Structural failures found while replaying a route without monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A move would leave the grid.
    #[error("move {move_index} leaves the grid")]
    LeavesGrid {
        /// Route slot of the offending move.
        move_index: usize,
    },
    /// A move lands on a wall.
    #[error("move {move_index} walks into the wall at {position}")]
    WallCollision {
        /// Route slot of the offending move.
        move_index: usize,
        /// Cell holding the wall.
        position: Position,
    },
    /// The route does not gather enough chips.
    #[error("route collects {collected} chips but the level requires {required}")]
    MissingChips {
        /// Chips gathered by the end of the route.
        collected: u32,
        /// Chips the level requires.
        required: u32,
    },
    /// The route does not end on the exit.
    #[error("route ends at {position} on tile {tile:?} instead of the exit")]
    WrongEndTile {
        /// Final player cell.
        position: Position,
        /// Tile found there.
        tile: Tile,
    },
}
