#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pre-flight check that a route can finish the level when no monster moves.
//!
//! The check never touches a generator: it only proves the route avoids walls,
//! gathers the level's chip quota and stops on the exit. Searching with a route
//! that fails here would only ever report failures.

use seedfinder_core::{Move, Position, Route, RouteError, Tile};
use seedfinder_world::Level;

/// A route that passed [`verify`] against a particular level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedRoute {
    route: Route,
    chips_collected: u32,
    end: Position,
}

impl VerifiedRoute {
    /// The verified moves.
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Chips gathered along the route.
    #[must_use]
    pub const fn chips_collected(&self) -> u32 {
        self.chips_collected
    }

    /// Cell the route ends on; always an exit.
    #[must_use]
    pub const fn end(&self) -> Position {
        self.end
    }
}

/// Replays `route` on a static copy of `level` and reports the first problem.
pub fn verify(level: &Level, route: Route) -> Result<VerifiedRoute, RouteError> {
    let mut grid = *level.grid();
    let mut player = level.player_start();
    let mut chips_collected = 0;

    for (move_index, step) in route.iter().enumerate() {
        let Move::Step(direction) = step else {
            continue;
        };
        let destination = player
            .step(direction)
            .ok_or(RouteError::LeavesGrid { move_index })?;
        let tile = grid.tile(destination);
        if tile == Tile::WALL {
            return Err(RouteError::WallCollision {
                move_index,
                position: destination,
            });
        }
        if tile == Tile::CHIP {
            chips_collected += 1;
            grid.set(destination, Tile::FLOOR);
        }
        player = destination;
    }

    if chips_collected < level.chips_required() {
        return Err(RouteError::MissingChips {
            collected: chips_collected,
            required: level.chips_required(),
        });
    }

    let tile = grid.tile(player);
    if tile != Tile::EXIT {
        return Err(RouteError::WrongEndTile {
            position: player,
            tile,
        });
    }

    Ok(VerifiedRoute {
        route,
        chips_collected,
        end: player,
    })
}
