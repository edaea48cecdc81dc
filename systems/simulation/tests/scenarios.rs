use seedfinder_core::{Grid, Outcome, Parity, Position, Route, RunReport, Tile, Variant};
use seedfinder_system_movement::ClassicRule;
use seedfinder_system_simulation::{run, RunState, Simulation};
use seedfinder_system_verifier::{verify, VerifiedRoute};
use seedfinder_world::{query, Level};

fn cell(column: usize, row: usize) -> Position {
    Position::from_coords(column, row).expect("cell in range")
}

fn prepare(grid: Grid, chips_required: u32, moves: &str) -> (Level, VerifiedRoute) {
    let level = Level::from_grid(grid, chips_required).expect("valid level");
    let route = Route::parse(moves.as_bytes()).expect("valid route");
    let verified = verify(&level, route).expect("route should verify");
    (level, verified)
}

/// One monster at (2, 2) whose only exits are (1, 2) and (3, 2). The player
/// starts at (4, 2), steps onto (3, 2) and then down onto the exit at (3, 3).
fn toy() -> (Level, VerifiedRoute) {
    let mut grid = Grid::filled(Tile::WALL);
    grid.set(cell(1, 2), Tile::FLOOR);
    grid.set(cell(2, 2), Tile::MONSTER);
    grid.set(cell(3, 2), Tile::FLOOR);
    grid.set(cell(4, 2), Tile::PLAYER_START);
    grid.set(cell(3, 3), Tile::EXIT);
    prepare(grid, 0, "ld")
}

/// 10x10 room with six monsters, two chips and the exit in the far corner.
fn room() -> (Level, VerifiedRoute) {
    let mut grid = Grid::filled(Tile::WALL);
    for row in 1..=10 {
        for column in 1..=10 {
            grid.set(cell(column, row), Tile::FLOOR);
        }
    }
    grid.set(cell(1, 1), Tile::PLAYER_START);
    grid.set(cell(5, 1), Tile::CHIP);
    grid.set(cell(10, 5), Tile::CHIP);
    grid.set(cell(10, 10), Tile::EXIT);
    for (column, row) in [(8, 3), (5, 7), (9, 9), (3, 4), (6, 2), (2, 9)] {
        grid.set(cell(column, row), Tile::MONSTER);
    }
    prepare(grid, 2, "rrrrrrrrrddddddddd")
}

fn report(outcome: Outcome, moves: u64) -> RunReport {
    RunReport { outcome, moves }
}

fn successes(level: &Level, route: &VerifiedRoute, parity: Parity, variant: Variant) -> Vec<u32> {
    (0..64)
        .filter(|seed| run(level, route, *seed, parity, variant).outcome == Outcome::Succeeded)
        .collect()
}

#[test]
fn toy_classic_even_matches_hand_trace() {
    let (level, route) = toy();
    let expected = [
        report(Outcome::Succeeded, 2),
        report(Outcome::Failed, 1),
        report(Outcome::Succeeded, 2),
        report(Outcome::Succeeded, 2),
        report(Outcome::Failed, 1),
        report(Outcome::Succeeded, 2),
    ];
    for (seed, expected) in (0..).zip(expected) {
        assert_eq!(
            run(&level, &route, seed, Parity::Even, Variant::Classic),
            expected,
            "seed {seed}"
        );
    }
}

#[test]
fn toy_alternate_even_needs_a_westward_shuffle() {
    let (level, route) = toy();
    for seed in 0..6 {
        assert_eq!(
            run(&level, &route, seed, Parity::Even, Variant::Alternate),
            report(Outcome::Failed, 1),
            "seed {seed}"
        );
    }
    assert_eq!(
        run(&level, &route, 14, Parity::Even, Variant::Alternate),
        report(Outcome::Succeeded, 2)
    );
}

#[test]
fn toy_odd_parity_leaves_before_the_first_pass() {
    let (level, route) = toy();
    for variant in Variant::ALL {
        for seed in 0..6 {
            assert_eq!(
                run(&level, &route, seed, Parity::Odd, variant),
                report(Outcome::Succeeded, 2),
                "{variant} seed {seed}"
            );
        }
    }
}

#[test]
fn stepping_exposes_each_transition() {
    let (level, route) = toy();

    let mut caught = Simulation::new(&level, &route, Parity::Even, ClassicRule::new(1));
    assert_eq!(caught.step(), RunState::Failed);
    assert_eq!(caught.step(), RunState::Failed, "terminal states are sticky");
    assert_eq!(caught.moves(), 1);
    assert_eq!(query::player(caught.world()), cell(3, 2));
    assert_eq!(query::monsters(caught.world())[0].position, cell(3, 2));

    let mut escaped = Simulation::new(&level, &route, Parity::Even, ClassicRule::new(0));
    assert_eq!(escaped.step(), RunState::Running);
    assert_eq!(query::player(escaped.world()), cell(3, 3));
    assert_eq!(query::monsters(escaped.world())[0].position, cell(1, 2));
    assert_eq!(escaped.step(), RunState::Succeeded);
    assert_eq!(escaped.state(), RunState::Succeeded);

    let mut lead = Simulation::new(&level, &route, Parity::Odd, ClassicRule::new(1));
    assert_eq!(lead.step(), RunState::Running);
    assert_eq!(lead.moves(), 1);
    assert_eq!(query::monsters(lead.world())[0].position, cell(2, 2));
}

#[test]
fn room_success_lists_for_every_combination() {
    let (level, route) = room();

    assert_eq!(
        successes(&level, &route, Parity::Even, Variant::Classic),
        vec![0, 6, 8, 12, 16, 17, 18, 19, 20, 21, 24, 26, 27, 29, 43, 45, 49, 52, 54, 55, 56, 57, 60, 62]
    );
    assert_eq!(
        successes(&level, &route, Parity::Odd, Variant::Classic),
        vec![
            0, 1, 6, 8, 9, 13, 15, 16, 17, 18, 19, 20, 23, 26, 27, 29, 30, 38, 43, 45, 47, 48, 49,
            50, 51, 52, 54, 55, 56, 57, 62
        ]
    );
    assert_eq!(
        successes(&level, &route, Parity::Even, Variant::Alternate),
        vec![1, 3, 5, 11, 12, 13, 14, 18, 20, 21, 24, 29, 30, 34, 35, 38, 43, 44, 48, 53, 54, 59, 61]
    );
    assert_eq!(
        successes(&level, &route, Parity::Odd, Variant::Alternate),
        vec![1, 3, 5, 9, 11, 12, 13, 14, 19, 20, 21, 28, 29, 34, 35, 38, 43, 48, 53, 61, 63]
    );
}

#[test]
fn room_move_counts_per_seed() {
    let (level, route) = room();
    let moves = |parity, variant| -> Vec<u64> {
        (0..12)
            .map(|seed| run(&level, &route, seed, parity, variant).moves)
            .collect()
    };

    assert_eq!(
        moves(Parity::Even, Variant::Classic),
        vec![18, 17, 11, 5, 5, 7, 18, 15, 18, 11, 5, 11]
    );
    assert_eq!(
        moves(Parity::Odd, Variant::Classic),
        vec![18, 18, 12, 6, 6, 4, 18, 15, 18, 18, 4, 12]
    );
    assert_eq!(
        moves(Parity::Even, Variant::Alternate),
        vec![5, 18, 6, 18, 7, 18, 10, 16, 7, 5, 9, 18]
    );
    assert_eq!(
        moves(Parity::Odd, Variant::Alternate),
        vec![6, 18, 6, 18, 6, 18, 10, 16, 6, 18, 8, 18]
    );
}

#[test]
fn runs_are_deterministic() {
    let (level, route) = room();
    for variant in Variant::ALL {
        for parity in Parity::ALL {
            for seed in [0, 7, 0xFFFF, 0x7FFF_FFFF, u32::MAX] {
                let first = run(&level, &route, seed, parity, variant);
                let second = run(&level, &route, seed, parity, variant);
                assert_eq!(first, second, "{variant} {parity} seed {seed}");
            }
        }
    }
}

#[test]
fn parity_does_not_matter_without_reachable_monsters() {
    let mut grid = Grid::filled(Tile::WALL);
    grid.set(cell(1, 1), Tile::PLAYER_START);
    for column in 2..=4 {
        grid.set(cell(column, 1), Tile::FLOOR);
    }
    grid.set(cell(5, 1), Tile::EXIT);
    for (column, row) in [(5, 5), (6, 5), (5, 6), (6, 6)] {
        grid.set(cell(column, row), Tile::FLOOR);
    }
    grid.set(cell(5, 5), Tile::MONSTER);
    let (level, route) = prepare(grid, 0, "rrrr");

    for variant in Variant::ALL {
        for parity in Parity::ALL {
            for seed in 0..32 {
                assert_eq!(
                    run(&level, &route, seed, parity, variant),
                    report(Outcome::Succeeded, 4),
                    "{variant} {parity} seed {seed}"
                );
            }
        }
    }
}

#[test]
fn walking_into_a_waiting_monster_fails_immediately() {
    let mut grid = Grid::filled(Tile::WALL);
    grid.set(cell(1, 1), Tile::PLAYER_START);
    grid.set(cell(2, 1), Tile::MONSTER);
    grid.set(cell(3, 1), Tile::EXIT);
    let (level, route) = prepare(grid, 0, "rr");

    for variant in Variant::ALL {
        for parity in Parity::ALL {
            assert_eq!(
                run(&level, &route, 3, parity, variant),
                report(Outcome::Failed, 1),
                "{variant} {parity}"
            );
        }
    }
}
