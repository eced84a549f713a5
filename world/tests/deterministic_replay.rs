use lifegrid_core::{BoundaryPolicy, Command, Event, GridSnapshot, Pattern};
use lifegrid_world::{self as world, query, LifeGrid};

fn glider() -> Pattern {
    Pattern::from_pairs(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)])
}

fn beacon() -> Pattern {
    Pattern::from_pairs(&[
        (0, 0),
        (0, 1),
        (1, 0),
        (1, 1),
        (2, 2),
        (2, 3),
        (3, 2),
        (3, 3),
    ])
}

fn replay(
    grid: &mut LifeGrid,
    commands: impl IntoIterator<Item = Command>,
) -> (Vec<Event>, GridSnapshot) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(grid, command, &mut events);
    }
    (events, grid.snapshot())
}

fn load(pattern: Pattern, origin_row: i64, origin_column: i64) -> Command {
    Command::LoadPattern {
        pattern,
        origin_row,
        origin_column,
    }
}

fn advances(count: usize) -> impl Iterator<Item = Command> {
    std::iter::repeat(Command::Advance).take(count)
}

#[test]
fn glider_translates_one_cell_diagonally_every_four_generations() {
    let mut grid = LifeGrid::with_size(8, 8, BoundaryPolicy::Toroidal).expect("grid");
    let _ = replay(&mut grid, [load(glider(), 0, 0)]);
    let (_, after_four) = replay(&mut grid, advances(4));

    let mut expected = LifeGrid::with_size(8, 8, BoundaryPolicy::Toroidal).expect("grid");
    let _ = expected.load_pattern(&glider(), 1, 1);

    assert_eq!(after_four, expected.snapshot());
    assert_eq!(query::generation(&grid), 4);
}

#[test]
fn glider_circumnavigates_the_torus() {
    let mut grid = LifeGrid::with_size(8, 8, BoundaryPolicy::Toroidal).expect("grid");
    let (_, initial) = replay(&mut grid, [load(glider(), 2, 3)]);
    let (events, after) = replay(&mut grid, advances(32));

    assert_eq!(after, initial, "8 diagonal steps of 4 generations each");
    assert!(events.iter().all(|event| matches!(
        event,
        Event::GenerationAdvanced { summary } if summary.population == 5
    )));
}

#[test]
fn replays_are_deterministic() {
    let script = || {
        [load(glider(), 1, 1), load(glider(), 5, 4)]
            .into_iter()
            .chain(advances(40))
    };

    let mut first = LifeGrid::with_size(15, 30, BoundaryPolicy::Toroidal).expect("grid");
    let mut second = LifeGrid::with_size(15, 30, BoundaryPolicy::Toroidal).expect("grid");

    assert_eq!(replay(&mut first, script()), replay(&mut second, script()));
}

#[test]
fn clamped_beacon_oscillates_between_eight_and_six_cells() {
    let mut grid = LifeGrid::with_size(10, 30, BoundaryPolicy::Clamped).expect("grid");
    let (_, initial) = replay(&mut grid, [load(beacon(), 3, 3)]);
    let (events, _) = replay(&mut grid, advances(4));

    let populations: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            Event::GenerationAdvanced { summary } => Some(summary.population),
            _ => None,
        })
        .collect();
    assert_eq!(populations, vec![6, 8, 6, 8]);
    assert_eq!(grid.snapshot(), initial);
}

#[test]
fn clamped_edges_do_not_wrap_a_blinker() {
    let horizontal = Pattern::from_pairs(&[(0, 0), (0, 1), (0, 2)]);

    let mut clamped = LifeGrid::with_size(5, 5, BoundaryPolicy::Clamped).expect("grid");
    let (events, _) = replay(&mut clamped, [load(horizontal.clone(), 0, 1), Command::Advance]);
    assert!(matches!(
        events.last(),
        Some(Event::GenerationAdvanced { summary }) if summary.population == 2
    ));

    let mut toroidal = LifeGrid::with_size(5, 5, BoundaryPolicy::Toroidal).expect("grid");
    let (events, _) = replay(&mut toroidal, [load(horizontal, 0, 1), Command::Advance]);
    assert!(matches!(
        events.last(),
        Some(Event::GenerationAdvanced { summary }) if summary.population == 3
    ));
}

#[test]
fn clear_empties_the_grid_but_keeps_counting() {
    let mut grid = LifeGrid::with_size(6, 6, BoundaryPolicy::Clamped).expect("grid");
    let (events, snapshot) = replay(
        &mut grid,
        [load(beacon(), 1, 1), Command::Advance, Command::Clear, Command::Advance],
    );

    assert_eq!(snapshot.population(), 0);
    assert_eq!(events[2], Event::GridCleared { generation: 1 });
    assert_eq!(query::generation(&grid), 2);
}
