use lifegrid_core::{BoundaryPolicy, Command, Event, Pattern, PopulationReport};
use lifegrid_system_analytics::Analytics;
use lifegrid_world::{self as world, LifeGrid};

fn replay(grid: &mut LifeGrid, analytics: &mut Analytics, commands: Vec<Command>) -> Vec<PopulationReport> {
    let mut reports = Vec::new();
    for command in commands {
        let mut events = Vec::new();
        world::apply(grid, command, &mut events);

        let mut emitted = Vec::new();
        analytics.handle(&events, &mut emitted);
        reports.extend(emitted.into_iter().filter_map(|event| match event {
            Event::PopulationUpdated { report } => Some(report),
            _ => None,
        }));
    }
    reports
}

fn load(pairs: &[(i64, i64)], origin_row: i64, origin_column: i64) -> Command {
    Command::LoadPattern {
        pattern: Pattern::from_pairs(pairs),
        origin_row,
        origin_column,
    }
}

#[test]
fn blinker_reports_steady_population() {
    let mut grid = LifeGrid::with_size(7, 15, BoundaryPolicy::Toroidal).expect("grid");
    let mut analytics = Analytics::new();

    let reports = replay(
        &mut grid,
        &mut analytics,
        vec![
            load(&[(0, 0), (0, 1), (0, 2)], 3, 7),
            Command::Advance,
            Command::Advance,
        ],
    );

    assert_eq!(
        reports,
        vec![
            PopulationReport {
                generation: 1,
                population: 3,
                peak_population: 3,
                births: 2,
                deaths: 2,
                total_births: 2,
                total_deaths: 2,
            },
            PopulationReport {
                generation: 2,
                population: 3,
                peak_population: 3,
                births: 2,
                deaths: 2,
                total_births: 4,
                total_deaths: 4,
            },
        ]
    );
}

#[test]
fn dying_cells_keep_the_peak() {
    let mut grid = LifeGrid::with_size(5, 5, BoundaryPolicy::Clamped).expect("grid");
    let mut analytics = Analytics::new();

    let reports = replay(
        &mut grid,
        &mut analytics,
        vec![
            load(&[(0, 0), (0, 1), (0, 2)], 0, 0),
            Command::Advance,
            Command::Advance,
            Command::Advance,
        ],
    );

    let populations: Vec<_> = reports.iter().map(|report| report.population).collect();
    assert_eq!(populations, vec![2, 0, 0]);
    assert!(reports.iter().all(|report| report.peak_population == 2));
    assert_eq!(analytics.last_report().map(|report| report.total_deaths), Some(4));
}

#[test]
fn clearing_resets_totals() {
    let mut grid = LifeGrid::with_size(6, 6, BoundaryPolicy::Clamped).expect("grid");
    let mut analytics = Analytics::new();

    let _ = replay(
        &mut grid,
        &mut analytics,
        vec![load(&[(0, 0), (0, 1), (0, 2)], 2, 1), Command::Advance],
    );
    let reports = replay(&mut grid, &mut analytics, vec![Command::Clear, Command::Advance]);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].generation, 2);
    assert_eq!(reports[0].peak_population, 0);
    assert_eq!(reports[0].total_births, 0);
}

#[test]
fn analytics_replay_is_deterministic() {
    let script = || {
        let mut commands = vec![
            load(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)], 1, 1),
            load(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)], 5, 4),
        ];
        commands.extend(std::iter::repeat(Command::Advance).take(30));
        commands
    };

    let mut first_grid = LifeGrid::with_size(15, 30, BoundaryPolicy::Toroidal).expect("grid");
    let mut second_grid = LifeGrid::with_size(15, 30, BoundaryPolicy::Toroidal).expect("grid");

    let first = replay(&mut first_grid, &mut Analytics::new(), script());
    let second = replay(&mut second_grid, &mut Analytics::new(), script());

    assert_eq!(first.len(), 30);
    assert_eq!(first, second);
}
