use std::time::Duration;

use artillery_duel_core::{Command, Event};
use artillery_duel_world::{self as world, query, MatchConfig, World};

#[test]
fn identical_seeds_replay_identical_matches() {
    let script = duel_script();
    let first = replay(MatchConfig::default(), script.clone());
    let second = replay(MatchConfig::default(), script);

    assert_eq!(first, second, "match replay diverged");
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::Exploded { .. } | Event::ProjectileLeftWorld { .. })));
}

#[test]
fn restart_keeps_drawing_from_the_same_wind_stream() {
    let mut world = World::with_config(MatchConfig::default()).expect("valid config");
    let mut winds = Vec::new();
    for _ in 0..12 {
        let mut events = Vec::new();
        world::apply(&mut world, Command::RestartMatch, &mut events);
        winds.push(query::wind(&world));
    }

    let mut fresh = World::with_config(MatchConfig::default()).expect("valid config");
    let mut events = Vec::new();
    world::apply(&mut fresh, Command::RestartMatch, &mut events);

    assert_eq!(query::wind(&fresh), winds[0]);
    assert!(
        winds.iter().any(|wind| *wind != winds[0]),
        "restarts should not reseed the wind: {winds:?}"
    );
}

fn replay(config: MatchConfig, commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::with_config(config).expect("valid config");
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    ReplayOutcome {
        events,
        terrain_revision: query::terrain(&world).revision(),
        red: query::team_health(&world, artillery_duel_core::Team::Red),
        blue: query::team_health(&world, artillery_duel_core::Team::Blue),
    }
}

fn duel_script() -> Vec<Command> {
    let tick = Command::Tick {
        dt: Duration::from_millis(16),
    };
    let mut script = vec![Command::StartMatch];
    for (power, angle) in [(60, 45), (75, 50), (40, 30), (90, 60)] {
        script.push(Command::Fire { power, angle });
        script.extend(std::iter::repeat(tick.clone()).take(400));
    }
    script
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    terrain_revision: u64,
    red: u32,
    blue: u32,
}
