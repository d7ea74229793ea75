use std::time::Duration;

use artillery_duel_core::{Command, Team};
use artillery_duel_system_scoreboard::{Scoreboard, ScoreboardSummary};
use artillery_duel_world::{self as world, query, MatchConfig, World};

#[test]
fn scoreboard_tracks_the_world_through_a_replay() {
    let first = replay(duel_script());
    let second = replay(duel_script());

    assert_eq!(first, second, "scoreboard replay diverged");
    assert_eq!(first.shots_fired, 3);
    assert!(first.turn >= 3);
}

fn replay(commands: Vec<Command>) -> ScoreboardSummary {
    let mut world = World::with_config(MatchConfig::default()).expect("valid config");
    let mut scoreboard = Scoreboard::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        scoreboard.handle(&events);

        let summary = scoreboard.summary();
        assert_eq!(summary.red_total, query::team_health(&world, Team::Red));
        assert_eq!(summary.blue_total, query::team_health(&world, Team::Blue));
        assert_eq!(summary.wind, query::wind(&world));
        if summary.winner.is_none() {
            assert_eq!(summary.current_team, query::current_team(&world));
        }
    }

    scoreboard.summary().clone()
}

fn duel_script() -> Vec<Command> {
    let tick = Command::Tick {
        dt: Duration::from_millis(16),
    };
    let mut script = vec![Command::StartMatch];
    for (power, angle) in [(65, 45), (70, 50), (55, 35)] {
        script.push(Command::Fire { power, angle });
        script.extend(std::iter::repeat(tick.clone()).take(400));
    }
    script
}
