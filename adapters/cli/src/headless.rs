use std::time::Duration;

use anyhow::{bail, Result};
use artillery_duel_core::{MatchPhase, Team};
use artillery_duel_system_fire_control::AimInput;
use artillery_duel_system_scoreboard::ScoreboardSummary;
use log::debug;

use crate::{
    session::{FrameRequest, Session},
    shot_script::{ScriptedShot, ShotScript},
};

/// Fixed simulation step used when no window paces the loop.
pub(crate) const HEADLESS_FRAME: Duration = Duration::from_nanos(16_666_667);
/// Upper bound on frames spent waiting for one shot to resolve.
const MAX_FRAMES_PER_SHOT: u32 = 10_000;

/// Result of a headless session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessReport {
    pub(crate) frames: u64,
    pub(crate) shots_played: usize,
    pub(crate) summary: ScoreboardSummary,
}

/// Starts a match and plays the scripted shots, alternating teams, until the
/// script runs out or a team wins.
pub(crate) fn run_headless(session: &mut Session, script: &ShotScript) -> Result<HeadlessReport> {
    let mut frames = 0_u64;
    let _ = session.advance(
        HEADLESS_FRAME,
        FrameRequest {
            start: true,
            ..FrameRequest::default()
        },
    );
    frames += 1;

    let mut shots_played = 0;
    for shot in script.shots() {
        frames += settle(session)?;
        if matches!(session.phase(), MatchPhase::Finished { .. }) {
            break;
        }

        debug!("scripted shot {shots_played}: power {} angle {}", shot.power, shot.angle);
        let _ = session.advance(HEADLESS_FRAME, aim_at(session, *shot));
        frames += 1;
        shots_played += 1;
    }
    frames += settle(session)?;

    Ok(HeadlessReport {
        frames,
        shots_played,
        summary: session.summary().clone(),
    })
}

/// Ticks until the session accepts a shot again or the match is over.
fn settle(session: &mut Session) -> Result<u64> {
    for frame in 0..MAX_FRAMES_PER_SHOT {
        match session.phase() {
            MatchPhase::AwaitingFire { .. } | MatchPhase::Finished { .. } | MatchPhase::Idle => {
                return Ok(u64::from(frame));
            }
            MatchPhase::Resolving { .. } | MatchPhase::RoundEnd { .. } => {
                let _ = session.advance(HEADLESS_FRAME, FrameRequest::default());
            }
        }
    }
    bail!("match did not settle within {MAX_FRAMES_PER_SHOT} frames")
}

fn aim_at(session: &Session, shot: ScriptedShot) -> FrameRequest {
    let control = session.fire_control();
    FrameRequest {
        aim: AimInput {
            power_delta: delta(control.power(), shot.power),
            angle_delta: delta(control.angle(), shot.angle),
            fire: true,
        },
        ..FrameRequest::default()
    }
}

fn delta(current: u32, target: u32) -> i32 {
    let delta = i64::from(target) - i64::from(current);
    i32::try_from(delta).unwrap_or(if delta < 0 { i32::MIN } else { i32::MAX })
}

/// Human readable summary printed at the end of a headless run.
pub(crate) fn format_report(report: &HeadlessReport) -> String {
    let summary = &report.summary;
    let outcome = match summary.winner {
        Some(Team::Red) => String::from("Red team wins"),
        Some(Team::Blue) => String::from("Blue team wins"),
        None => match summary.current_team {
            Some(team) => format!("undecided, {team:?} to fire"),
            None => String::from("no match played"),
        },
    };
    format!(
        "{outcome}\nred {} | blue {}\nshots {} over {} turns, {} frames",
        summary.red_total, summary.blue_total, summary.shots_fired, summary.turn, report.frames
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use artillery_duel_world::{MatchConfig, World};

    fn calm_session() -> Session {
        let config = MatchConfig {
            wind_limit: 0,
            ..MatchConfig::default()
        };
        Session::new(World::with_config(config).expect("valid config"))
    }

    #[test]
    fn scripted_shots_alternate_between_teams() {
        let mut session = calm_session();
        let script = ShotScript::parse("60:45,60:45,70:40").expect("valid script");

        let report = run_headless(&mut session, &script).expect("headless run");

        assert_eq!(report.shots_played, 3);
        assert_eq!(report.summary.shots_fired, 3);
        assert_eq!(report.summary.current_team, Some(Team::Blue));
        assert_eq!(report.summary.turn, 4);
        assert!(report.frames > 3 * 63);
    }

    #[test]
    fn headless_runs_are_reproducible() {
        let script = ShotScript::parse("55:50,65:40,45:60,80:30").expect("valid script");
        let first = run_headless(&mut calm_session(), &script).expect("first run");
        let second = run_headless(&mut calm_session(), &script).expect("second run");

        assert_eq!(first, second);
    }

    #[test]
    fn scripted_values_reach_the_sliders() {
        let session = calm_session();
        let request = aim_at(
            &session,
            ScriptedShot {
                power: 80,
                angle: 10,
            },
        );

        assert_eq!(request.aim.power_delta, 80 - 55);
        assert_eq!(request.aim.angle_delta, 10 - 45);
        assert!(request.aim.fire);
    }

    #[test]
    fn report_names_the_winner() {
        let report = HeadlessReport {
            frames: 420,
            shots_played: 9,
            summary: ScoreboardSummary {
                winner: Some(Team::Blue),
                red_total: 0,
                blue_total: 35,
                shots_fired: 9,
                turn: 9,
                ..ScoreboardSummary::default()
            },
        };

        assert_eq!(
            format_report(&report),
            "Blue team wins\nred 0 | blue 35\nshots 9 over 9 turns, 420 frames"
        );
    }
}
