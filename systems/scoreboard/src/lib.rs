#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic system that folds match events into the published scoreboard.

use artillery_duel_core::{Event, Team};
use log::debug;

/// Match state presented to the players between frames.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreboardSummary {
    /// Team whose turn it is, if a match is running.
    pub current_team: Option<Team>,
    /// Wind in effect for the current turn.
    pub wind: i32,
    /// Combined health of the red team.
    pub red_total: u32,
    /// Combined health of the blue team.
    pub blue_total: u32,
    /// Winner of the finished match, if any.
    pub winner: Option<Team>,
    /// Shots fired since the match started.
    pub shots_fired: u32,
    /// One-based number of the current turn; zero before the first turn.
    pub turn: u32,
}

impl ScoreboardSummary {
    /// Combined health of the provided team.
    #[must_use]
    pub const fn total(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red_total,
            Team::Blue => self.blue_total,
        }
    }
}

/// Pure scoreboard system that tracks match progress from world events.
#[derive(Debug, Default)]
pub struct Scoreboard {
    summary: ScoreboardSummary,
    revision: u64,
}

impl Scoreboard {
    /// Creates a scoreboard that has not observed a match yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the latest published summary.
    #[must_use]
    pub const fn summary(&self) -> &ScoreboardSummary {
        &self.summary
    }

    /// Counter bumped whenever the summary changes.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Folds the events emitted by the world into the summary.
    pub fn handle(&mut self, events: &[Event]) {
        let before = self.summary.clone();

        for event in events {
            match event {
                Event::MatchStarted { first, wind } => {
                    self.summary = ScoreboardSummary {
                        current_team: Some(*first),
                        wind: *wind,
                        ..ScoreboardSummary::default()
                    };
                }
                Event::TurnStarted { team, wind } => {
                    self.summary.current_team = Some(*team);
                    self.summary.wind = *wind;
                    self.summary.turn = self.summary.turn.saturating_add(1);
                }
                Event::ShotFired { .. } => {
                    self.summary.shots_fired = self.summary.shots_fired.saturating_add(1);
                }
                Event::TeamHealthChanged { team, total } => match team {
                    Team::Red => self.summary.red_total = *total,
                    Team::Blue => self.summary.blue_total = *total,
                },
                Event::MatchFinished { winner } => {
                    self.summary.winner = Some(*winner);
                    self.summary.current_team = None;
                }
                _ => {}
            }
        }

        if self.summary != before {
            self.revision = self.revision.wrapping_add(1);
            debug!(
                "scoreboard revision {}: red {} blue {}",
                self.revision, self.summary.red_total, self.summary.blue_total
            );
        }
    }
}
