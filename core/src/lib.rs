#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Artillery Duel engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Width of the battlefield measured in terrain cells (one cell per pixel).
pub const WORLD_WIDTH: u32 = 800;
/// Height of the battlefield measured in terrain cells.
pub const WORLD_HEIGHT: u32 = 500;

/// Radius of a combatant's contact circle in world units.
pub const COMBATANT_RADIUS: f32 = 8.0;

/// Radius of a projectile's contact circle in world units.
pub const PROJECTILE_RADIUS: f32 = 4.0;
/// Gravity added to a projectile's vertical velocity on every step.
pub const GRAVITY: f32 = 0.2;
/// Divides the fire power to obtain the launch speed.
pub const POWER_DIVISOR: f32 = 10.0;
/// Divides the wind to obtain its contribution to the launch velocity.
pub const WIND_TO_VELOCITY_DIVISOR: f32 = 20.0;
/// Divides the wind to obtain the lateral drift applied on every step.
pub const WIND_DRIFT_DIVISOR: f32 = 100.0;
/// Number of recent positions retained in a projectile trail.
pub const TRAIL_LENGTH: usize = 10;

/// Radius within which an explosion carves terrain and damages combatants.
pub const BLAST_RADIUS: f32 = 40.0;
/// Damage dealt at the epicentre of an explosion.
pub const MAX_BLAST_DAMAGE: u32 = 50;

/// Largest wind magnitude rolled at the start of a turn.
pub const WIND_LIMIT: i32 = 10;
/// Pause between a resolved shot and the next turn.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Inclusive bounds of the power slider.
pub const POWER_RANGE: SliderRange = SliderRange::new(10, 100);
/// Inclusive bounds of the angle slider, in degrees above the horizon.
pub const ANGLE_RANGE: SliderRange = SliderRange::new(0, 90);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Starts a new match when no match is currently running.
    StartMatch,
    /// Discards the current match, if any, and starts a fresh one.
    RestartMatch,
    /// Fires a shot for the team whose turn it is.
    Fire {
        /// Launch power as reported by the power slider.
        power: u32,
        /// Launch angle in degrees above the horizon, facing the enemy.
        angle: u32,
    },
    /// Advances the simulation by a single frame.
    Tick {
        /// Wall-clock time represented by the frame.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation advanced by one frame.
    TimeAdvanced {
        /// Wall-clock time represented by the frame.
        dt: Duration,
    },
    /// Announces that a fresh match began.
    MatchStarted {
        /// Team that fires first.
        first: Team,
        /// Wind rolled for the first turn.
        wind: i32,
    },
    /// Announces that a team may now fire.
    TurnStarted {
        /// Team whose turn began.
        team: Team,
        /// Wind in effect for the turn.
        wind: i32,
    },
    /// Confirms that a projectile was launched.
    ShotFired {
        /// Team that fired.
        team: Team,
        /// Combatant the projectile was launched from.
        shooter: CombatantId,
        /// Power after clamping to the slider bounds.
        power: u32,
        /// Absolute launch angle in degrees, after mirroring for the team.
        angle: u32,
        /// Wind applied to the shot.
        wind: i32,
    },
    /// Reports that a fire command was ignored.
    FireRejected {
        /// Team that was expected to act, if a match is running.
        team: Option<Team>,
        /// Reason the command was ignored.
        reason: FireRejection,
    },
    /// Reports that a team without living combatants forfeited its turn.
    TurnSkipped {
        /// Team whose turn was skipped.
        team: Team,
    },
    /// Reports that a projectile detonated.
    Exploded {
        /// Point of detonation.
        center: WorldPoint,
        /// Radius of the blast.
        radius: f32,
        /// Number of solid terrain cells removed by the blast.
        cleared_cells: u32,
    },
    /// Reports that a combatant lost health in a blast.
    CombatantDamaged {
        /// Combatant that was hit.
        combatant: CombatantId,
        /// Health removed by the blast.
        amount: u32,
        /// Health remaining after the blast.
        health: Health,
    },
    /// Reports that a combatant's health reached zero.
    CombatantKilled {
        /// Combatant that died.
        combatant: CombatantId,
    },
    /// Reports a team's new total of living health.
    TeamHealthChanged {
        /// Team whose total changed.
        team: Team,
        /// Sum of the health of every living combatant on the team.
        total: u32,
    },
    /// Reports that a projectile left the world without hitting anything.
    ProjectileLeftWorld {
        /// Last position of the projectile.
        last_position: WorldPoint,
    },
    /// Reports that the shot resolved and the next turn is pending.
    RoundSettling {
        /// Time that must elapse before the next turn starts.
        delay: Duration,
    },
    /// Announces the end of the match.
    MatchFinished {
        /// Team left standing.
        winner: Team,
    },
}

/// Reasons a fire command may be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireRejection {
    /// No match is running.
    MatchNotRunning,
    /// A projectile is in flight or the round is settling.
    NotAwaitingFire,
}

/// One of the two opposing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Left-hand team, always fires first.
    Red,
    /// Right-hand team; aims mirrored.
    Blue,
}

impl Team {
    /// Both teams in turn order.
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// Returns the opposing team.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Converts an angle on the shared slider into an absolute launch angle.
    ///
    /// Both teams aim "outward" from their side of the map, so the blue team
    /// mirrors the slider across the vertical axis.
    #[must_use]
    pub const fn launch_angle(self, slider_angle: u32) -> u32 {
        match self {
            Self::Red => slider_angle,
            Self::Blue => 180_u32.saturating_sub(slider_angle),
        }
    }
}

/// Unique identifier assigned to a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(u32);

impl CombatantId {
    /// Creates a new combatant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Health of a combatant, bounded to `0..=Health::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Health of a freshly placed combatant.
    pub const MAX: Self = Self(100);
    /// Health of a dead combatant.
    pub const ZERO: Self = Self(0);

    /// Creates a new health value, clamped to the maximum.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns `true` once no health remains.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts damage without dropping below zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Fraction of the maximum health that remains.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.0 as f32 / Self::MAX.0 as f32
    }
}

/// Continuous position in world units. The y axis grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, growing toward the world floor.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Grid cell containing the point, using floor semantics on both axes.
    #[must_use]
    pub fn cell(self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// Inclusive integer bounds of an input slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SliderRange {
    min: u32,
    max: u32,
}

impl SliderRange {
    /// Creates a new slider range. Swapped bounds are reordered.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Smallest permitted value.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Largest permitted value.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Clamps a raw value into the range.
    #[must_use]
    pub const fn clamp(&self, value: u32) -> u32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Value halfway between the bounds, rounded down.
    #[must_use]
    pub const fn midpoint(&self) -> u32 {
        self.min + (self.max - self.min) / 2
    }
}

/// Externally visible state of the match controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No match has been started yet.
    Idle,
    /// The team may fire.
    AwaitingFire {
        /// Team whose turn it is.
        team: Team,
    },
    /// A projectile fired by the team is in flight.
    Resolving {
        /// Team that fired the projectile.
        team: Team,
    },
    /// The shot resolved; the next turn starts once the settle delay elapses.
    RoundEnd {
        /// Team that will act next.
        next: Team,
        /// Time spent settling so far.
        elapsed: Duration,
    },
    /// The match ended.
    Finished {
        /// Team left standing.
        winner: Team,
    },
}

impl MatchPhase {
    /// Returns `true` while a match is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !matches!(self, Self::Idle | Self::Finished { .. })
    }

    /// Team whose turn it currently is, if any.
    #[must_use]
    pub const fn current_team(&self) -> Option<Team> {
        match self {
            Self::AwaitingFire { team } | Self::Resolving { team } => Some(*team),
            Self::RoundEnd { next, .. } => Some(next.other()),
            Self::Idle | Self::Finished { .. } => None,
        }
    }
}
