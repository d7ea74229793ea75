#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Artillery Duel.
//!
//! The [`World`] owns the terrain, both rosters and the projectile in flight,
//! and doubles as the match controller: every mutation goes through [`apply`],
//! which advances the turn state machine and reports what happened as
//! [`Event`] values. Read access goes through the [`query`] module.

mod combatant;
mod config;
mod explosion;
mod projectile;
mod terrain;

use std::time::Duration;

use artillery_duel_core::{Command, Event, FireRejection, MatchPhase, Team};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use combatant::blast_damage;
pub use config::{Ballistics, BlastConfig, ConfigError, MatchConfig, RosterLayout, TerrainProfile};
pub use terrain::Terrain;

use combatant::Rosters;
use explosion::Blast;
use projectile::{Projectile, StepOutcome};

/// Represents the authoritative Artillery Duel world state.
#[derive(Debug)]
pub struct World {
    config: MatchConfig,
    terrain_template: Option<Terrain>,
    terrain: Terrain,
    rosters: Rosters,
    projectile: Option<Projectile>,
    phase: MatchPhase,
    wind: i32,
    rng: ChaCha8Rng,
    frame_index: u64,
}

impl World {
    /// Creates a world using the default match rules.
    #[must_use]
    pub fn new() -> Self {
        let config = MatchConfig::default();
        let terrain = Terrain::generate(config.width, config.height, &config.terrain);
        Self::assemble(config, None, terrain)
    }

    /// Creates a world using the provided rules.
    pub fn with_config(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let terrain = Terrain::generate(config.width, config.height, &config.terrain);
        Ok(Self::assemble(config, None, terrain))
    }

    /// Creates a world that plays every match on a copy of `terrain`.
    pub fn with_terrain(config: MatchConfig, terrain: Terrain) -> Result<Self, ConfigError> {
        config.validate()?;
        if terrain.width() != config.width || terrain.height() != config.height {
            return Err(ConfigError::TerrainMismatch {
                width: config.width,
                height: config.height,
                actual_width: terrain.width(),
                actual_height: terrain.height(),
            });
        }
        Ok(Self::assemble(config, Some(terrain.clone()), terrain))
    }

    fn assemble(config: MatchConfig, terrain_template: Option<Terrain>, terrain: Terrain) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut rosters = Rosters::deploy(&config);
        rosters.rest_on(&terrain);
        Self {
            config,
            terrain_template,
            terrain,
            rosters,
            projectile: None,
            phase: MatchPhase::Idle,
            wind: 0,
            rng,
            frame_index: 0,
        }
    }

    fn begin_match(&mut self, out_events: &mut Vec<Event>) {
        self.terrain = match &self.terrain_template {
            Some(template) => template.clone(),
            None => Terrain::generate(self.config.width, self.config.height, &self.config.terrain),
        };
        self.rosters = Rosters::deploy(&self.config);
        self.rosters.rest_on(&self.terrain);
        self.projectile = None;
        self.wind = self.roll_wind();
        self.phase = MatchPhase::AwaitingFire { team: Team::Red };

        info!("match started, wind {}", self.wind);
        out_events.push(Event::MatchStarted {
            first: Team::Red,
            wind: self.wind,
        });
        out_events.push(Event::TurnStarted {
            team: Team::Red,
            wind: self.wind,
        });
        for team in Team::ALL {
            out_events.push(Event::TeamHealthChanged {
                team,
                total: self.rosters.total_health(team),
            });
        }
    }

    fn roll_wind(&mut self) -> i32 {
        let limit = self.config.wind_limit.max(0);
        self.rng.gen_range(-limit..=limit)
    }

    fn start_turn(&mut self, team: Team, out_events: &mut Vec<Event>) {
        self.wind = self.roll_wind();
        self.phase = MatchPhase::AwaitingFire { team };
        debug!("turn passes to {team:?}, wind {}", self.wind);
        out_events.push(Event::TurnStarted {
            team,
            wind: self.wind,
        });
    }

    fn fire(&mut self, power: u32, angle: u32, out_events: &mut Vec<Event>) {
        let team = match self.phase {
            MatchPhase::AwaitingFire { team } => team,
            MatchPhase::Idle | MatchPhase::Finished { .. } => {
                out_events.push(Event::FireRejected {
                    team: None,
                    reason: FireRejection::MatchNotRunning,
                });
                return;
            }
            MatchPhase::Resolving { .. } | MatchPhase::RoundEnd { .. } => {
                out_events.push(Event::FireRejected {
                    team: self.phase.current_team(),
                    reason: FireRejection::NotAwaitingFire,
                });
                return;
            }
        };

        let Some(shooter) = self.rosters.first_living(team) else {
            debug!("{team:?} has nobody left to fire, skipping turn");
            out_events.push(Event::TurnSkipped { team });
            self.start_turn(team.other(), out_events);
            return;
        };

        let power = self.config.power_range.clamp(power);
        let angle = team.launch_angle(self.config.angle_range.clamp(angle));
        let shooter_id = shooter.id();
        self.projectile = Some(Projectile::launch(
            shooter.position(),
            power,
            angle,
            self.wind,
            shooter_id,
            self.config.ballistics,
        ));
        self.phase = MatchPhase::Resolving { team };

        debug!("{team:?} fires power {power} angle {angle} wind {}", self.wind);
        out_events.push(Event::ShotFired {
            team,
            shooter: shooter_id,
            power,
            angle,
            wind: self.wind,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.frame_index = self.frame_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });
        self.rosters.rest_on(&self.terrain);

        match self.phase {
            MatchPhase::Resolving { team } => self.advance_projectile(team, out_events),
            MatchPhase::RoundEnd { next, elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= self.config.settle_delay() {
                    self.start_turn(next, out_events);
                } else {
                    self.phase = MatchPhase::RoundEnd { next, elapsed };
                }
            }
            MatchPhase::Idle | MatchPhase::AwaitingFire { .. } | MatchPhase::Finished { .. } => {}
        }
    }

    fn advance_projectile(&mut self, team: Team, out_events: &mut Vec<Event>) {
        let Some(projectile) = self.projectile.as_mut() else {
            self.settle(team, out_events);
            return;
        };
        let outcome = projectile.step(&self.terrain, self.rosters.iter());

        match outcome {
            StepOutcome::InFlight => {}
            StepOutcome::Impact(center) => {
                self.projectile = None;
                debug!("impact at ({:.1}, {:.1})", center.x(), center.y());
                Blast::new(center, &self.config.blast).detonate(
                    &mut self.terrain,
                    &mut self.rosters,
                    out_events,
                );
                if !self.check_for_winner(out_events) {
                    self.settle(team, out_events);
                }
            }
            StepOutcome::LeftWorld(last_position) => {
                self.projectile = None;
                debug!(
                    "projectile left the world at ({:.1}, {:.1})",
                    last_position.x(),
                    last_position.y()
                );
                out_events.push(Event::ProjectileLeftWorld { last_position });
                self.settle(team, out_events);
            }
        }
    }

    fn settle(&mut self, team: Team, out_events: &mut Vec<Event>) {
        self.phase = MatchPhase::RoundEnd {
            next: team.other(),
            elapsed: Duration::ZERO,
        };
        out_events.push(Event::RoundSettling {
            delay: self.config.settle_delay(),
        });
    }

    /// Ends the match when a team has no health left and reports whether it did.
    ///
    /// A finished match is never reopened, and running the check without any
    /// intervening health change leaves the state untouched.
    fn check_for_winner(&mut self, out_events: &mut Vec<Event>) -> bool {
        if let MatchPhase::Finished { .. } = self.phase {
            return true;
        }
        let winner = if self.rosters.total_health(Team::Red) == 0 {
            Team::Blue
        } else if self.rosters.total_health(Team::Blue) == 0 {
            Team::Red
        } else {
            return false;
        };

        self.phase = MatchPhase::Finished { winner };
        self.projectile = None;
        info!("match finished, {winner:?} wins");
        out_events.push(Event::MatchFinished { winner });
        true
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartMatch => {
            if world.phase.is_running() {
                debug!("start ignored, a match is already running");
                return;
            }
            world.begin_match(out_events);
        }
        Command::RestartMatch => world.begin_match(out_events),
        Command::Fire { power, angle } => world.fire(power, angle, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use artillery_duel_core::{CombatantId, Health, MatchPhase, Team, WorldPoint};

    use super::{MatchConfig, Terrain, World};

    /// Current state of the match controller.
    #[must_use]
    pub fn phase(world: &World) -> MatchPhase {
        world.phase
    }

    /// Team whose turn it currently is, if a match is running.
    #[must_use]
    pub fn current_team(world: &World) -> Option<Team> {
        world.phase.current_team()
    }

    /// Wind in effect for the current turn.
    #[must_use]
    pub fn wind(world: &World) -> i32 {
        world.wind
    }

    /// Sum of the health of every living combatant on the team.
    #[must_use]
    pub fn team_health(world: &World, team: Team) -> u32 {
        world.rosters.total_health(team)
    }

    /// Rules the world was configured with.
    #[must_use]
    pub fn config(world: &World) -> &MatchConfig {
        &world.config
    }

    /// Provides read-only access to the destructible terrain.
    #[must_use]
    pub fn terrain(world: &World) -> &Terrain {
        &world.terrain
    }

    /// Number of frames simulated since the world was created.
    #[must_use]
    pub fn frame_index(world: &World) -> u64 {
        world.frame_index
    }

    /// Captures a read-only view of every combatant, red roster first.
    #[must_use]
    pub fn combatants(world: &World) -> Vec<CombatantSnapshot> {
        world
            .rosters
            .iter()
            .map(|combatant| CombatantSnapshot {
                id: combatant.id(),
                team: combatant.team(),
                position: combatant.position(),
                radius: combatant.radius(),
                health: combatant.health(),
                alive: combatant.is_alive(),
            })
            .collect()
    }

    /// Captures the projectile in flight, if any.
    #[must_use]
    pub fn projectile(world: &World) -> Option<ProjectileSnapshot> {
        world.projectile.as_ref().map(|projectile| {
            let (vx, vy) = projectile.velocity();
            ProjectileSnapshot {
                position: projectile.position(),
                velocity: WorldPoint::new(vx, vy),
                trail: projectile.trail().collect(),
                shooter: projectile.shooter(),
                radius: world.config.ballistics.radius,
            }
        })
    }

    /// Immutable representation of a single combatant.
    #[derive(Clone, Debug, PartialEq)]
    pub struct CombatantSnapshot {
        /// Unique identifier assigned to the combatant.
        pub id: CombatantId,
        /// Team the combatant belongs to.
        pub team: Team,
        /// Centre of the combatant, resting on the terrain.
        pub position: WorldPoint,
        /// Contact radius of the combatant.
        pub radius: f32,
        /// Remaining health.
        pub health: Health,
        /// Whether the combatant is still alive.
        pub alive: bool,
    }

    /// Immutable representation of the projectile in flight.
    #[derive(Clone, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Current centre of the projectile.
        pub position: WorldPoint,
        /// Velocity per step, expressed as a displacement.
        pub velocity: WorldPoint,
        /// Recent positions, oldest first.
        pub trail: Vec<WorldPoint>,
        /// Combatant that fired the projectile.
        pub shooter: CombatantId,
        /// Contact radius of the projectile.
        pub radius: f32,
    }
}
