use std::time::Duration;

use artillery_duel_core::{Command, Event, MatchPhase, WorldPoint};
use artillery_duel_rendering::{
    visuals::ParticleField, CombatantPresentation, HudPresentation, ProjectilePresentation, Scene,
    TerrainPresentation,
};
use artillery_duel_system_fire_control::{AimInput, FireControl};
use artillery_duel_system_scoreboard::{Scoreboard, ScoreboardSummary};
use artillery_duel_world::{self as world, query, MatchConfig, World};
use glam::Vec2;
use log::{debug, info};

/// Salt mixed into the match seed so particles never share the wind stream.
const PARTICLE_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Requests gathered for a single frame, independent of where they came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameRequest {
    pub(crate) start: bool,
    pub(crate) restart: bool,
    pub(crate) aim: AimInput,
}

/// Owns the world and the systems that drive it for one player session.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    fire_control: FireControl,
    scoreboard: Scoreboard,
    particles: ParticleField,
    terrain_version: u64,
}

impl Session {
    pub(crate) fn new(world: World) -> Self {
        let config = query::config(&world);
        let fire_control = FireControl::new(config.power_range, config.angle_range);
        let particles = ParticleField::new(config.seed ^ PARTICLE_SEED_SALT);
        Self {
            world,
            fire_control,
            scoreboard: Scoreboard::new(),
            particles,
            terrain_version: 0,
        }
    }

    pub(crate) fn config(&self) -> &MatchConfig {
        query::config(&self.world)
    }

    pub(crate) fn phase(&self) -> MatchPhase {
        query::phase(&self.world)
    }

    pub(crate) fn summary(&self) -> &ScoreboardSummary {
        self.scoreboard.summary()
    }

    pub(crate) fn fire_control(&self) -> &FireControl {
        &self.fire_control
    }

    /// Runs one frame: lifecycle requests, aiming, then a simulation tick.
    pub(crate) fn advance(&mut self, dt: Duration, request: FrameRequest) -> Vec<Event> {
        let mut commands = Vec::new();
        if request.restart {
            commands.push(Command::RestartMatch);
        } else if request.start {
            commands.push(Command::StartMatch);
        }

        let mut events = Vec::new();
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        self.fire_control
            .handle(query::phase(&self.world), request.aim, &mut commands);
        commands.push(Command::Tick { dt });
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        self.particles.step();
        for event in &events {
            self.observe(event);
        }
        self.scoreboard.handle(&events);
        events
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::MatchStarted { .. } => {
                self.particles.clear();
                self.terrain_version = self.terrain_version.wrapping_add(1);
            }
            Event::ShotFired {
                team, power, angle, ..
            } => {
                info!("{team:?} fired with power {power} at {angle} degrees");
            }
            Event::Exploded {
                center,
                cleared_cells,
                ..
            } => {
                self.particles.burst(to_vec2(*center));
                if *cleared_cells > 0 {
                    self.terrain_version = self.terrain_version.wrapping_add(1);
                }
            }
            Event::FireRejected { reason, .. } => debug!("fire rejected: {reason:?}"),
            Event::MatchFinished { winner } => info!("{winner:?} team wins"),
            _ => {}
        }
    }

    /// Builds a scene from scratch.
    pub(crate) fn scene(&self) -> Scene {
        Scene::new(
            self.terrain_presentation(),
            self.combatants(),
            self.projectile(),
            self.particles.snapshot(),
            self.hud(),
        )
    }

    /// Refreshes an existing scene, resampling the terrain only when it changed.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        if scene.terrain.revision() != self.terrain_version {
            scene.terrain = self.terrain_presentation();
        }
        scene.combatants = self.combatants();
        scene.projectile = self.projectile();
        scene.particles = self.particles.snapshot();
        scene.hud = self.hud();
    }

    fn terrain_presentation(&self) -> TerrainPresentation {
        let terrain = query::terrain(&self.world);
        TerrainPresentation::from_fn(
            terrain.width(),
            terrain.height(),
            self.terrain_version,
            |x, y| terrain.is_solid(i64::from(x), i64::from(y)),
        )
    }

    fn combatants(&self) -> Vec<CombatantPresentation> {
        query::combatants(&self.world)
            .into_iter()
            .map(|combatant| CombatantPresentation {
                id: combatant.id,
                team: combatant.team,
                position: to_vec2(combatant.position),
                radius: combatant.radius,
                health: combatant.health,
                alive: combatant.alive,
            })
            .collect()
    }

    fn projectile(&self) -> Option<ProjectilePresentation> {
        query::projectile(&self.world).map(|projectile| ProjectilePresentation {
            position: to_vec2(projectile.position),
            radius: projectile.radius,
            trail: projectile.trail.into_iter().map(to_vec2).collect(),
        })
    }

    fn hud(&self) -> HudPresentation {
        let summary = self.scoreboard.summary();
        HudPresentation {
            current_team: summary.current_team,
            wind: summary.wind,
            red_total: summary.red_total,
            blue_total: summary.blue_total,
            winner: summary.winner,
            turn: summary.turn,
            power: self.fire_control.power(),
            angle: self.fire_control.angle(),
            awaiting_start: query::phase(&self.world) == MatchPhase::Idle,
        }
    }
}

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x(), point.y())
}
