//! Ballistic projectile flight and collision testing.

use std::collections::VecDeque;

use artillery_duel_core::{CombatantId, WorldPoint};

use crate::{combatant::Combatant, config::Ballistics, terrain::Terrain};

/// Result of advancing a projectile by one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum StepOutcome {
    /// The projectile is still flying.
    InFlight,
    /// The projectile struck terrain or a combatant and must explode here.
    Impact(WorldPoint),
    /// The projectile crossed the side edges or the floor without hitting anything.
    LeftWorld(WorldPoint),
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    drift: f32,
    trail: VecDeque<WorldPoint>,
    shooter: CombatantId,
    // The shooter is ignored until the projectile has left its contact circle once.
    armed: bool,
    ballistics: Ballistics,
}

impl Projectile {
    /// Launches a projectile from `origin` at `angle_degrees` above the horizon.
    pub(crate) fn launch(
        origin: WorldPoint,
        power: u32,
        angle_degrees: u32,
        wind: i32,
        shooter: CombatantId,
        ballistics: Ballistics,
    ) -> Self {
        let radians = (angle_degrees as f32).to_radians();
        let speed = power as f32 / ballistics.power_divisor;
        let wind = wind as f32;
        Self {
            x: origin.x(),
            y: origin.y(),
            vx: radians.cos() * speed + wind / ballistics.wind_to_velocity_divisor,
            vy: -radians.sin() * speed,
            drift: wind / ballistics.wind_drift_divisor,
            trail: VecDeque::with_capacity(ballistics.trail_length),
            shooter,
            armed: false,
            ballistics,
        }
    }

    pub(crate) const fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }

    pub(crate) const fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    pub(crate) const fn shooter(&self) -> CombatantId {
        self.shooter
    }

    pub(crate) fn trail(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.trail.iter().copied()
    }

    /// Integrates one step and tests for termination.
    ///
    /// Terrain hits win over combatant hits, which win over leaving the world.
    pub(crate) fn step<'a, I>(&mut self, terrain: &Terrain, combatants: I) -> StepOutcome
    where
        I: IntoIterator<Item = &'a Combatant>,
    {
        self.trail.push_back(self.position());
        while self.trail.len() > self.ballistics.trail_length {
            let _ = self.trail.pop_front();
        }

        self.x += self.vx;
        self.y += self.vy;
        self.vy += self.ballistics.gravity;
        self.vx += self.drift;

        let position = self.position();
        let (cell_x, cell_y) = position.cell();
        if terrain.is_solid(cell_x, cell_y) {
            return StepOutcome::Impact(position);
        }

        for combatant in combatants {
            if !combatant.is_alive() {
                continue;
            }
            let contact = self.ballistics.radius + combatant.radius();
            let distance = position.distance(combatant.position());
            if combatant.id() == self.shooter && !self.armed {
                if distance >= contact {
                    self.armed = true;
                }
                continue;
            }
            if distance < contact {
                return StepOutcome::Impact(position);
            }
        }

        if self.x < 0.0 || self.x > terrain.width() as f32 || self.y > terrain.height() as f32 {
            return StepOutcome::LeftWorld(position);
        }

        StepOutcome::InFlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artillery_duel_core::Team;

    fn open_sky() -> Terrain {
        Terrain::empty(400, 300)
    }

    fn launch(origin: WorldPoint, power: u32, angle: u32, wind: i32) -> Projectile {
        Projectile::launch(origin, power, angle, wind, CombatantId::new(0), Ballistics::default())
    }

    #[test]
    fn launch_velocity_combines_power_angle_and_wind() {
        let projectile = launch(WorldPoint::new(0.0, 0.0), 50, 90, 10);
        let (vx, vy) = projectile.velocity();
        assert!((vx - 0.5).abs() < 1e-5, "vx = {vx}");
        assert!((vy + 5.0).abs() < 1e-5, "vy = {vy}");

        let flat = launch(WorldPoint::new(0.0, 0.0), 80, 0, 0);
        assert_eq!(flat.velocity(), (8.0, -0.0));
    }

    #[test]
    fn vertical_velocity_grows_by_gravity_every_step() {
        let terrain = open_sky();
        let mut projectile = launch(WorldPoint::new(200.0, 150.0), 60, 70, 0);
        for _ in 0..40 {
            let (_, before) = projectile.velocity();
            let outcome = projectile.step(&terrain, []);
            let (_, after) = projectile.velocity();
            assert_eq!(after, before + Ballistics::default().gravity);
            assert!(after > before);
            if outcome != StepOutcome::InFlight {
                break;
            }
        }
    }

    #[test]
    fn wind_pushes_every_step() {
        let terrain = open_sky();
        let mut projectile = launch(WorldPoint::new(200.0, 150.0), 50, 90, 10);
        let (start_vx, _) = projectile.velocity();
        for _ in 0..5 {
            let _ = projectile.step(&terrain, []);
        }
        let (vx, _) = projectile.velocity();
        assert!((vx - (start_vx + 5.0 * 0.1)).abs() < 1e-5, "vx = {vx}");
    }

    #[test]
    fn trail_keeps_only_the_most_recent_positions() {
        let terrain = open_sky();
        let mut projectile = launch(WorldPoint::new(200.0, 150.0), 40, 80, 0);
        let mut expected = Vec::new();
        for _ in 0..25 {
            expected.push(projectile.position());
            let _ = projectile.step(&terrain, []);
        }
        let trail: Vec<_> = projectile.trail().collect();
        assert_eq!(trail.len(), Ballistics::default().trail_length);
        assert_eq!(trail.as_slice(), &expected[expected.len() - trail.len()..]);
    }

    #[test]
    fn terrain_hit_explodes_at_the_floored_cell() {
        let terrain = Terrain::from_surface(400, 300, |_| 200);
        let mut projectile = launch(WorldPoint::new(100.0, 190.0), 30, 0, 0);
        let mut outcome = StepOutcome::InFlight;
        for _ in 0..200 {
            outcome = projectile.step(&terrain, []);
            if outcome != StepOutcome::InFlight {
                break;
            }
        }
        match outcome {
            StepOutcome::Impact(point) => assert!(point.y() >= 200.0),
            other => panic!("expected terrain impact, got {other:?}"),
        }
    }

    #[test]
    fn leaving_the_side_edge_deactivates_without_impact() {
        let terrain = open_sky();
        let mut projectile = launch(WorldPoint::new(20.0, 100.0), 100, 180, 0);
        let outcome = loop {
            let outcome = projectile.step(&terrain, []);
            if outcome != StepOutcome::InFlight {
                break outcome;
            }
        };
        match outcome {
            StepOutcome::LeftWorld(point) => assert!(point.x() < 0.0),
            other => panic!("expected to leave the world, got {other:?}"),
        }
    }

    #[test]
    fn flying_above_the_top_edge_is_allowed() {
        let terrain = open_sky();
        let mut projectile = launch(WorldPoint::new(200.0, 5.0), 100, 90, 0);
        assert_eq!(projectile.step(&terrain, []), StepOutcome::InFlight);
        assert!(projectile.position().y() < 0.0);
    }

    #[test]
    fn shooter_is_ignored_until_the_projectile_clears_it() {
        let terrain = open_sky();
        let mut shooter = Combatant::new(CombatantId::new(0), Team::Red, 100.0, 8.0);
        shooter.rest_on_terrain(&Terrain::from_surface(400, 300, |_| 208));
        let mut projectile = launch(shooter.position(), 100, 90, 0);

        let outcome = projectile.step(&terrain, [&shooter]);
        assert_eq!(outcome, StepOutcome::InFlight, "launch must not self-detonate");

        let mut outcome = StepOutcome::InFlight;
        for _ in 0..400 {
            outcome = projectile.step(&terrain, [&shooter]);
            if outcome != StepOutcome::InFlight {
                break;
            }
        }
        assert!(
            matches!(outcome, StepOutcome::Impact(point) if point.distance(shooter.position()) < 12.0),
            "a vertical shot must come back down onto its shooter, got {outcome:?}"
        );
    }

    #[test]
    fn living_combatants_of_any_team_stop_the_projectile() {
        let terrain = open_sky();
        let mut target = Combatant::new(CombatantId::new(7), Team::Red, 130.0, 8.0);
        target.rest_on_terrain(&Terrain::from_surface(400, 300, |_| 108));
        let mut projectile = launch(WorldPoint::new(100.0, 100.0), 50, 0, 0);

        let outcome = loop {
            let outcome = projectile.step(&terrain, [&target]);
            if outcome != StepOutcome::InFlight {
                break outcome;
            }
        };
        assert!(matches!(outcome, StepOutcome::Impact(point) if point.distance(target.position()) < 12.0));

        let _ = target.apply_damage(500);
        let mut projectile = launch(WorldPoint::new(100.0, 100.0), 50, 0, 0);
        for _ in 0..10 {
            assert_eq!(projectile.step(&terrain, [&target]), StepOutcome::InFlight);
        }
    }
}
