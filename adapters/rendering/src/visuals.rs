//! Cosmetic explosion particles.
//!
//! Particles never feed back into the simulation; they are seeded separately
//! so replays stay identical whether or not a window is open.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::Color;

/// Particles spawned by a single explosion.
pub const PARTICLES_PER_EXPLOSION: usize = 30;
/// Life lost by every particle on each step.
pub const PARTICLE_DECAY: f32 = 0.02;
/// Downward acceleration applied to particles on each step.
pub const PARTICLE_GRAVITY: f32 = 0.2;

const SPEED_MIN: f32 = 2.0;
const SPEED_MAX: f32 = 7.0;
const SIZE_MIN: f32 = 2.0;
const SIZE_MAX: f32 = 6.0;

const FIRE_COLORS: [Color; 3] = [
    Color::from_rgb_u8(0xff, 0x6b, 0x6b),
    Color::from_rgb_u8(0xff, 0xa5, 0x00),
    Color::from_rgb_u8(0xff, 0xff, 0x00),
];

/// Snapshot of a single particle ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticlePresentation {
    /// Centre of the particle in world units.
    pub position: Vec2,
    /// Radius of the particle in world units.
    pub size: f32,
    /// Fill color; alpha already reflects the remaining life.
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Particle {
    position: Vec2,
    velocity: Vec2,
    size: f32,
    life: f32,
    color: Color,
}

impl Particle {
    fn step(&mut self) {
        self.position += self.velocity;
        self.velocity.y += PARTICLE_GRAVITY;
        self.life -= PARTICLE_DECAY;
    }

    fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Deterministic pool of explosion particles.
#[derive(Clone, Debug)]
pub struct ParticleField {
    rng: ChaCha8Rng,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Creates an empty field whose bursts are drawn from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            particles: Vec::new(),
        }
    }

    /// Number of particles still alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns `true` when no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawns a burst of particles flying out of `center` in random directions.
    pub fn burst(&mut self, center: Vec2) {
        self.particles.reserve(PARTICLES_PER_EXPLOSION);
        for _ in 0..PARTICLES_PER_EXPLOSION {
            let heading = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = self.rng.gen_range(SPEED_MIN..SPEED_MAX);
            let size = self.rng.gen_range(SIZE_MIN..SIZE_MAX);
            let color = FIRE_COLORS[self.rng.gen_range(0..FIRE_COLORS.len())];
            self.particles.push(Particle {
                position: center,
                velocity: Vec2::new(heading.cos(), heading.sin()) * speed,
                size,
                life: 1.0,
                color,
            });
        }
    }

    /// Advances every particle by one step and drops the ones that faded out.
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.step();
        }
        self.particles.retain(|particle| !particle.is_dead());
    }

    /// Removes every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Captures the live particles for presentation.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ParticlePresentation> {
        self.particles
            .iter()
            .map(|particle| ParticlePresentation {
                position: particle.position,
                size: particle.size,
                color: particle.color.with_alpha(particle.life),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_spawns_a_full_set_within_bounds() {
        let mut field = ParticleField::new(3);
        field.burst(Vec2::new(100.0, 50.0));

        assert_eq!(field.len(), PARTICLES_PER_EXPLOSION);
        for particle in &field.particles {
            let speed = particle.velocity.length();
            assert!((SPEED_MIN - 1e-3..SPEED_MAX + 1e-3).contains(&speed), "speed {speed}");
            assert!((SIZE_MIN..SIZE_MAX).contains(&particle.size));
            assert!(FIRE_COLORS.contains(&particle.color));
            assert_eq!(particle.life, 1.0);
        }
    }

    #[test]
    fn particles_fall_and_fade_out() {
        let mut field = ParticleField::new(9);
        field.burst(Vec2::ZERO);
        let before = field.particles[0];

        field.step();
        let after = field.particles[0];
        assert_eq!(after.velocity.y, before.velocity.y + PARTICLE_GRAVITY);
        assert!(after.life < before.life);
        assert!(field.snapshot()[0].color.alpha < 1.0);

        for _ in 0..60 {
            field.step();
        }
        assert!(field.is_empty());
    }

    #[test]
    fn equal_seeds_produce_equal_bursts() {
        let mut first = ParticleField::new(42);
        let mut second = ParticleField::new(42);
        first.burst(Vec2::new(10.0, 10.0));
        second.burst(Vec2::new(10.0, 10.0));

        assert_eq!(first.snapshot(), second.snapshot());
    }
}
