#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Artillery Duel adapters.

pub mod visuals;

use anyhow::Result as AnyResult;
use artillery_duel_core::{CombatantId, Health, Team};
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;

use crate::visuals::ParticlePresentation;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Body color used for the team's combatants and HUD labels.
#[must_use]
pub const fn team_color(team: Team) -> Color {
    match team {
        Team::Red => Color::from_rgb_u8(0xff, 0x6b, 0x6b),
        Team::Blue => Color::from_rgb_u8(0x4d, 0xab, 0xf7),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Signed change requested for the power slider.
    pub power_delta: i32,
    /// Signed change requested for the angle slider.
    pub angle_delta: i32,
    /// Whether the fire trigger was pressed on this frame.
    pub fire: bool,
    /// Whether a match start was requested on this frame.
    pub start: bool,
    /// Whether a restart was requested on this frame.
    pub restart: bool,
    /// Whether the player asked to leave the game loop.
    pub quit: bool,
}

/// Solid/empty bitmap of the battlefield, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainPresentation {
    width: u32,
    height: u32,
    revision: u64,
    solid: Vec<bool>,
}

impl TerrainPresentation {
    /// Creates a bitmap from row-major solidity flags.
    pub fn new(
        width: u32,
        height: u32,
        revision: u64,
        solid: Vec<bool>,
    ) -> Result<Self, RenderingError> {
        let expected = usize::try_from(u64::from(width) * u64::from(height))
            .map_err(|_| RenderingError::BattlefieldTooLarge { width, height })?;
        if solid.len() != expected {
            return Err(RenderingError::TerrainSizeMismatch {
                expected,
                actual: solid.len(),
            });
        }
        Ok(Self {
            width,
            height,
            revision,
            solid,
        })
    }

    /// Samples `is_solid` for every cell of a `width` by `height` grid.
    #[must_use]
    pub fn from_fn<F>(width: u32, height: u32, revision: u64, mut is_solid: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut solid = Vec::with_capacity(
            usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0),
        );
        for y in 0..height {
            for x in 0..width {
                solid.push(is_solid(x, y));
            }
        }
        Self {
            width,
            height,
            revision,
            solid,
        }
    }

    /// Number of columns in the bitmap.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the bitmap.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Revision of the world terrain this bitmap was sampled from.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Reports whether the cell is solid; cells outside the bitmap are empty.
    #[must_use]
    pub fn is_solid(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = u64::from(y) * u64::from(self.width) + u64::from(x);
        usize::try_from(index)
            .ok()
            .and_then(|index| self.solid.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether the cell is solid and exposed to the sky within `depth` rows.
    #[must_use]
    pub fn is_topsoil(&self, x: u32, y: u32, depth: u32) -> bool {
        if !self.is_solid(x, y) {
            return false;
        }
        (1..=depth).any(|offset| y < offset || !self.is_solid(x, y - offset))
    }
}

/// Color band of a health bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealthBand {
    /// More than half of the maximum health remains.
    Healthy,
    /// More than a quarter remains.
    Wounded,
    /// A quarter or less remains.
    Critical,
}

impl HealthBand {
    /// Classifies the provided health.
    #[must_use]
    pub const fn from_health(health: Health) -> Self {
        let value = health.get();
        if value > 50 {
            Self::Healthy
        } else if value > 25 {
            Self::Wounded
        } else {
            Self::Critical
        }
    }

    /// Fill color used for bars in this band.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Healthy => Color::from_rgb_u8(0x4c, 0xaf, 0x50),
            Self::Wounded => Color::from_rgb_u8(0xff, 0xc1, 0x07),
            Self::Critical => Color::from_rgb_u8(0xf4, 0x43, 0x36),
        }
    }
}

/// Immutable snapshot describing a combatant placed within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatantPresentation {
    /// Identifier allocated to the combatant by the world.
    pub id: CombatantId,
    /// Team the combatant fights for.
    pub team: Team,
    /// Centre of the combatant in world units.
    pub position: Vec2,
    /// Radius of the combatant's body in world units.
    pub radius: f32,
    /// Remaining health.
    pub health: Health,
    /// Whether the combatant should be drawn at all.
    pub alive: bool,
}

impl CombatantPresentation {
    /// Band used to color the combatant's health bar.
    #[must_use]
    pub const fn health_band(&self) -> HealthBand {
        HealthBand::from_health(self.health)
    }
}

/// Projectile in flight together with its recent trail.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre of the projectile in world units.
    pub position: Vec2,
    /// Radius of the projectile in world units.
    pub radius: f32,
    /// Recent positions, oldest first.
    pub trail: Vec<Vec2>,
}

/// Text and gauges drawn on top of the battlefield.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
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
    /// Current turn number.
    pub turn: u32,
    /// Current power slider value.
    pub power: u32,
    /// Current angle slider value.
    pub angle: u32,
    /// Whether the world is waiting for a match to be started.
    pub awaiting_start: bool,
}

/// Scene description combining the terrain, the combatants and effects.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Destructible ground drawn in front of the sky.
    pub terrain: TerrainPresentation,
    /// Every combatant of both teams.
    pub combatants: Vec<CombatantPresentation>,
    /// Projectile currently in flight, if any.
    pub projectile: Option<ProjectilePresentation>,
    /// Explosion particles still fading out.
    pub particles: Vec<ParticlePresentation>,
    /// Overlay describing the match state.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        terrain: TerrainPresentation,
        combatants: Vec<CombatantPresentation>,
        projectile: Option<ProjectilePresentation>,
        particles: Vec<ParticlePresentation>,
        hud: HudPresentation,
    ) -> Self {
        Self {
            terrain,
            combatants,
            projectile,
            particles,
            hud,
        }
    }

    /// Width of the battlefield in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.terrain.width() as f32
    }

    /// Height of the battlefield in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.terrain.height() as f32
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Artillery Duel scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// The solidity flags do not cover the declared grid.
    #[error("terrain bitmap holds {actual} cells but the grid needs {expected}")]
    TerrainSizeMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells provided.
        actual: usize,
    },
    /// The grid cannot be addressed on this platform.
    #[error("battlefield of {width}x{height} cells is too large to present")]
    BattlefieldTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_bitmap_rejects_mismatched_lengths() {
        let error = TerrainPresentation::new(4, 3, 0, vec![true; 11])
            .expect_err("eleven cells cannot fill a 4x3 grid");

        assert_eq!(
            error,
            RenderingError::TerrainSizeMismatch {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn terrain_bitmap_is_row_major() {
        let bitmap = TerrainPresentation::from_fn(3, 2, 7, |x, y| x == 2 && y == 0);

        assert!(bitmap.is_solid(2, 0));
        assert!(!bitmap.is_solid(0, 2));
        assert!(!bitmap.is_solid(3, 0));
        assert_eq!(bitmap.revision(), 7);
        assert_eq!(
            bitmap,
            TerrainPresentation::new(3, 2, 7, vec![false, false, true, false, false, false])
                .expect("valid bitmap")
        );
    }

    #[test]
    fn topsoil_is_solid_ground_near_the_sky() {
        let bitmap = TerrainPresentation::from_fn(1, 10, 0, |_, y| y >= 4);

        assert!(!bitmap.is_topsoil(0, 3, 3));
        assert!(bitmap.is_topsoil(0, 4, 3));
        assert!(bitmap.is_topsoil(0, 6, 3));
        assert!(!bitmap.is_topsoil(0, 7, 3));
    }

    #[test]
    fn health_bands_follow_thresholds() {
        assert_eq!(HealthBand::from_health(Health::new(100)), HealthBand::Healthy);
        assert_eq!(HealthBand::from_health(Health::new(51)), HealthBand::Healthy);
        assert_eq!(HealthBand::from_health(Health::new(50)), HealthBand::Wounded);
        assert_eq!(HealthBand::from_health(Health::new(26)), HealthBand::Wounded);
        assert_eq!(HealthBand::from_health(Health::new(25)), HealthBand::Critical);
        assert_eq!(HealthBand::from_health(Health::ZERO), HealthBand::Critical);
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.4).lighten(0.5);
        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.4));
        assert_eq!(color.with_alpha(2.0).alpha, 1.0);
    }
}
