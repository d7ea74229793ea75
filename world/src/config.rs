//! Tunable parameters for a match.

use std::time::Duration;

use artillery_duel_core::{
    SliderRange, Team, ANGLE_RANGE, BLAST_RADIUS, COMBATANT_RADIUS, GRAVITY, MAX_BLAST_DAMAGE,
    POWER_DIVISOR, POWER_RANGE, PROJECTILE_RADIUS, SETTLE_DELAY, TRAIL_LENGTH,
    WIND_DRIFT_DIVISOR, WIND_LIMIT, WIND_TO_VELOCITY_DIVISOR, WORLD_HEIGHT, WORLD_WIDTH,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SEED: u64 = 0x5eed_a271_11e7_d0e1;
/// Largest terrain grid a match may allocate.
const MAX_CELLS: u64 = 1 << 24;
/// Largest slider angle that still mirrors onto a valid launch angle.
const MAX_ANGLE: u32 = 180;

/// Complete description of the rules a match is played under.
///
/// Every field has a default, so partial TOML documents only need to name
/// the values they override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Seed for the wind generator.
    pub seed: u64,
    /// Width of the battlefield in terrain cells.
    pub width: u32,
    /// Height of the battlefield in terrain cells.
    pub height: u32,
    /// Shape of the generated terrain.
    pub terrain: TerrainProfile,
    /// Projectile flight parameters.
    pub ballistics: Ballistics,
    /// Explosion parameters.
    pub blast: BlastConfig,
    /// Starting positions of both teams.
    pub roster: RosterLayout,
    /// Contact radius of every combatant.
    pub combatant_radius: f32,
    /// Largest wind magnitude rolled each turn.
    pub wind_limit: i32,
    /// Pause between a resolved shot and the next turn, in milliseconds.
    pub settle_delay_ms: u64,
    /// Bounds applied to incoming power values.
    pub power_range: SliderRange,
    /// Bounds applied to incoming angle values.
    pub angle_range: SliderRange,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            terrain: TerrainProfile::default(),
            ballistics: Ballistics::default(),
            blast: BlastConfig::default(),
            roster: RosterLayout::default(),
            combatant_radius: COMBATANT_RADIUS,
            wind_limit: WIND_LIMIT,
            settle_delay_ms: u64::try_from(SETTLE_DELAY.as_millis()).unwrap_or(u64::MAX),
            power_range: POWER_RANGE,
            angle_range: ANGLE_RANGE,
        }
    }
}

impl MatchConfig {
    /// Pause between a resolved shot and the next turn.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Returns a copy of the configuration using the provided wind seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that the configuration describes a playable match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyWorld {
                width: self.width,
                height: self.height,
            });
        }
        if u64::from(self.width) * u64::from(self.height) > MAX_CELLS {
            return Err(ConfigError::WorldTooLarge {
                width: self.width,
                height: self.height,
            });
        }

        positive("combatant_radius", self.combatant_radius)?;
        positive("ballistics.radius", self.ballistics.radius)?;
        positive("ballistics.power_divisor", self.ballistics.power_divisor)?;
        positive(
            "ballistics.wind_to_velocity_divisor",
            self.ballistics.wind_to_velocity_divisor,
        )?;
        positive(
            "ballistics.wind_drift_divisor",
            self.ballistics.wind_drift_divisor,
        )?;
        positive("terrain.primary_period", self.terrain.primary_period)?;
        positive("terrain.secondary_period", self.terrain.secondary_period)?;
        positive("blast.radius", self.blast.radius)?;
        positive("ballistics.gravity", self.ballistics.gravity)?;

        for (field, range) in [
            ("power_range", self.power_range),
            ("angle_range", self.angle_range),
        ] {
            if range.min() > range.max() {
                return Err(ConfigError::InvertedRange { field });
            }
        }
        if self.angle_range.max() > MAX_ANGLE {
            return Err(ConfigError::AngleOutOfRange(self.angle_range.max()));
        }

        if self.ballistics.trail_length == 0 {
            return Err(ConfigError::EmptyTrail);
        }

        if self.wind_limit < 0 {
            return Err(ConfigError::NegativeWindLimit(self.wind_limit));
        }

        for (team, offsets) in [(Team::Red, &self.roster.red), (Team::Blue, &self.roster.blue)] {
            if offsets.is_empty() {
                return Err(ConfigError::EmptyRoster { team });
            }
        }
        for offset in self.roster.red.iter().chain(self.roster.blue.iter()) {
            if !offset.is_finite() || *offset < 0.0 || *offset >= self.width as f32 {
                return Err(ConfigError::PlacementOutOfBounds {
                    offset: *offset,
                    width: self.width,
                });
            }
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Parameters of the sine-sum terrain height profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainProfile {
    /// Distance between the world floor and the mean surface height.
    pub base_offset: f32,
    /// Amplitude of the long-period hills.
    pub primary_amplitude: f32,
    /// Period divisor of the long-period hills.
    pub primary_period: f32,
    /// Amplitude of the short-period ripples.
    pub secondary_amplitude: f32,
    /// Period divisor of the short-period ripples.
    pub secondary_period: f32,
}

impl Default for TerrainProfile {
    fn default() -> Self {
        Self {
            base_offset: 100.0,
            primary_amplitude: 50.0,
            primary_period: 50.0,
            secondary_amplitude: 30.0,
            secondary_period: 30.0,
        }
    }
}

impl TerrainProfile {
    /// Profile producing perfectly level ground `base_offset` cells above the floor.
    #[must_use]
    pub fn flat(base_offset: f32) -> Self {
        Self {
            base_offset,
            primary_amplitude: 0.0,
            secondary_amplitude: 0.0,
            ..Self::default()
        }
    }
}

/// Projectile flight parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Ballistics {
    /// Added to the vertical velocity after every step.
    pub gravity: f32,
    /// Divides the power to obtain the launch speed.
    pub power_divisor: f32,
    /// Divides the wind to obtain its launch velocity contribution.
    pub wind_to_velocity_divisor: f32,
    /// Divides the wind to obtain the per-step lateral drift.
    pub wind_drift_divisor: f32,
    /// Contact radius of the projectile.
    pub radius: f32,
    /// Number of recent positions kept in the trail.
    pub trail_length: usize,
}

impl Default for Ballistics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            power_divisor: POWER_DIVISOR,
            wind_to_velocity_divisor: WIND_TO_VELOCITY_DIVISOR,
            wind_drift_divisor: WIND_DRIFT_DIVISOR,
            radius: PROJECTILE_RADIUS,
            trail_length: TRAIL_LENGTH,
        }
    }
}

/// Explosion parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlastConfig {
    /// Radius of terrain destruction and damage.
    pub radius: f32,
    /// Damage dealt at the epicentre.
    pub max_damage: u32,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            radius: BLAST_RADIUS,
            max_damage: MAX_BLAST_DAMAGE,
        }
    }
}

/// Starting positions of both rosters.
///
/// Offsets are measured from each team's home edge: the red team counts from
/// the left edge of the world and the blue team from the right edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterLayout {
    /// Offsets of the red combatants from the left edge.
    pub red: Vec<f32>,
    /// Offsets of the blue combatants from the right edge.
    pub blue: Vec<f32>,
}

impl Default for RosterLayout {
    fn default() -> Self {
        Self {
            red: vec![150.0, 200.0],
            blue: vec![150.0, 200.0],
        }
    }
}

/// Reasons a [`MatchConfig`] may be rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The world has no cells.
    #[error("world dimensions must be positive (received {width}x{height})")]
    EmptyWorld {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// A parameter that must be strictly positive and finite was not.
    #[error("{field} must be a positive finite number (received {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// The terrain grid would hold more cells than a match may allocate.
    #[error("world {width}x{height} exceeds the largest supported battlefield")]
    WorldTooLarge {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// A slider range lists its bounds in the wrong order.
    #[error("{field} must list its minimum before its maximum")]
    InvertedRange {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Angles past the horizon cannot be mirrored for the blue team.
    #[error("angle_range must not exceed 180 degrees (received {0})")]
    AngleOutOfRange(u32),
    /// Projectiles must remember at least one trail point.
    #[error("ballistics.trail_length must be at least 1")]
    EmptyTrail,
    /// The wind limit is a magnitude.
    #[error("wind_limit must not be negative (received {0})")]
    NegativeWindLimit(i32),
    /// A team has nobody to fight with.
    #[error("the {team:?} roster must place at least one combatant")]
    EmptyRoster {
        /// Team without combatants.
        team: Team,
    },
    /// A combatant would be placed outside the world.
    #[error("roster offset {offset} lies outside a world {width} cells wide")]
    PlacementOutOfBounds {
        /// Offending offset.
        offset: f32,
        /// Configured width.
        width: u32,
    },
    /// A custom terrain does not match the configured dimensions.
    #[error("terrain is {actual_width}x{actual_height} but the match expects {width}x{height}")]
    TerrainMismatch {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
        /// Width of the supplied terrain.
        actual_width: u32,
        /// Height of the supplied terrain.
        actual_height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(MatchConfig::default().validate(), Ok(()));
        assert_eq!(MatchConfig::default().settle_delay(), SETTLE_DELAY);
    }

    #[test]
    fn rejects_zero_sized_world() {
        let config = MatchConfig {
            width: 0,
            ..MatchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyWorld {
                width: 0,
                height: WORLD_HEIGHT
            })
        );
    }

    #[test]
    fn rejects_placements_beyond_the_world() {
        let mut config = MatchConfig::default();
        config.roster.blue.push(900.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PlacementOutOfBounds { .. })
        ));
    }

    #[test]
    fn rejects_zero_power_divisor() {
        let mut config = MatchConfig::default();
        config.ballistics.power_divisor = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "ballistics.power_divisor",
                value: 0.0,
            })
        );
    }

    #[test]
    fn rejects_non_positive_gravity() {
        let mut config = MatchConfig::default();
        config.ballistics.gravity = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "ballistics.gravity",
                value: 0.0,
            })
        );

        config.ballistics.gravity = -0.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "ballistics.gravity",
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty_rosters() {
        let mut config = MatchConfig::default();
        config.roster.blue.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyRoster { team: Team::Blue })
        );

        config.roster.red.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyRoster { team: Team::Red })
        );
    }

    #[test]
    fn rejects_angles_past_the_horizon() {
        let config = MatchConfig {
            angle_range: SliderRange::new(0, 181),
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::AngleOutOfRange(181)));

        let config = MatchConfig {
            angle_range: SliderRange::new(0, 180),
            ..MatchConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_oversized_worlds_before_allocating() {
        let config = MatchConfig {
            width: u32::MAX,
            height: u32::MAX,
            ..MatchConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::WorldTooLarge {
                width: u32::MAX,
                height: u32::MAX,
            })
        );
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: MatchConfig = toml::from_str(
            r#"
            seed = 7
            wind_limit = 0

            [blast]
            radius = 25.0
            "#,
        )
        .expect("config parses");

        assert_eq!(config.seed, 7);
        assert_eq!(config.wind_limit, 0);
        assert_eq!(config.blast.radius, 25.0);
        assert_eq!(config.blast.max_damage, MAX_BLAST_DAMAGE);
        assert_eq!(config.terrain, TerrainProfile::default());
    }

    #[test]
    fn inverted_slider_ranges_are_rejected() {
        let config: MatchConfig = toml::from_str(
            r#"
            [angle_range]
            min = 80
            max = 10
            "#,
        )
        .expect("config parses");

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                field: "angle_range"
            })
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = toml::from_str::<MatchConfig>("gravitee = 3.0");
        assert!(parsed.is_err());
    }
}
