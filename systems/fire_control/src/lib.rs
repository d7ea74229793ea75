#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns aiming input into firing commands.

use artillery_duel_core::{Command, MatchPhase, SliderRange, ANGLE_RANGE, POWER_RANGE};
use log::debug;

/// Aiming input gathered by an adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AimInput {
    /// Signed change applied to the power slider.
    pub power_delta: i32,
    /// Signed change applied to the angle slider.
    pub angle_delta: i32,
    /// Whether the trigger was pressed this frame.
    pub fire: bool,
}

/// Slider state of the active player and the trigger that fires it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FireControl {
    power_range: SliderRange,
    angle_range: SliderRange,
    power: u32,
    angle: u32,
}

impl Default for FireControl {
    fn default() -> Self {
        Self::new(POWER_RANGE, ANGLE_RANGE)
    }
}

impl FireControl {
    /// Creates fire control with both sliders centred in their ranges.
    #[must_use]
    pub const fn new(power_range: SliderRange, angle_range: SliderRange) -> Self {
        Self {
            power_range,
            angle_range,
            power: power_range.midpoint(),
            angle: angle_range.midpoint(),
        }
    }

    /// Current power slider value.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.power
    }

    /// Current angle slider value, measured from the horizon toward the enemy.
    #[must_use]
    pub const fn angle(&self) -> u32 {
        self.angle
    }

    /// Bounds of the power slider.
    #[must_use]
    pub const fn power_range(&self) -> SliderRange {
        self.power_range
    }

    /// Bounds of the angle slider.
    #[must_use]
    pub const fn angle_range(&self) -> SliderRange {
        self.angle_range
    }

    /// Nudges the power slider, staying within its bounds.
    pub fn adjust_power(&mut self, delta: i32) {
        self.power = nudge(self.power, delta, self.power_range);
    }

    /// Nudges the angle slider, staying within its bounds.
    pub fn adjust_angle(&mut self, delta: i32) {
        self.angle = nudge(self.angle, delta, self.angle_range);
    }

    /// Applies the frame's aiming input and queues a shot when one is allowed.
    ///
    /// Sliders move in every phase; the trigger only produces a
    /// `Command::Fire` while the match awaits a shot.
    pub fn handle(&mut self, phase: MatchPhase, input: AimInput, out: &mut Vec<Command>) {
        if input.power_delta != 0 {
            self.adjust_power(input.power_delta);
        }
        if input.angle_delta != 0 {
            self.adjust_angle(input.angle_delta);
        }

        if !input.fire {
            return;
        }

        if let MatchPhase::AwaitingFire { team } = phase {
            debug!("{team:?} pulls the trigger at power {} angle {}", self.power, self.angle);
            out.push(Command::Fire {
                power: self.power,
                angle: self.angle,
            });
        }
    }
}

fn nudge(value: u32, delta: i32, range: SliderRange) -> u32 {
    let moved = i64::from(value) + i64::from(delta);
    let clamped = moved.clamp(i64::from(range.min()), i64::from(range.max()));
    u32::try_from(clamped).unwrap_or(range.max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use artillery_duel_core::Team;
    use std::time::Duration;

    fn pressed() -> AimInput {
        AimInput {
            fire: true,
            ..AimInput::default()
        }
    }

    #[test]
    fn sliders_start_centred() {
        let control = FireControl::default();
        assert_eq!(control.power(), 55);
        assert_eq!(control.angle(), 45);
    }

    #[test]
    fn adjustments_clamp_to_bounds() {
        let mut control = FireControl::default();
        control.adjust_power(1_000);
        control.adjust_angle(-1_000);
        assert_eq!(control.power(), 100);
        assert_eq!(control.angle(), 0);

        control.adjust_power(i32::MIN);
        control.adjust_angle(i32::MAX);
        assert_eq!(control.power(), 10);
        assert_eq!(control.angle(), 90);
    }

    #[test]
    fn trigger_fires_only_while_awaiting_fire() {
        let mut control = FireControl::default();
        let mut out = Vec::new();

        for phase in [
            MatchPhase::Idle,
            MatchPhase::Resolving { team: Team::Red },
            MatchPhase::RoundEnd {
                next: Team::Blue,
                elapsed: Duration::ZERO,
            },
            MatchPhase::Finished { winner: Team::Red },
        ] {
            control.handle(phase, pressed(), &mut out);
        }
        assert!(out.is_empty());

        control.handle(MatchPhase::AwaitingFire { team: Team::Blue }, pressed(), &mut out);
        assert_eq!(out, vec![Command::Fire { power: 55, angle: 45 }]);
    }

    #[test]
    fn aiming_applies_before_the_shot() {
        let mut control = FireControl::default();
        let mut out = Vec::new();
        let input = AimInput {
            power_delta: 20,
            angle_delta: -15,
            fire: true,
        };

        control.handle(MatchPhase::AwaitingFire { team: Team::Red }, input, &mut out);

        assert_eq!(out, vec![Command::Fire { power: 75, angle: 30 }]);
    }

    #[test]
    fn aiming_without_trigger_is_silent() {
        let mut control = FireControl::default();
        let mut out = Vec::new();
        let input = AimInput {
            power_delta: -5,
            ..AimInput::default()
        };

        control.handle(MatchPhase::AwaitingFire { team: Team::Red }, input, &mut out);

        assert!(out.is_empty());
        assert_eq!(control.power(), 50);
    }
}
