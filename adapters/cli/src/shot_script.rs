use std::num::ParseIntError;

use thiserror::Error;

/// Delimiter separating individual shots.
const SHOT_DELIMITER: char = ',';
/// Delimiter separating the power from the angle of one shot.
const FIELD_DELIMITER: char = ':';

/// Single scripted shot expressed in slider units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedShot {
    /// Power slider value.
    pub power: u32,
    /// Angle slider value.
    pub angle: u32,
}

/// Ordered shots played back by headless sessions, alternating between teams.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ShotScript {
    shots: Vec<ScriptedShot>,
}

impl ShotScript {
    /// Parses a `POWER:ANGLE,POWER:ANGLE` list.
    pub(crate) fn parse(value: &str) -> Result<Self, ShotScriptError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ShotScriptError::Empty);
        }

        let shots = trimmed
            .split(SHOT_DELIMITER)
            .map(|entry| parse_shot(entry.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { shots })
    }

    pub(crate) fn shots(&self) -> &[ScriptedShot] {
        &self.shots
    }
}

fn parse_shot(entry: &str) -> Result<ScriptedShot, ShotScriptError> {
    let (power, angle) = entry
        .split_once(FIELD_DELIMITER)
        .ok_or_else(|| ShotScriptError::MissingAngle(entry.to_owned()))?;
    let power = parse_value(entry, power)?;
    let angle = parse_value(entry, angle)?;
    Ok(ScriptedShot { power, angle })
}

fn parse_value(entry: &str, value: &str) -> Result<u32, ShotScriptError> {
    value
        .trim()
        .parse()
        .map_err(|source| ShotScriptError::InvalidNumber {
            entry: entry.to_owned(),
            source,
        })
}

/// Errors that can occur while parsing a shot script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ShotScriptError {
    /// The script contained no shots.
    #[error("shot script is empty")]
    Empty,
    /// A shot did not separate power and angle with a colon.
    #[error("shot `{0}` must look like POWER:ANGLE")]
    MissingAngle(String),
    /// A power or angle was not a non-negative integer.
    #[error("shot `{entry}` holds an invalid number")]
    InvalidNumber {
        /// Offending shot.
        entry: String,
        /// Underlying parse failure.
        #[source]
        source: ParseIntError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_list_of_shots() {
        let script = ShotScript::parse(" 50:45, 80 : 30 ,10:0").expect("valid script");

        assert_eq!(
            script.shots(),
            &[
                ScriptedShot {
                    power: 50,
                    angle: 45
                },
                ScriptedShot {
                    power: 80,
                    angle: 30
                },
                ScriptedShot {
                    power: 10,
                    angle: 0
                },
            ]
        );
    }

    #[test]
    fn rejects_empty_scripts() {
        assert_eq!(ShotScript::parse("   "), Err(ShotScriptError::Empty));
    }

    #[test]
    fn rejects_shots_without_an_angle() {
        assert_eq!(
            ShotScript::parse("50:45,60"),
            Err(ShotScriptError::MissingAngle(String::from("60")))
        );
    }

    #[test]
    fn rejects_negative_or_garbage_numbers() {
        let error = ShotScript::parse("50:-3").expect_err("negative angle");
        assert!(matches!(
            error,
            ShotScriptError::InvalidNumber { ref entry, .. } if entry == "50:-3"
        ));
        assert!(ShotScript::parse("x:1").is_err());
    }
}
