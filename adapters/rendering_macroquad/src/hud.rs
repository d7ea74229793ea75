//! Text overlay for the Macroquad rendering backend.
//!
//! All calls into `macroquad::text` live here.

use artillery_duel_core::Team;
use artillery_duel_rendering::{team_color, Color, HudPresentation};
use macroquad::text::{draw_text, measure_text};

use super::{to_macroquad_color, SceneMetrics};

/// Height of the band reserved above the battlefield for the overlay.
pub(crate) const HUD_HEIGHT: f32 = 60.0;

const FONT_SIZE: f32 = 24.0;
const BANNER_FONT_SIZE: f32 = 40.0;
const PANEL: Color = Color::from_rgb_u8(0x1e, 0x1e, 0x2e);
const TEXT: Color = Color::from_rgb_u8(0xee, 0xee, 0xee);

pub(crate) fn draw_hud(hud: &HudPresentation, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        metrics.screen_width,
        HUD_HEIGHT,
        to_macroquad_color(PANEL),
    );

    let baseline = HUD_HEIGHT * 0.5 + FONT_SIZE * 0.35;
    let _ = draw_text(
        &format!("Red {}", hud.red_total),
        16.0,
        baseline,
        FONT_SIZE,
        to_macroquad_color(team_color(Team::Red)),
    );
    let blue = format!("Blue {}", hud.blue_total);
    let blue_width = measure_text(&blue, None, FONT_SIZE as u16, 1.0).width;
    let _ = draw_text(
        &blue,
        metrics.screen_width - blue_width - 16.0,
        baseline,
        FONT_SIZE,
        to_macroquad_color(team_color(Team::Blue)),
    );

    let status = status_line(hud);
    let status_width = measure_text(&status, None, FONT_SIZE as u16, 1.0).width;
    let status_color = hud.current_team.map_or(TEXT, team_color);
    let _ = draw_text(
        &status,
        (metrics.screen_width - status_width) * 0.5,
        baseline,
        FONT_SIZE,
        to_macroquad_color(status_color),
    );

    if let Some(banner) = banner(hud) {
        let width = measure_text(&banner, None, BANNER_FONT_SIZE as u16, 1.0).width;
        let color = hud.winner.map_or(TEXT, team_color);
        let _ = draw_text(
            &banner,
            (metrics.screen_width - width) * 0.5,
            metrics.offset_y + metrics.world_height * metrics.scale * 0.4,
            BANNER_FONT_SIZE,
            to_macroquad_color(color),
        );
    }
}

fn status_line(hud: &HudPresentation) -> String {
    let turn = match hud.current_team {
        Some(team) => format!("{}'s turn {}", team_name(team), hud.turn),
        None => String::from("No match"),
    };
    format!(
        "{turn} | {} | Power {} | Angle {}",
        wind_label(hud.wind),
        hud.power,
        hud.angle
    )
}

fn wind_label(wind: i32) -> String {
    match wind.signum() {
        1 => format!("Wind {wind} >>"),
        -1 => format!("<< Wind {}", wind.unsigned_abs()),
        _ => String::from("Wind calm"),
    }
}

fn banner(hud: &HudPresentation) -> Option<String> {
    if let Some(winner) = hud.winner {
        return Some(format!("{} Team Wins! Press R to play again", team_name(winner)));
    }
    if hud.awaiting_start {
        return Some(String::from("Press Enter to start"));
    }
    None
}

const fn team_name(team: Team) -> &'static str {
    match team {
        Team::Red => "Red",
        Team::Blue => "Blue",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_label_points_downwind() {
        assert_eq!(wind_label(7), "Wind 7 >>");
        assert_eq!(wind_label(-3), "<< Wind 3");
        assert_eq!(wind_label(0), "Wind calm");
    }

    #[test]
    fn status_line_names_the_acting_team() {
        let hud = HudPresentation {
            current_team: Some(Team::Blue),
            wind: 2,
            turn: 4,
            power: 60,
            angle: 35,
            ..HudPresentation::default()
        };

        assert_eq!(
            status_line(&hud),
            "Blue's turn 4 | Wind 2 >> | Power 60 | Angle 35"
        );
    }

    #[test]
    fn banner_prefers_the_winner() {
        let mut hud = HudPresentation {
            awaiting_start: true,
            ..HudPresentation::default()
        };
        assert_eq!(banner(&hud).as_deref(), Some("Press Enter to start"));

        hud.winner = Some(Team::Red);
        assert_eq!(
            banner(&hud).as_deref(),
            Some("Red Team Wins! Press R to play again")
        );

        hud = HudPresentation::default();
        assert_eq!(banner(&hud), None);
    }
}
