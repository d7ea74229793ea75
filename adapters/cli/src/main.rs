#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Artillery Duel experience.

mod headless;
mod session;
mod shot_script;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use artillery_duel_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene};
use artillery_duel_rendering_macroquad::MacroquadBackend;
use artillery_duel_system_fire_control::AimInput;
use artillery_duel_world::{MatchConfig, World};
use clap::Parser;
use log::info;

use crate::{
    headless::{format_report, run_headless},
    session::{FrameRequest, Session},
    shot_script::ShotScript,
};

/// Turn-based artillery duel between two teams on destructible terrain.
#[derive(Debug, Parser)]
#[command(name = "artillery-duel", version, long_about = None)]
struct CliArgs {
    /// TOML file overriding the default match rules.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for the wind generator, overriding the configuration file.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Play the scripted shots without opening a window.
    #[arg(long)]
    headless: bool,

    /// Shots to play in headless mode, as POWER:ANGLE pairs separated by commas.
    #[arg(long, value_name = "P:A,...", value_parser = ShotScript::parse, requires = "headless")]
    shots: Option<ShotScript>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, conflicts_with = "no_vsync")]
    vsync: bool,

    /// Render as fast as possible.
    #[arg(long = "no-vsync")]
    no_vsync: bool,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
}

impl CliArgs {
    fn vsync(&self) -> Option<bool> {
        if self.no_vsync {
            Some(false)
        } else if self.vsync {
            Some(true)
        } else {
            None
        }
    }
}

/// Entry point for the Artillery Duel command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let world = World::with_config(config).context("invalid match configuration")?;
    let session = Session::new(world);
    info!(
        "battlefield {}x{}, seed {:#x}",
        session.config().width,
        session.config().height,
        session.config().seed
    );

    if args.headless {
        return play_headless(session, args.shots.unwrap_or_default());
    }
    play_windowed(session, &args)
}

fn load_config(path: Option<&PathBuf>) -> Result<MatchConfig> {
    let Some(path) = path else {
        return Ok(MatchConfig::default());
    };
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse_config(source: &str) -> Result<MatchConfig> {
    let config: MatchConfig = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
}

fn play_headless(mut session: Session, script: ShotScript) -> Result<()> {
    let report = run_headless(&mut session, &script)?;
    info!("played {} scripted shots", report.shots_played);
    println!("{}", format_report(&report));
    Ok(())
}

fn play_windowed(session: Session, args: &CliArgs) -> Result<()> {
    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if let Some(vsync) = args.vsync() {
        backend = backend.with_vsync(vsync);
    }

    let scene = session.scene();
    let presentation = Presentation::new(
        "Artillery Duel",
        Color::from_rgb_u8(0x1e, 0x1e, 0x2e),
        scene,
    );

    let mut session = session;
    backend.run(presentation, move |dt, input, scene: &mut Scene| {
        let _ = session.advance(dt, frame_request(input));
        session.populate_scene(scene);
    })
}

fn frame_request(input: FrameInput) -> FrameRequest {
    FrameRequest {
        start: input.start,
        restart: input.restart,
        aim: AimInput {
            power_delta: input.power_delta,
            angle_delta: input.angle_delta,
            fire: input.fire,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_parse_headless_scripts() {
        let args = CliArgs::try_parse_from([
            "artillery-duel",
            "--headless",
            "--seed",
            "7",
            "--shots",
            "50:45,60:30",
        ])
        .expect("valid arguments");

        assert!(args.headless);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.shots.as_ref().map(|script| script.shots().len()), Some(2));
        assert_eq!(args.vsync(), None);
    }

    #[test]
    fn shots_require_headless_mode() {
        assert!(CliArgs::try_parse_from(["artillery-duel", "--shots", "50:45"]).is_err());
    }

    #[test]
    fn vsync_flags_conflict() {
        assert!(CliArgs::try_parse_from(["artillery-duel", "--vsync", "--no-vsync"]).is_err());
        let args =
            CliArgs::try_parse_from(["artillery-duel", "--no-vsync"]).expect("valid arguments");
        assert_eq!(args.vsync(), Some(false));
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config = parse_config("seed = 99\nwind_limit = 3\n").expect("valid config");

        assert_eq!(config.seed, 99);
        assert_eq!(config.wind_limit, 3);
        assert_eq!(config.width, MatchConfig::default().width);
    }

    #[test]
    fn invalid_config_is_reported() {
        let error = parse_config("width = 0\n").expect_err("empty battlefield");
        assert!(error.to_string().contains("0x500"), "{error}");
    }

    #[test]
    fn frame_input_maps_onto_a_request() {
        let request = frame_request(FrameInput {
            power_delta: -1,
            angle_delta: 1,
            fire: true,
            start: false,
            restart: true,
            quit: false,
        });

        assert!(request.restart);
        assert_eq!(request.aim.power_delta, -1);
        assert!(request.aim.fire);
    }
}
