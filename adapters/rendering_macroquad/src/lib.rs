#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Artillery Duel.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Overlay text lives in the local `hud` module so the rest of the adapter
//! only deals with shapes and the terrain texture.

mod hud;

use anyhow::Result;
use artillery_duel_rendering::{
    team_color, visuals::ParticlePresentation, Color, CombatantPresentation, FrameInput,
    Presentation, ProjectilePresentation, RenderingBackend, Scene, TerrainPresentation,
};
use glam::Vec2;
use macroquad::{
    color::{BLACK, WHITE},
    input::{is_key_down, is_key_pressed, KeyCode},
    texture::{draw_texture_ex, DrawTextureParams, FilterMode, Image, Texture2D},
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use self::hud::{draw_hud, HUD_HEIGHT};

const DIRT: Color = Color::from_rgb_u8(0x65, 0x43, 0x21);
const GRASS: Color = Color::from_rgb_u8(0x7c, 0xb3, 0x42);
const SKY_TOP: Color = Color::from_rgb_u8(0x87, 0xce, 0xeb);
const SKY_MIDDLE: Color = Color::from_rgb_u8(0xe3, 0xf2, 0xfd);
const SKY_BOTTOM: Color = Color::from_rgb_u8(0x8b, 0xc3, 0x4a);
const SKY_BANDS: u32 = 48;
const GRASS_DEPTH: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Enter` starts a match.
    start: bool,
    /// `R` restarts the match.
    restart: bool,
    /// `Space` fires.
    fire: bool,
    /// `Right` and `Left` raise and lower power while held.
    power_up: bool,
    power_down: bool,
    /// `Up` and `Down` raise and lower the angle while held.
    angle_up: bool,
    angle_down: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            start: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
            restart: is_key_pressed(KeyCode::R),
            fire: is_key_pressed(KeyCode::Space),
            power_up: is_key_down(KeyCode::Right),
            power_down: is_key_down(KeyCode::Left),
            angle_up: is_key_down(KeyCode::Up),
            angle_down: is_key_down(KeyCode::Down),
        }
    }

    fn frame_input(self) -> FrameInput {
        FrameInput {
            power_delta: axis(self.power_up, self.power_down),
            angle_delta: axis(self.angle_up, self.angle_down),
            fire: self.fire,
            start: self.start,
            restart: self.restart,
            quit: self.quit_requested,
        }
    }
}

fn axis(positive: bool, negative: bool) -> i32 {
    i32::from(positive) - i32::from(negative)
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames.max(1),
            avg_render: self.render_accum / frames.max(1),
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

/// Battlefield texture that is re-uploaded whenever the terrain revision changes.
struct TerrainLayer {
    image: Image,
    texture: Texture2D,
    revision: u64,
}

impl TerrainLayer {
    fn new(terrain: &TerrainPresentation) -> Self {
        let width = u16::try_from(terrain.width()).unwrap_or(u16::MAX);
        let height = u16::try_from(terrain.height()).unwrap_or(u16::MAX);
        let mut image = Image::gen_image_color(width, height, macroquad::color::BLANK);
        paint_terrain(&mut image, terrain);
        let texture = Texture2D::from_image(&image);
        texture.set_filter(FilterMode::Nearest);
        Self {
            image,
            texture,
            revision: terrain.revision(),
        }
    }

    fn sync(&mut self, terrain: &TerrainPresentation) {
        if terrain.revision() == self.revision
            && u32::from(self.image.width) == terrain.width()
            && u32::from(self.image.height) == terrain.height()
        {
            return;
        }
        if u32::from(self.image.width) != terrain.width()
            || u32::from(self.image.height) != terrain.height()
        {
            *self = Self::new(terrain);
            return;
        }
        paint_terrain(&mut self.image, terrain);
        self.texture.update(&self.image);
        self.revision = terrain.revision();
    }

    fn draw(&self, metrics: &SceneMetrics) {
        draw_texture_ex(
            self.texture,
            metrics.offset_x,
            metrics.offset_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(macroquad::math::vec2(
                    metrics.world_width * metrics.scale,
                    metrics.world_height * metrics.scale,
                )),
                ..DrawTextureParams::default()
            },
        );
    }
}

fn paint_terrain(image: &mut Image, terrain: &TerrainPresentation) {
    let width = u32::from(image.width).min(terrain.width());
    let height = u32::from(image.height).min(terrain.height());
    for y in 0..height {
        for x in 0..width {
            let color = terrain_pixel(terrain, x, y);
            image.set_pixel(x, y, to_macroquad_color(color));
        }
    }
}

fn terrain_pixel(terrain: &TerrainPresentation, x: u32, y: u32) -> Color {
    if terrain.is_topsoil(x, y, GRASS_DEPTH) {
        GRASS
    } else if terrain.is_solid(x, y) {
        DIRT
    } else {
        Color::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(scene.terrain.width()).unwrap_or(800),
            window_height: i32::try_from(scene.terrain.height())
                .unwrap_or(500)
                .saturating_add(HUD_HEIGHT as i32),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut terrain_layer = TerrainLayer::new(&scene.terrain);
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_start = Instant::now();
                update_scene(frame_dt, keyboard.frame_input(), &mut scene);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                let metrics = SceneMetrics::new(
                    scene.width(),
                    scene.height(),
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                terrain_layer.sync(&scene.terrain);

                draw_sky(&metrics);
                terrain_layer.draw(&metrics);
                draw_combatants(&scene.combatants, &metrics);
                if let Some(projectile) = &scene.projectile {
                    draw_projectile(projectile, &metrics);
                }
                draw_particles(&scene.particles, &metrics);
                draw_hud(&scene.hud, &metrics);
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps world units onto the window below the HUD band.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    world_width: f32,
    world_height: f32,
    screen_width: f32,
}

impl SceneMetrics {
    fn new(world_width: f32, world_height: f32, screen_width: f32, screen_height: f32) -> Self {
        let available_height = (screen_height - HUD_HEIGHT).max(0.0);
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(available_height / world_height)
        };

        let offset_x = ((screen_width - world_width * scale) * 0.5).max(0.0);
        let offset_y = HUD_HEIGHT + ((available_height - world_height * scale) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            world_width,
            world_height,
            screen_width,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }
}

fn draw_sky(metrics: &SceneMetrics) {
    let band_height = metrics.world_height * metrics.scale / SKY_BANDS as f32;
    for band in 0..SKY_BANDS {
        let t = band as f32 / (SKY_BANDS - 1) as f32;
        let color = sky_gradient(t);
        macroquad::shapes::draw_rectangle(
            metrics.offset_x,
            metrics.offset_y + band as f32 * band_height,
            metrics.world_width * metrics.scale,
            band_height + 1.0,
            to_macroquad_color(color),
        );
    }
}

fn sky_gradient(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        mix(SKY_TOP, SKY_MIDDLE, t * 2.0)
    } else {
        mix(SKY_MIDDLE, SKY_BOTTOM, (t - 0.5) * 2.0)
    }
}

fn mix(from: Color, to: Color, t: f32) -> Color {
    let keep = 1.0 - t;
    Color::new(
        from.red * keep + to.red * t,
        from.green * keep + to.green * t,
        from.blue * keep + to.blue * t,
        from.alpha * keep + to.alpha * t,
    )
}

fn draw_combatants(combatants: &[CombatantPresentation], metrics: &SceneMetrics) {
    for combatant in combatants.iter().filter(|combatant| combatant.alive) {
        let center = metrics.to_screen(combatant.position);
        let radius = combatant.radius * metrics.scale;
        let body = team_color(combatant.team);

        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(body));
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            (2.0 * metrics.scale).max(1.0),
            to_macroquad_color(Color::new(body.red * 0.9, body.green * 0.9, body.blue, 1.0)),
        );

        for side in [-1.0, 1.0] {
            let eye = Vec2::new(center.x + side * 3.0 * metrics.scale, center.y - 2.0 * metrics.scale);
            macroquad::shapes::draw_circle(eye.x, eye.y, 2.0 * metrics.scale, WHITE);
            macroquad::shapes::draw_circle(eye.x, eye.y, metrics.scale, BLACK);
        }

        let (left, top, width, height) = health_bar_rect(combatant, metrics);
        macroquad::shapes::draw_rectangle(
            left,
            top,
            width,
            height,
            to_macroquad_color(Color::from_rgb_u8(0x33, 0x33, 0x33)),
        );
        let fill = width * combatant.health.fraction();
        if fill > f32::EPSILON {
            macroquad::shapes::draw_rectangle(
                left,
                top,
                fill,
                height,
                to_macroquad_color(combatant.health_band().color()),
            );
        }
    }
}

fn health_bar_rect(combatant: &CombatantPresentation, metrics: &SceneMetrics) -> (f32, f32, f32, f32) {
    let center = metrics.to_screen(combatant.position);
    let width = 30.0 * metrics.scale;
    let height = 4.0 * metrics.scale;
    let top = center.y - (combatant.radius + 10.0) * metrics.scale;
    (center.x - width * 0.5, top, width, height)
}

fn draw_projectile(projectile: &ProjectilePresentation, metrics: &SceneMetrics) {
    let trail_len = projectile.trail.len();
    for (index, point) in projectile.trail.iter().enumerate() {
        let fade = (index + 1) as f32 / (trail_len + 1) as f32;
        let position = metrics.to_screen(*point);
        let color = Color::from_rgb_u8(0xff, 0xa5, 0x00).with_alpha(fade * 0.6);
        macroquad::shapes::draw_circle(
            position.x,
            position.y,
            projectile.radius * metrics.scale * fade,
            to_macroquad_color(color),
        );
    }

    let position = metrics.to_screen(projectile.position);
    macroquad::shapes::draw_circle(
        position.x,
        position.y,
        projectile.radius * metrics.scale,
        to_macroquad_color(Color::from_rgb_u8(0x33, 0x33, 0x33)),
    );
}

fn draw_particles(particles: &[ParticlePresentation], metrics: &SceneMetrics) {
    for particle in particles {
        let position = metrics.to_screen(particle.position);
        macroquad::shapes::draw_circle(
            position.x,
            position.y,
            particle.size * metrics.scale,
            to_macroquad_color(particle.color),
        );
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
