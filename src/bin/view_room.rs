//! Walk around a procedurally textured polygon room under an open sky.
//!
//! ```bash
//! cargo run --release --bin view_room -- --sides 7 --radius 320
//! cargo run --release --bin view_room -- --frames 500 --log-level debug
//! ```
//!
//! Arrows turn and move, Alt + arrows strafe, PageUp / PageDown change the
//! view size, Esc quits.

use std::time::{Duration, Instant};

use clap::Parser;
use glam::{Vec2, Vec3};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use slog::Drain;

use yadoom_raster::{
    config::{RenderConfig, ScreenSize},
    defs::{FRAME_HEIGHT, FRAME_WIDTH, WallActions, tables::radians_to_angle},
    renderer::{
        FrameBuffer, Rgba, Software,
        software::{ViewTables, VisPlane, VisWall, WallTexture},
    },
    world::{Camera, Texture, TextureBank, TextureError, TextureId},
};

const EYE_HEIGHT: f32 = 41.0;
const ROOM_HEIGHT: f32 = 128.0;
const NEAR: f32 = 1.0;
const LIGHT_LEVEL: u32 = 176;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// View size class, 0 (largest) ..= 5
    #[arg(long, default_value_t = 0)]
    size: u8,

    /// Number of walls of the room
    #[arg(long, default_value_t = 6)]
    sides: usize,

    /// Distance from the room centre to each corner
    #[arg(long, default_value_t = 384.0)]
    radius: f32,

    /// Render this many frames without a window, then exit
    #[arg(long, value_name = "N")]
    frames: Option<u32>,

    /// trace, debug, info, warning, error or critical
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: slog::Level,
}

fn parse_level(s: &str) -> Result<slog::Level, String> {
    s.parse().map_err(|()| format!("unknown log level `{s}`"))
}

fn init_logger(level: slog::Level) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().stdout().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    slog::Logger::root(
        slog_async::Async::new(drain)
            .overflow_strategy(slog_async::OverflowStrategy::Block)
            .thread_name("async logger".to_string())
            .build()
            .fuse(),
        slog::o!(),
    )
}

/*──────────────────────────── procedural art ───────────────────────────*/

fn rgb(r: u32, g: u32, b: u32) -> Rgba {
    0xFF00_0000 | (r.min(255) << 16) | (g.min(255) << 8) | b.min(255)
}

fn brick() -> Result<Texture, TextureError> {
    let (w, h) = (64, 64);
    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let row = y / 16;
            let shift = if row % 2 == 0 { 0 } else { 16 };
            let mortar = y % 16 == 0 || (x + shift) % 32 == 0;
            let grain = ((x * 7 + y * 13) % 5) as u32 * 6;
            pixels.push(if mortar {
                rgb(90, 90, 84)
            } else {
                rgb(150 + grain, 64 + grain / 2, 40)
            });
        }
    }
    Texture::new("BRICK", w, h, pixels)
}

fn floor_tiles() -> Result<Texture, TextureError> {
    let (w, h) = (64, 64);
    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let edge = x % 32 == 0 || y % 32 == 0;
            let check = ((x / 32) + (y / 32)) % 2 == 0;
            pixels.push(match (edge, check) {
                (true, _) => rgb(40, 40, 40),
                (false, true) => rgb(120, 110, 96),
                (false, false) => rgb(96, 88, 76),
            });
        }
    }
    Texture::new("FLOOR", w, h, pixels)
}

fn sky() -> Result<Texture, TextureError> {
    let (w, h) = (256, 128);
    let mut pixels = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let t = y as u32 * 255 / h as u32;
            let (fx, fy) = (x as f32, y as f32);
            let cloud = (fx * 0.09).sin() + (fy * 0.21 + fx * 0.03).cos() > 1.3;
            pixels.push(if cloud {
                rgb(220, 220, 230)
            } else {
                rgb(40 + t / 4, 70 + t / 3, 160 + t / 3)
            });
        }
    }
    Texture::new("SKY1", w, h, pixels)
}

/*──────────────────────────── room → walls ─────────────────────────────*/

struct Room {
    corners: Vec<Vec2>,
    wall_tex: TextureId,
    floor_pic: TextureId,
}

impl Room {
    fn new(sides: usize, radius: f32, wall_tex: TextureId, floor_pic: TextureId) -> Self {
        let sides = sides.max(3);
        // counter-clockwise, so the inside is on the left of every edge
        let corners = (0..sides)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / sides as f32;
                Vec2::new(a.cos(), a.sin()) * radius
            })
            .collect();
        Self {
            corners,
            wall_tex,
            floor_pic,
        }
    }

    /// Stand-in for the BSP stage: one [`VisWall`] per visible edge. The room
    /// is convex, so no two walls overlap on screen and any order is
    /// far-to-near.
    fn visible_walls(&self, camera: &Camera, tables: &ViewTables) -> Vec<VisWall> {
        let n = self.corners.len();
        (0..n)
            .filter_map(|i| {
                let right = self.corners[i];
                let left = self.corners[(i + 1) % n];
                self.project(camera, tables, right, left)
            })
            .collect()
    }

    fn project(
        &self,
        camera: &Camera,
        tables: &ViewTables,
        r: Vec2,
        l: Vec2,
    ) -> Option<VisWall> {
        // view space: x = depth, y = lateral (left positive)
        let (vr, vl) = (camera.to_view(r), camera.to_view(l));
        let (cr, cl) = clip_near(vr, vl)?;

        let center_x = tables.center_x as f32;
        let screen_x = |p: Vec2| center_x - p.y / p.x * center_x;
        let (xl, xr) = (screen_x(cl), screen_x(cr));
        if xr <= xl {
            return None;
        }

        let stretch_width = tables.stretch_width_f();
        let (sl, sr) = (stretch_width / cl.x, stretch_width / cr.x);
        let scale_step = (sr - sl) / (xr - xl);

        let left_x = xl.ceil() as i32;
        let right_x = xr.ceil() as i32 - 1;
        if right_x < left_x {
            return None;
        }
        let left_scale = sl + (left_x as f32 - xl) * scale_step;

        // foot of the perpendicular from the eye onto the wall line
        let along = (vl - vr).normalize_or_zero();
        let foot = vr + along * (-vr).dot(along);
        let distance = foot.length().max(NEAR);
        let center_angle = radians_to_angle(foot.y.atan2(foot.x));
        let offset = (foot - vr).dot(along);

        // fake contrast: east-west walls brightest
        let light_mul = 0.85 + 0.15 * (l - r).normalize_or_zero().x.abs();

        let floor = -EYE_HEIGHT;
        let ceiling = ROOM_HEIGHT - EYE_HEIGHT;
        Some(VisWall {
            left_x,
            right_x,
            left_scale,
            scale_step,
            center_angle,
            distance,
            offset,
            actions: WallActions::TOP_TEXTURE
                | WallActions::ADD_FLOOR
                | WallActions::ADD_SKY
                | WallActions::NEW_FLOOR
                | WallActions::NEW_CEILING,
            top: WallTexture {
                texture: self.wall_tex,
                top_height: ceiling,
                bottom_height: floor,
                texture_mid: ceiling,
            },
            floor_height: floor,
            // a solid wall closes the column for everything behind it
            floor_new_height: ceiling,
            ceiling_height: ceiling,
            ceiling_new_height: floor,
            floor_pic: self.floor_pic,
            light_level: LIGHT_LEVEL,
            light_mul,
            ..Default::default()
        })
    }
}

/// Clip a view-space segment to `depth >= NEAR`.
fn clip_near(a: Vec2, b: Vec2) -> Option<(Vec2, Vec2)> {
    match (a.x >= NEAR, b.x >= NEAR) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_in, _) => {
            let t = (NEAR - a.x) / (b.x - a.x);
            let cut = a + (b - a) * t;
            if a_in { Some((a, cut)) } else { Some((cut, b)) }
        }
    }
}

/*──────────────────────────── floor spans ──────────────────────────────*/

/// Minimal span rasterizer for the finished visplanes.
fn draw_plane(
    plane: &VisPlane,
    tables: &ViewTables,
    camera: &Camera,
    bank: &TextureBank,
    fb: &mut FrameBuffer,
) {
    let flat = bank.texture_or_missing(plane.flat);
    let light = tables.light_params(plane.light, true);
    let (fwd, left) = (camera.forward(), camera.left());
    let eye = camera.pos().truncate();
    let (xo, yo) = (
        tables.screen_x_offset as usize,
        tables.screen_y_offset as usize,
    );

    for span in plane.spans(tables.screen_height) {
        let depth = plane.height.abs() * tables.y_slope[span.y as usize];
        for x in span.x_start..=span.x_end {
            let lateral = depth * tables.view_angle_for_x(x).tan();
            let p = eye + fwd * depth + left * lateral;
            let tx = (p.x.floor() as i32).rem_euclid(flat.w as i32) as usize;
            let ty = (p.y.floor() as i32).rem_euclid(flat.h as i32) as usize;

            let mul = light.light_mul_for_dist(depth * tables.dist_scale[x as usize]);
            let c = flat.texel(tx, ty);
            let shade = |shift: u32| ((((c >> shift) & 0xFF) as f32 * mul) as u32) << shift;
            fb.put(
                xo + x as usize,
                yo + span.y as usize,
                0xFF00_0000 | shade(16) | shade(8) | shade(0),
            );
        }
    }
}

/*──────────────────────────────── main ─────────────────────────────────*/

struct Scene {
    renderer: Software,
    bank: TextureBank,
    room: Room,
    sky: TextureId,
    fb: FrameBuffer,
}

impl Scene {
    fn render(&mut self, camera: &Camera) -> anyhow::Result<()> {
        self.fb.clear(0xFF_000000);
        self.renderer.begin_frame(camera, self.sky);
        for wall in self.room.visible_walls(camera, self.renderer.tables()) {
            self.renderer.add_wall(wall)?;
        }
        self.renderer.draw_all_line_segs(&self.bank, &mut self.fb)?;
        for plane in self.renderer.planes().iter() {
            draw_plane(plane, self.renderer.tables(), camera, &self.bank, &mut self.fb);
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let logger = init_logger(opts.log_level);

    let mut bank = TextureBank::default_with_checker();
    let wall_tex = bank.insert("BRICK", brick()?)?;
    let floor_pic = bank.insert("FLOOR", floor_tiles()?)?;
    let sky_tex = bank.insert("SKY1", sky()?)?;

    let config = RenderConfig {
        screen_size: ScreenSize::new(opts.size)?,
        ..Default::default()
    };
    let mut scene = Scene {
        renderer: Software::new(config, logger.new(slog::o!("component" => "renderer")))?,
        bank,
        room: Room::new(opts.sides, opts.radius, wall_tex, floor_pic),
        sky: sky_tex,
        fb: FrameBuffer::default(),
    };
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, EYE_HEIGHT), 0.0);

    if let Some(frames) = opts.frames {
        let t0 = Instant::now();
        for _ in 0..frames {
            scene.render(&camera)?;
            camera.turn(0.02);
        }
        let elapsed = t0.elapsed();
        slog::info!(
            logger,
            "Headless run finished";
            "frames" => frames,
            "avg_ms" => elapsed.as_secs_f64() * 1000.0 / frames.max(1) as f64
        );
        return Ok(());
    }

    let mut win = Window::new(
        "yadoom raster",
        FRAME_WIDTH,
        FRAME_HEIGHT,
        WindowOptions {
            scale: Scale::X4,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(35);

    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let alt = win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt);
        let (mut forward, mut side, mut turn) = (0.0, 0.0, 0.0);
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += 4.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= 4.0;
        }
        match (alt, win.is_key_down(Key::Left), win.is_key_down(Key::Right)) {
            (true, true, false) => side -= 4.0,
            (true, false, true) => side += 4.0,
            (false, true, false) => turn += 0.05,
            (false, false, true) => turn -= 0.05,
            _ => {}
        }
        camera.turn(turn);
        camera.step(forward, side);

        let class = scene.renderer.config().screen_size.class();
        if win.is_key_pressed(Key::PageUp, KeyRepeat::No) && class > 0 {
            scene.renderer.set_screen_size(ScreenSize::new(class - 1)?);
        }
        if win.is_key_pressed(Key::PageDown, KeyRepeat::No) {
            if let Ok(size) = ScreenSize::new(class + 1) {
                scene.renderer.set_screen_size(size);
            }
        }

        let t0 = Instant::now();
        scene.render(&camera)?;
        acc_time += t0.elapsed();
        acc_frames += 1;

        win.update_with_buffer(&scene.fb.pixels, scene.fb.width, scene.fb.height)?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            slog::info!(logger, "Render time"; "avg_ms" => avg_ms, "fps" => 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
