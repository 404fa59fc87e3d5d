//! Screen-size dependent lookup tables, rebuilt whenever the view size
//! changes and read-only for every frame in between.

use crate::{
    config::ScreenSize,
    defs::{
        FRAME_WIDTH, LIGHT_LEVELS, MAX_SCREEN_HEIGHT, REFERENCE_3D_VIEW_HEIGHT,
        tables::{
            ANG90, ANGLETOFINESHIFT, Angle, FIELDOFVIEW, FINE_TANGENT, FINEANGLES, FRACBITS,
            FRACUNIT, Fixed, angle_to_radians, fixed_div, fixed_mul, fixed_to_float,
            float_to_fixed,
        },
    },
};

const LIGHT_MIN_PERCENT: f32 = 1.0 / 4.0;
const MAX_BRIGHT_RANGE_SCALE: f32 = 2.0;
const LIGHT_COEF_BASE: f32 = 0.75;
const LIGHT_COEF_ADJUST_FACTOR: f32 = 0.50;

/// Horizontal stretch of the 3-D view relative to a 160-wide half screen.
fn compute_stretch(width: u32, height: u32) -> Fixed {
    float_to_fixed(
        (160.0 / width as f32) * (height as f32 / REFERENCE_3D_VIEW_HEIGHT as f32) * 2.2,
    )
}

pub struct ViewTables {
    pub screen_width: u32,
    pub screen_height: u32,
    pub center_x: i32,
    pub center_y: i32,
    /// Where the 3-D view sits inside the physical frame-buffer.
    pub screen_x_offset: u32,
    pub screen_y_offset: u32,

    pub stretch: Fixed,
    pub stretch_width: Fixed,

    /// Screen column for every other fine angle of the front half-turn.
    pub view_angle_to_x: Vec<i32>,
    /// View-relative angle of each column edge, `screen_width + 1` entries.
    pub x_to_view_angle: Vec<Angle>,
    /// Leftmost visible view angle and twice that, for the BSP stage.
    pub clip_angle: Angle,
    pub double_clip_angle: Angle,

    pub y_slope: Vec<f32>,
    pub dist_scale: Vec<f32>,

    pub light_mins: [f32; LIGHT_LEVELS],
    pub light_subs: [f32; LIGHT_LEVELS],
    pub light_coefs: [f32; LIGHT_LEVELS],
}

impl ViewTables {
    pub fn new(size: ScreenSize) -> Self {
        let screen_width = size.width();
        let screen_height = size.height();
        let stretch = compute_stretch(screen_width, screen_height);
        let w = screen_width as i32;
        let center_x = w / 2;

        let view_angle_to_x = build_view_angle_to_x(center_x, w);
        let x_to_view_angle = build_x_to_view_angle(&view_angle_to_x, screen_width);
        let view_angle_to_x = clamp_view_angle_to_x(view_angle_to_x, w);

        let mut tables = Self {
            screen_width,
            screen_height,
            center_x,
            center_y: screen_height as i32 / 2,
            screen_x_offset: (FRAME_WIDTH as u32 - screen_width) / 2,
            screen_y_offset: (MAX_SCREEN_HEIGHT as u32 - screen_height) / 2,
            stretch,
            stretch_width: stretch * center_x,
            clip_angle: x_to_view_angle[0],
            double_clip_angle: x_to_view_angle[0].wrapping_mul(2),
            view_angle_to_x,
            x_to_view_angle,
            y_slope: Vec::with_capacity(screen_height as usize),
            dist_scale: Vec::with_capacity(screen_width as usize),
            light_mins: [0.0; LIGHT_LEVELS],
            light_subs: [0.0; LIGHT_LEVELS],
            light_coefs: [0.0; LIGHT_LEVELS],
        };

        // floor / ceiling perspective divisor per row
        let stretch_width = tables.stretch_width_f();
        for i in 0..screen_height {
            let j = i as f32 - screen_height as f32 * 0.5 + 0.5;
            tables.y_slope.push((stretch_width / j.abs()).min(63.0));
        }

        // perpendicular → true ray distance per column
        for i in 0..screen_width {
            let c = tables.view_angle_for_x(i as i32).cos();
            tables.dist_scale.push(1.0 / c.abs());
        }

        for i in 0..LIGHT_LEVELS {
            let light_level = i as f32 / 255.0;
            tables.light_mins[i] = i as f32 * LIGHT_MIN_PERCENT;
            tables.light_subs[i] = light_level * MAX_BRIGHT_RANGE_SCALE;
            tables.light_coefs[i] = LIGHT_COEF_BASE - light_level * LIGHT_COEF_ADJUST_FACTOR;
        }

        tables
    }

    /// View-relative angle of column `x` in radians, positive to the left.
    #[inline]
    pub fn view_angle_for_x(&self, x: i32) -> f32 {
        angle_to_radians(self.x_to_view_angle[x as usize])
    }

    #[inline]
    pub fn stretch_width_f(&self) -> f32 {
        fixed_to_float(self.stretch_width)
    }
}

/// Tangent projection of the front half-turn; `-1` / `width + 1` mark
/// angles that fall off the left / right edge.
fn build_view_angle_to_x(center_x: i32, width: i32) -> Vec<i32> {
    let j = fixed_div(
        center_x << FRACBITS,
        FINE_TANGENT[FINEANGLES / 4 + FIELDOFVIEW / 2],
    );

    (0..FINEANGLES / 2)
        .step_by(2)
        .map(|i| {
            let tan = FINE_TANGENT[i];
            if tan > FRACUNIT * 2 {
                -1
            } else if tan < -FRACUNIT * 2 {
                width + 1
            } else {
                let t = fixed_mul(tan, j);
                let t = ((center_x << FRACBITS) - t + FRACUNIT - 1) >> FRACBITS;
                t.clamp(-1, width + 1)
            }
        })
        .collect()
}

/// First angle index whose projected column is at or left of `x`.
fn build_x_to_view_angle(view_angle_to_x: &[i32], width: u32) -> Vec<Angle> {
    (0..=width as i32)
        .map(|x| {
            let idx = view_angle_to_x
                .iter()
                .position(|&t| t <= x)
                .unwrap_or(view_angle_to_x.len() - 1);
            ((idx as u32) << (ANGLETOFINESHIFT + 1)).wrapping_sub(ANG90)
        })
        .collect()
}

fn clamp_view_angle_to_x(mut table: Vec<i32>, width: i32) -> Vec<i32> {
    for t in table.iter_mut() {
        if *t == -1 {
            *t = 0;
        } else if *t == width + 1 {
            *t = width;
        }
    }
    table
}

/*──────────────────────────────── Tests ───────────────────────────────*/
