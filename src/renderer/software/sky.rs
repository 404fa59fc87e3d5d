use crate::{
    defs::{
        BlitFlags, REFERENCE_3D_VIEW_HEIGHT,
        tables::{ANGLETOSKYSHIFT, Angle, FRACMASK, fixed_div, fixed_mul, fixed_to_float,
            fixed_to_int, int_to_fixed},
    },
    renderer::{ColumnBlit, ColumnBlitter, software::projection::ViewTables},
    world::Texture,
};

/// Sky texel column for a view column: sky textures are 256 wide and wrap
/// with the camera yaw.
#[inline]
pub fn sky_tex_x(column_angle: Angle, view_angle: Angle) -> u32 {
    (column_angle.wrapping_add(view_angle) >> ANGLETOSKYSHIFT) & 0xFF
}

/// Everything about the sky that is constant over a frame.
pub struct SkyColumns<'a> {
    texture: &'a Texture,
    view_angle: Angle,
    col_height: u32,
    tex_y_step: f32,
}

impl<'a> SkyColumns<'a> {
    pub fn new(tables: &ViewTables, texture: &'a Texture, view_angle: Angle) -> Self {
        let sky_h = texture.h as i32;

        // native height rescaled to the view, rounded up on any fraction
        let sky_scale = fixed_div(
            int_to_fixed(tables.screen_height as i32),
            int_to_fixed(REFERENCE_3D_VIEW_HEIGHT as i32),
        );
        let scaled = fixed_mul(int_to_fixed(sky_h), sky_scale);
        let round_up = if scaled & FRACMASK != 0 { 1 } else { 0 };
        let col_height =
            ((fixed_to_int(scaled) + round_up).max(0) as u32).min(tables.screen_height);

        let tex_y_step = if col_height > 0 {
            fixed_to_float(fixed_div(int_to_fixed(sky_h), int_to_fixed(col_height as i32)))
        } else {
            0.0
        };

        Self {
            texture,
            view_angle,
            col_height,
            tex_y_step,
        }
    }

    #[inline]
    pub fn col_height(&self) -> u32 {
        self.col_height
    }

    /// Sky is unlit and always drawn from the top of the view.
    pub fn draw<B: ColumnBlitter>(&self, tables: &ViewTables, view_x: i32, blitter: &mut B) {
        let tex_x = sky_tex_x(tables.x_to_view_angle[view_x as usize], self.view_angle);

        blitter.blit_column(
            self.texture,
            &ColumnBlit {
                tex_x: tex_x as f32,
                tex_y: 0.0,
                tex_y_step: self.tex_y_step,
                dst_x: view_x as u32 + tables.screen_x_offset,
                dst_y: tables.screen_y_offset,
                height: self.col_height,
                flags: BlitFlags::STEP_Y,
                color_mul: [1.0; 3],
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ScreenSize, defs::tables::ANG90, world::Camera};
    use glam::Vec3;
    use std::f32::consts::TAU;

    fn sky(h: usize) -> Texture {
        Texture {
            name: "SKY1".into(),
            w: 256,
            h,
            pixels: vec![0xFF_3050A0; 256 * h],
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<ColumnBlit>);
    impl ColumnBlitter for Recorder {
        fn blit_column(&mut self, _tex: &Texture, col: &ColumnBlit) {
            self.0.push(*col);
        }
    }

    #[test]
    fn sky_wraps_four_times_per_turn() {
        let tables = ViewTables::new(ScreenSize::default());
        let col_angle = tables.x_to_view_angle[tables.center_x as usize];
        for yaw in [0.3_f32, 1.0, 2.5, 4.0] {
            let a = Camera::new(Vec3::ZERO, yaw).angle();
            for quarter in 1..=4u32 {
                let b = a.wrapping_add(ANG90.wrapping_mul(quarter));
                assert_eq!(sky_tex_x(col_angle, a), sky_tex_x(col_angle, b), "yaw {yaw}");
            }
        }
    }

    #[test]
    fn turning_a_full_circle_keeps_the_sky_in_place() {
        let mut cam = Camera::new(Vec3::ZERO, 1.0);
        let before = cam.angle();
        cam.turn(TAU);
        // float round-off is far below one sky texel (1 << 22)
        assert!((cam.angle().wrapping_sub(before) as i32).abs() < 1 << 12);
    }

    #[test]
    fn column_height_is_rescaled_and_rounded_up() {
        // 128 * 128/160 = 102.4 → 103
        let tables = ViewTables::new(ScreenSize::new(2).unwrap());
        let tex = sky(128);
        let s = SkyColumns::new(&tables, &tex, 0);
        assert_eq!(s.col_height(), 103);

        // 128 * 160/160 is exact
        let tables = ViewTables::new(ScreenSize::default());
        assert_eq!(SkyColumns::new(&tables, &tex, 0).col_height(), 128);
    }

    #[test]
    fn sky_column_is_unlit_and_starts_at_the_view_top() {
        let tables = ViewTables::new(ScreenSize::new(2).unwrap());
        let tex = sky(128);
        let mut rec = Recorder::default();
        SkyColumns::new(&tables, &tex, 0).draw(&tables, 7, &mut rec);

        let c = rec.0[0];
        assert_eq!(c.flags, BlitFlags::STEP_Y);
        assert_eq!((c.dst_x, c.dst_y), (7 + 48, 16));
        assert_eq!(c.tex_y, 0.0);
        assert!((c.tex_y_step * 103.0 - 128.0).abs() < 0.01);
        assert!(c.tex_x < 256.0);
    }
}
