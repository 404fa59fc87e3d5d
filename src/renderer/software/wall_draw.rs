//! Second pass: paint the upper / lower wall textures column by column.
//! Runs back to front after the clip pass and reads nothing it produced.

use crate::{
    defs::{BlitFlags, WallActions, tables::angle_to_radians},
    renderer::{
        ColumnBlit, ColumnBlitter,
        software::{
            projection::ViewTables,
            walls::{ViewYStep, VisWall, WallTexture},
        },
    },
    world::{Texture, TextureBank},
};

/// A wall column before screen clipping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    pub view_y: f32,
    pub height: u32,
    pub tex_y: f32,
}

/// Column extent and starting texel row; `None` when the column collapses.
pub fn wall_column(
    sub: &WallTexture,
    tex_h: usize,
    top_y: f32,
    bottom_y: f32,
) -> Option<WallColumn> {
    let height = (bottom_y - top_y).ceil() as i32;
    if height <= 0 {
        return None;
    }

    let tex_y = sub.texture_mid - sub.top_height;
    let tex_y = if tex_y < 0.0 { tex_y + tex_h as f32 } else { tex_y };

    Some(WallColumn {
        view_y: top_y,
        height: height as u32,
        tex_y,
    })
}

/// Clip a column against the top and bottom of the view.
///
/// The starting texel is pushed forward by exactly the distance skipped,
/// including the fractional part of `view_y`, so textures stay locked to the
/// wall as it moves by sub-pixel amounts.
pub fn clip_wall_column(
    tables: &ViewTables,
    view_x: i32,
    col: WallColumn,
    inv_scale: f32,
    tex_x: u32,
    light_mul: f32,
) -> Option<ColumnBlit> {
    let screen_h = tables.screen_height as i32;
    let view_yi = col.view_y as i32;
    if view_yi >= screen_h {
        return None;
    }

    let off_top = if view_yi < 0 { -view_yi } else { 0 };
    if off_top >= col.height as i32 {
        return None;
    }
    let off_top_f = if col.view_y < 0.0 { -col.view_y } else { 0.0 };

    let pixel_skip = if off_top > 0 {
        off_top_f + 1.0
    } else {
        1.0 - col.view_y % 1.0
    };

    let clipped_y = view_yi + off_top;
    let height = (col.height as i32 - off_top).min(screen_h - clipped_y);

    Some(ColumnBlit {
        tex_x: tex_x as f32,
        tex_y: col.tex_y + pixel_skip * inv_scale,
        tex_y_step: inv_scale,
        dst_x: view_x as u32 + tables.screen_x_offset,
        dst_y: clipped_y as u32 + tables.screen_y_offset,
        height: height as u32,
        flags: BlitFlags::STEP_Y | BlitFlags::V_WRAP | BlitFlags::COLOR_MULT_RGB,
        color_mul: [light_mul; 3],
    })
}

pub fn draw_seg<B: ColumnBlitter>(
    tables: &ViewTables,
    wall: &VisWall,
    bank: &TextureBank,
    blitter: &mut B,
) {
    let actions = wall.actions;
    if !actions.intersects(WallActions::TOP_TEXTURE | WallActions::BOTTOM_TEXTURE) {
        return;
    }

    let light = tables.light_params(wall.light_level, false);
    let center_angle = angle_to_radians(wall.center_angle);
    let stretch_width = tables.stretch_width_f();

    // for one-sided lines the upper texture is the whole wall
    let mut parts: [Option<WallPart<'_>>; 2] = [
        actions
            .contains(WallActions::TOP_TEXTURE)
            .then(|| WallPart::new(tables, wall, &wall.top, bank)),
        actions
            .contains(WallActions::BOTTOM_TEXTURE)
            .then(|| WallPart::new(tables, wall, &wall.bottom, bank)),
    ];

    let mut column_scale = wall.left_scale;

    for x in wall.columns() {
        let inv_scale = 1.0 / column_scale;

        let tex_x = (wall.offset
            - (center_angle - tables.view_angle_for_x(x)).tan() * wall.distance)
            .round() as i32;

        let dist = inv_scale * stretch_width;
        let light_mul = light.wall_light_mul(dist, wall.light_mul);

        for part in parts.iter_mut().flatten() {
            part.draw(tables, x, tex_x, inv_scale, light_mul, blitter);
        }

        column_scale += wall.scale_step;
    }
}

struct WallPart<'a> {
    sub: &'a WallTexture,
    tex: &'a Texture,
    top: ViewYStep,
    bottom: ViewYStep,
}

impl<'a> WallPart<'a> {
    fn new(
        tables: &ViewTables,
        wall: &VisWall,
        sub: &'a WallTexture,
        bank: &'a TextureBank,
    ) -> Self {
        Self {
            sub,
            tex: bank.texture_or_missing(sub.texture),
            top: wall.view_y(tables.center_y, sub.top_height),
            bottom: wall.view_y(tables.center_y, sub.bottom_height),
        }
    }

    fn draw<B: ColumnBlitter>(
        &mut self,
        tables: &ViewTables,
        x: i32,
        tex_x: i32,
        inv_scale: f32,
        light_mul: f32,
        blitter: &mut B,
    ) {
        let blit = wall_column(self.sub, self.tex.h, self.top.y, self.bottom.y).and_then(|col| {
            let tex_x = tex_x.rem_euclid(self.tex.w.max(1) as i32) as u32;
            clip_wall_column(tables, x, col, inv_scale, tex_x, light_mul)
        });
        if let Some(blit) = blit {
            blitter.blit_column(self.tex, &blit);
        }

        self.top.advance();
        self.bottom.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ScreenSize, defs::MIN_LIGHT_MUL};

    #[derive(Default)]
    struct Recorder(Vec<(String, ColumnBlit)>);
    impl ColumnBlitter for Recorder {
        fn blit_column(&mut self, tex: &Texture, col: &ColumnBlit) {
            self.0.push((tex.name.clone(), *col));
        }
    }

    fn bank() -> (TextureBank, u16, u16) {
        let mut bank = TextureBank::default_with_checker();
        let brick = bank
            .insert(
                "BRICK",
                Texture {
                    name: "BRICK".into(),
                    w: 64,
                    h: 64,
                    pixels: vec![0xFF_804020; 64 * 64],
                },
            )
            .unwrap();
        let step = bank
            .insert(
                "STEP",
                Texture {
                    name: "STEP".into(),
                    w: 32,
                    h: 16,
                    pixels: vec![0xFF_606060; 32 * 16],
                },
            )
            .unwrap();
        (bank, brick, step)
    }

    // 224 x 128
    fn tables() -> ViewTables {
        ViewTables::new(ScreenSize::new(2).unwrap())
    }

    fn solid_wall(tex: u16) -> VisWall {
        VisWall {
            left_x: 10,
            right_x: 20,
            left_scale: 1.0,
            scale_step: 0.0,
            distance: 100.0,
            actions: WallActions::TOP_TEXTURE,
            top: WallTexture {
                texture: tex,
                top_height: 64.0,
                bottom_height: 0.0,
                texture_mid: 0.0,
            },
            light_level: 255,
            light_mul: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn single_solid_wall_draws_every_column() {
        let t = tables();
        let (bank, brick, _) = bank();
        let wall = solid_wall(brick);
        let mut rec = Recorder::default();
        draw_seg(&t, &wall, &bank, &mut rec);

        assert_eq!(rec.0.len(), 11);
        for (i, (name, b)) in rec.0.iter().enumerate() {
            assert_eq!(name, "BRICK");
            assert_eq!(b.dst_x, 10 + i as u32 + t.screen_x_offset);
            assert_eq!(b.dst_y, t.screen_y_offset);
            assert_eq!(b.height, 64);
            assert_eq!(b.tex_y_step, 1.0);
            // one whole pixel already stepped from texel row 0
            assert_eq!(b.tex_y, 1.0);
            assert!(b.tex_x >= 0.0 && b.tex_x < 64.0);
            assert_eq!(b.color_mul[0], b.color_mul[1]);
            assert_eq!(b.color_mul[1], b.color_mul[2]);
            assert!(b.color_mul[0] >= MIN_LIGHT_MUL && b.color_mul[0] <= 1.0);
        }
    }

    #[test]
    fn column_starts_at_texel_row_zero() {
        let sub = solid_wall(1).top;
        let col = wall_column(&sub, 64, 0.0, 64.0).unwrap();
        assert_eq!(col, WallColumn { view_y: 0.0, height: 64, tex_y: 0.0 });
    }

    #[test]
    fn negative_anchor_wraps_once() {
        let sub = WallTexture {
            texture: 1,
            top_height: 24.0,
            bottom_height: 0.0,
            texture_mid: 8.0,
        };
        assert_eq!(wall_column(&sub, 64, 10.0, 20.0).unwrap().tex_y, 48.0);
    }

    #[test]
    fn degenerate_columns_are_skipped() {
        let sub = solid_wall(1).top;
        assert!(wall_column(&sub, 64, 30.0, 30.0).is_none());
        assert!(wall_column(&sub, 64, 30.0, 20.0).is_none());
    }

    #[test]
    fn clipping_off_the_top_skips_the_exact_fraction() {
        let t = tables();
        let col = WallColumn { view_y: -10.25, height: 40, tex_y: 0.0 };
        let b = clip_wall_column(&t, 0, col, 0.5, 3, 1.0).unwrap();
        assert_eq!(b.dst_y, t.screen_y_offset);
        assert_eq!(b.height, 30);
        assert_eq!(b.tex_y, 11.25 * 0.5);
    }

    #[test]
    fn clipping_at_the_bottom_shortens_the_column() {
        let t = tables();
        let col = WallColumn { view_y: 100.5, height: 60, tex_y: 2.0 };
        let b = clip_wall_column(&t, 0, col, 1.0, 0, 1.0).unwrap();
        assert_eq!(b.height, 28);
        assert_eq!(b.tex_y, 2.5);

        let below = WallColumn { view_y: 128.0, height: 4, tex_y: 0.0 };
        assert!(clip_wall_column(&t, 0, below, 1.0, 0, 1.0).is_none());
        let above = WallColumn { view_y: -8.0, height: 8, tex_y: 0.0 };
        assert!(clip_wall_column(&t, 0, above, 1.0, 0, 1.0).is_none());
    }

    #[test]
    fn texture_x_wraps_into_the_texture() {
        let t = tables();
        let (bank, brick, _) = bank();
        let mut wall = solid_wall(brick);
        wall.offset = -1000.0;
        let mut rec = Recorder::default();
        draw_seg(&t, &wall, &bank, &mut rec);
        assert!(rec.0.iter().all(|(_, b)| b.tex_x >= 0.0 && b.tex_x < 64.0));
    }

    #[test]
    fn upper_and_lower_parts_are_drawn_independently() {
        let t = tables();
        let (bank, brick, step) = bank();
        let mut wall = solid_wall(brick);
        wall.actions = WallActions::TOP_TEXTURE | WallActions::BOTTOM_TEXTURE;
        wall.top.bottom_height = 32.0;
        wall.bottom = WallTexture {
            texture: step,
            top_height: -16.0,
            bottom_height: -32.0,
            texture_mid: -16.0,
        };
        let mut rec = Recorder::default();
        draw_seg(&t, &wall, &bank, &mut rec);

        assert_eq!(rec.0.len(), 22);
        let lower: Vec<_> = rec.0.iter().filter(|(n, _)| n == "STEP").collect();
        assert_eq!(lower.len(), 11);
        assert_eq!(lower[0].1.height, 16);
        assert_eq!(lower[0].1.dst_y, 80 + t.screen_y_offset);
    }

    #[test]
    fn walls_without_textures_draw_nothing() {
        let t = tables();
        let (bank, brick, _) = bank();
        let mut wall = solid_wall(brick);
        wall.actions = WallActions::ADD_FLOOR | WallActions::ADD_SKY;
        let mut rec = Recorder::default();
        draw_seg(&t, &wall, &bank, &mut rec);
        assert!(rec.0.is_empty());
    }

    #[test]
    fn unknown_texture_draws_the_checkerboard() {
        let t = tables();
        let (bank, ..) = bank();
        let mut rec = Recorder::default();
        draw_seg(&t, &solid_wall(999), &bank, &mut rec);
        assert!(rec.0.iter().all(|(n, _)| n == "CHECKER"));
    }
}
