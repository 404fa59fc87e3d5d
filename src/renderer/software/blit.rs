use crate::{
    defs::{BlitFlags, FRAME_HEIGHT, FRAME_WIDTH},
    renderer::{ColumnBlit, ColumnBlitter, Rgba},
    world::Texture,
};

/// CPU frame-buffer (0xAARRGGBB) the 3-D view is centred in.
pub struct FrameBuffer {
    pub pixels: Vec<Rgba>,
    pub width: usize,
    pub height: usize,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(FRAME_WIDTH, FRAME_HEIGHT)
    }
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }
}

#[inline(always)]
fn shade(color: Rgba, mul: [f32; 3]) -> Rgba {
    let ch = |shift: u32, m: f32| {
        let c = ((color >> shift) & 0xFF) as f32 * m;
        (c.clamp(0.0, 255.0) as u32) << shift
    };
    (color & 0xFF00_0000) | ch(16, mul[0]) | ch(8, mul[1]) | ch(0, mul[2])
}

impl ColumnBlitter for FrameBuffer {
    fn blit_column(&mut self, tex: &Texture, col: &ColumnBlit) {
        let x = col.dst_x as usize;
        if x >= self.width || tex.w == 0 || tex.h == 0 {
            return;
        }

        let tex_x = (col.tex_x.max(0.0) as usize).min(tex.w - 1);
        let tex_h = tex.h as i32;
        let wrap = col.flags.contains(BlitFlags::V_WRAP);
        let step = if col.flags.contains(BlitFlags::STEP_Y) {
            col.tex_y_step
        } else {
            0.0
        };
        let mul = col.flags.contains(BlitFlags::COLOR_MULT_RGB);

        let y0 = col.dst_y as usize;
        let y1 = (y0 + col.height as usize).min(self.height);
        let mut tex_y = col.tex_y;

        for y in y0..y1 {
            let ty = tex_y.floor() as i32;
            let ty = if wrap { ty.rem_euclid(tex_h) } else { ty.clamp(0, tex_h - 1) };

            let texel = tex.texel(tex_x, ty as usize);
            self.pixels[y * self.width + x] = if mul {
                shade(texel, col.color_mul)
            } else {
                texel
            };
            tex_y += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 x 4 texture with a distinct colour per row.
    fn stripes() -> Texture {
        Texture {
            name: "STRIPES".into(),
            w: 1,
            h: 4,
            pixels: vec![0xFF_000010, 0xFF_000020, 0xFF_000030, 0xFF_000040],
        }
    }

    fn blit(tex_y: f32, height: u32, flags: BlitFlags) -> ColumnBlit {
        ColumnBlit {
            tex_x: 0.0,
            tex_y,
            tex_y_step: 1.0,
            dst_x: 5,
            dst_y: 2,
            height,
            flags,
            color_mul: [0.5; 3],
        }
    }

    #[test]
    fn vertical_wrap_repeats_the_texture() {
        let mut fb = FrameBuffer::new(8, 16);
        fb.blit_column(&stripes(), &blit(2.0, 6, BlitFlags::STEP_Y | BlitFlags::V_WRAP));
        let col: Vec<_> = (2..8).map(|y| fb.pixel(5, y) & 0xFF).collect();
        assert_eq!(col, vec![0x30, 0x40, 0x10, 0x20, 0x30, 0x40]);
        assert_eq!(fb.pixel(5, 1), 0);
        assert_eq!(fb.pixel(5, 8), 0);
    }

    #[test]
    fn without_wrap_the_last_row_repeats() {
        let mut fb = FrameBuffer::new(8, 16);
        fb.blit_column(&stripes(), &blit(2.0, 4, BlitFlags::STEP_Y));
        let col: Vec<_> = (2..6).map(|y| fb.pixel(5, y) & 0xFF).collect();
        assert_eq!(col, vec![0x30, 0x40, 0x40, 0x40]);
    }

    #[test]
    fn colour_multiplier_scales_each_channel() {
        let mut fb = FrameBuffer::new(8, 16);
        let tex = Texture {
            name: "WHITE".into(),
            w: 1,
            h: 1,
            pixels: vec![0xFF_C08040],
        };
        let mut b = blit(0.0, 1, BlitFlags::COLOR_MULT_RGB);
        b.color_mul = [0.5, 0.25, 1.0];
        fb.blit_column(&tex, &b);
        assert_eq!(fb.pixel(5, 2), 0xFF_602040);
    }

    #[test]
    fn writes_stop_at_the_bottom_edge() {
        let mut fb = FrameBuffer::new(8, 4);
        fb.blit_column(&stripes(), &blit(0.0, 100, BlitFlags::STEP_Y | BlitFlags::V_WRAP));
        assert_eq!(fb.pixel(5, 3) & 0xFF, 0x20);

        let mut off = blit(0.0, 4, BlitFlags::STEP_Y);
        off.dst_x = 8;
        fb.blit_column(&stripes(), &off);
    }
}
