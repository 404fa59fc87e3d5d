//! Rendering abstraction layer.
//!
//! *The rasterizer never writes a pixel itself.* Both passes reduce every
//! visible wall or sky column to a [`ColumnBlit`] request and hand it to a
//! type that implements [`ColumnBlitter`].
//!
//! * The reference [`FrameBuffer`] writes ARGB pixels on the CPU.
//! * Tests plug in recording blitters to inspect exactly what was requested.

use crate::{defs::BlitFlags, world::Texture};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// One vertical run of texels to copy into the destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnBlit {
    /// Texel column (already wrapped to the texture width for walls).
    pub tex_x: f32,
    /// Texel row sampled for the first destination pixel.
    pub tex_y: f32,
    /// Texel rows advanced per destination pixel.
    pub tex_y_step: f32,
    pub dst_x: u32,
    pub dst_y: u32,
    /// Vertically contiguous pixels to write, starting at `dst_y`.
    pub height: u32,
    pub flags: BlitFlags,
    /// Per-channel multiplier, only read with [`BlitFlags::COLOR_MULT_RGB`].
    pub color_mul: [f32; 3],
}

/// The per-column sampler/writer both passes delegate to.
///
/// Implementations must wrap `tex_y` around the texture height when
/// [`BlitFlags::V_WRAP`] is set, multiply sampled colour by `color_mul` when
/// [`BlitFlags::COLOR_MULT_RGB`] is set, and stop at the bottom edge of their
/// destination instead of writing past it.
pub trait ColumnBlitter {
    fn blit_column(&mut self, tex: &Texture, col: &ColumnBlit);
}

impl<T: ColumnBlitter + ?Sized> ColumnBlitter for &mut T {
    fn blit_column(&mut self, tex: &Texture, col: &ColumnBlit) {
        (**self).blit_column(tex, col)
    }
}

/// Fixed-capacity pool exhaustion: the level exceeds the configured limits.
/// Not recoverable within the frame.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("no more visplanes (limit {limit})")]
    VisplaneOverflow { limit: usize },

    #[error("no more visible walls (limit {limit})")]
    WallOverflow { limit: usize },

    #[error("no more openings for silhouettes (limit {limit})")]
    OpeningOverflow { limit: usize },
}

pub mod software;

pub use software::{FrameBuffer, Software};
