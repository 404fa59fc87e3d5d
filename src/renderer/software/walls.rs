use std::ops::{Range, RangeInclusive};

use crate::{
    defs::{WallActions, tables::Angle},
    renderer::RenderError,
    world::TextureId,
};

/// Upper or lower texture of a wall. Heights are view-relative world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WallTexture {
    pub texture: TextureId,
    pub top_height: f32,
    pub bottom_height: f32,
    /// World height that texel row 0 is anchored to.
    pub texture_mid: f32,
}

/// One screen-projected wall fragment, as emitted by the BSP stage.
///
/// All heights are relative to the eye; scale is in screen pixels per world
/// unit and moves linearly across the column range.
#[derive(Clone, Debug, Default)]
pub struct VisWall {
    pub left_x: i32,
    pub right_x: i32,
    pub left_scale: f32,
    pub scale_step: f32,

    /// View-relative angle of the wall normal.
    pub center_angle: Angle,
    /// Perpendicular distance from the eye to the wall line.
    pub distance: f32,
    /// Horizontal texture offset at the foot of that perpendicular.
    pub offset: f32,

    pub actions: WallActions,
    /// Upper texture; the whole wall for one-sided lines.
    pub top: WallTexture,
    pub bottom: WallTexture,

    pub floor_height: f32,
    pub floor_new_height: f32,
    pub ceiling_height: f32,
    pub ceiling_new_height: f32,
    pub floor_pic: TextureId,
    pub ceiling_pic: TextureId,

    pub light_level: u32,
    /// Per-surface multiplier (fake contrast on axis-aligned walls).
    pub light_mul: f32,

    /// Silhouette storage in the frame's [`Openings`], one entry per column
    /// of `left_x..=right_x`. Empty unless the matching `*_SIL` bit is set.
    pub top_sil: Range<usize>,
    pub bottom_sil: Range<usize>,
}

impl VisWall {
    #[inline]
    pub fn columns(&self) -> RangeInclusive<i32> {
        self.left_x..=self.right_x
    }

    #[inline]
    pub fn width(&self) -> usize {
        (self.right_x - self.left_x + 1).max(0) as usize
    }

    /// Drop the columns outside `0..screen_width`, re-basing the scale on
    /// the new left edge. `None` when nothing is left on screen.
    pub fn clipped_to_screen(mut self, screen_width: u32) -> Option<Self> {
        let last = screen_width as i32 - 1;
        if self.left_x > self.right_x || self.right_x < 0 || self.left_x > last {
            return None;
        }
        if self.left_x < 0 {
            self.left_scale += self.scale_step * -self.left_x as f32;
            self.left_x = 0;
        }
        self.right_x = self.right_x.min(last);
        Some(self)
    }

    /// Screen Y of a world height across this wall, starting at `left_x`.
    #[inline]
    pub fn view_y(&self, center_y: i32, world_height: f32) -> ViewYStep {
        ViewYStep {
            y: center_y as f32 - world_height * self.left_scale,
            step: -self.scale_step * world_height,
        }
    }
}

/// A screen Y that moves linearly from column to column. Both passes step
/// these the same way so their results agree to the sub-pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewYStep {
    pub y: f32,
    pub step: f32,
}

impl ViewYStep {
    #[inline(always)]
    pub fn advance(&mut self) {
        self.y += self.step;
    }
}

/// Per-frame bump allocator for silhouette entries.
pub struct Openings {
    data: Vec<u16>,
    cursor: usize,
}

impl Openings {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            cursor: 0,
        }
    }

    /// Hand out `len` consecutive slots.
    pub fn alloc(&mut self, len: usize) -> Result<Range<usize>, RenderError> {
        let start = self.cursor;
        let end = start + len;
        if end > self.data.len() {
            return Err(RenderError::OpeningOverflow {
                limit: self.data.len(),
            });
        }
        self.cursor = end;
        Ok(start..end)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn get(&self, range: Range<usize>) -> &[u16] {
        &self.data[range]
    }

    #[inline]
    pub fn get_mut(&mut self, range: Range<usize>) -> &mut [u16] {
        &mut self.data[range]
    }
}

/// The frame's visible walls in BSP (far-to-near) order.
pub struct WallList {
    walls: Vec<VisWall>,
    limit: usize,
}

impl WallList {
    pub fn new(limit: usize) -> Self {
        Self {
            walls: Vec::with_capacity(limit),
            limit,
        }
    }

    pub fn clear(&mut self) {
        self.walls.clear();
    }

    /// Append a wall, reserving its silhouettes in `openings`.
    pub fn push(
        &mut self,
        mut wall: VisWall,
        openings: &mut Openings,
    ) -> Result<usize, RenderError> {
        if self.walls.len() >= self.limit {
            return Err(RenderError::WallOverflow { limit: self.limit });
        }

        let count = wall.width();
        wall.top_sil = if wall.actions.contains(WallActions::TOP_SIL) {
            openings.alloc(count)?
        } else {
            0..0
        };
        wall.bottom_sil = if wall.actions.contains(WallActions::BOTTOM_SIL) {
            openings.alloc(count)?
        } else {
            0..0
        };

        self.walls.push(wall);
        Ok(self.walls.len() - 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&VisWall> {
        self.walls.get(idx)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, VisWall> {
        self.walls.iter()
    }
}
