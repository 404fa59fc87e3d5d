//! First pass: walk every visible wall once, left to right, to resolve the
//! per-column clip bounds, register floor / ceiling spans as visplanes,
//! record sprite silhouettes and paint the sky.

use crate::{
    config::RenderLimits,
    defs::{MAX_RENDER_SCALE, WallActions},
    renderer::{
        ColumnBlitter, RenderError,
        software::{
            planes::{PlaneMap, SENTINEL_PLANE, ScreenYPair, VisplaneId},
            projection::ViewTables,
            sky::SkyColumns,
            walls::{Openings, VisWall},
        },
    },
    world::TextureId,
};

/// Per-column solid pixel bounds. Nothing may be drawn at or above `top[x]`
/// nor at or below `bottom[x]`.
#[derive(Default)]
pub struct ClipBands {
    pub top: Vec<i32>,
    pub bottom: Vec<i32>,
}

impl ClipBands {
    /// Fully open: `top = -1`, `bottom = screen_height`.
    pub fn reset(&mut self, width: usize, height: u32) {
        self.top.clear();
        self.top.resize(width, -1);
        self.bottom.clear();
        self.bottom.resize(width, height as i32);
    }
}

/// Everything the two passes share within one frame. Reset, never
/// reallocated, between frames.
pub struct FrameRenderState {
    pub clip: ClipBands,
    pub planes: PlaneMap,
    pub openings: Openings,
}

impl FrameRenderState {
    pub fn new(limits: &RenderLimits, width: usize) -> Self {
        Self {
            clip: ClipBands::default(),
            planes: PlaneMap::new(limits.max_visplanes, width),
            openings: Openings::new(limits.max_openings),
        }
    }

    /// Sentinel-only plane pool and an empty openings pool.
    pub fn reset(&mut self, width: usize) {
        self.planes.clear(width);
        self.openings.reset();
    }

    pub fn seg_loop<B: ColumnBlitter>(
        &mut self,
        wall: &VisWall,
        tables: &ViewTables,
        sky: &SkyColumns<'_>,
        blitter: &mut B,
    ) -> Result<(), RenderError> {
        let actions = wall.actions;
        let center_y = tables.center_y;
        let screen_h = tables.screen_height as i32;

        let add_floor = actions.contains(WallActions::ADD_FLOOR);
        let add_ceiling = actions.contains(WallActions::ADD_CEILING);
        let bottom_sil = actions.contains(WallActions::BOTTOM_SIL);
        let top_sil = actions.contains(WallActions::TOP_SIL);
        let new_floor = actions.contains(WallActions::NEW_FLOOR);
        let new_ceiling = actions.contains(WallActions::NEW_CEILING);
        let add_sky = actions.contains(WallActions::ADD_SKY);

        let mut floor_y = wall.view_y(center_y, wall.floor_height);
        let mut ceil_y = wall.view_y(center_y, wall.ceiling_height);
        let mut new_floor_y = wall.view_y(center_y, wall.floor_new_height);
        let mut new_ceil_y = wall.view_y(center_y, wall.ceiling_new_height);

        // the sentinel's columns are all defined, forcing a lookup on first use
        let mut floor_plane = SENTINEL_PLANE;
        let mut ceil_plane = SENTINEL_PLANE;

        let mut column_scale = wall.left_scale;

        for x in wall.columns() {
            let xi = x as usize;
            let scale = column_scale.min(MAX_RENDER_SCALE);
            // snapshot; every test below sees the bounds as they were before
            // this wall's own silhouette update
            let clip_top = self.clip.top[xi];
            let clip_bottom = self.clip.bottom[xi];

            if add_floor {
                let top = (floor_y.y as i32).max(clip_top + 1);
                let bottom = clip_bottom - 1;
                if top <= bottom {
                    floor_plane = self.claim_column(
                        floor_plane,
                        wall.floor_height,
                        wall.floor_pic,
                        x,
                        wall,
                    )?;
                    self.planes.get_mut(floor_plane).cols[xi] = span(top, bottom);
                }
                floor_y.advance();
            }

            if add_ceiling {
                let top = clip_top + 1;
                let bottom = (ceil_y.y as i32 - 1).min(clip_bottom - 1);
                if top <= bottom {
                    ceil_plane = self.claim_column(
                        ceil_plane,
                        wall.ceiling_height,
                        wall.ceiling_pic,
                        x,
                        wall,
                    )?;
                    self.planes.get_mut(ceil_plane).cols[xi] = span(top, bottom);
                }
                ceil_y.advance();
            }

            if bottom_sil || new_floor {
                let low = (new_floor_y.y as i32).min(clip_bottom).max(0);
                if bottom_sil {
                    self.openings.get_mut(wall.bottom_sil.clone())[xi - wall.left_x as usize] =
                        low as u16;
                }
                if new_floor {
                    self.clip.bottom[xi] = low;
                }
                new_floor_y.advance();
            }

            if top_sil || new_ceiling {
                let high = (new_ceil_y.y as i32 - 1).max(clip_top).min(screen_h - 1);
                if top_sil {
                    self.openings.get_mut(wall.top_sil.clone())[xi - wall.left_x as usize] =
                        (high + 1) as u16;
                }
                if new_ceiling {
                    self.clip.top[xi] = high;
                }
                new_ceil_y.advance();
            }

            if add_sky {
                let bottom =
                    ((center_y as f32 - scale * wall.ceiling_height) as i32).min(clip_bottom);
                if clip_top + 1 < bottom {
                    sky.draw(tables, x, blitter);
                }
            }

            column_scale += wall.scale_step;
        }

        Ok(())
    }

    /// Keep using `current` while column `x` is free in it, otherwise move on
    /// to a plane that can take it.
    fn claim_column(
        &mut self,
        current: VisplaneId,
        height: f32,
        flat: TextureId,
        x: i32,
        wall: &VisWall,
    ) -> Result<VisplaneId, RenderError> {
        if self.planes.get(current).cols[x as usize].is_undefined() {
            return Ok(current);
        }
        self.planes
            .find_plane(current, height, flat, x, wall.right_x, wall.light_level)
    }
}

#[inline]
fn span(top: i32, bottom: i32) -> ScreenYPair {
    ScreenYPair {
        top: top as u16,
        bottom: bottom as u16,
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
