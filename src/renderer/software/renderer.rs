use crate::{
    config::{ConfigError, RenderConfig, ScreenSize},
    renderer::{
        ColumnBlitter, RenderError,
        software::{
            clip::{ClipBands, FrameRenderState},
            planes::PlaneMap,
            projection::ViewTables,
            sky::SkyColumns,
            wall_draw::draw_seg,
            walls::{VisWall, WallList},
        },
    },
    world::{Camera, NO_TEXTURE, TextureBank, TextureId},
};
use glam::Vec3;

/// Doom-style two-pass wall rasterizer.
///
/// A frame goes `begin_frame` → `add_wall` (far to near, once per visible
/// wall) → `draw_all_line_segs`. The finished visplanes stay readable
/// through [`planes`](Self::planes) until the next `begin_frame`.
pub struct Software {
    config: RenderConfig,
    tables: ViewTables,
    camera: Camera,
    sky_texture: TextureId,
    /// Requested by `set_screen_size`, applied by the next `begin_frame`.
    pending_size: Option<ScreenSize>,
    walls: WallList,
    frame: FrameRenderState,
    #[cfg(feature = "log")]
    logger: slog::Logger,
}

impl Software {
    pub fn new(
        config: RenderConfig,
        #[cfg(feature = "log")] logger: slog::Logger,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let tables = ViewTables::new(config.screen_size);
        let width = tables.screen_width as usize;

        let renderer = Software {
            tables,
            camera: Camera::new(Vec3::ZERO, 0.0),
            sky_texture: NO_TEXTURE,
            pending_size: None,
            walls: WallList::new(config.limits.max_walls),
            frame: FrameRenderState::new(&config.limits, width),
            config,
            #[cfg(feature = "log")]
            logger,
        };
        renderer.log_tables();
        Ok(renderer)
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[inline]
    pub fn tables(&self) -> &ViewTables {
        &self.tables
    }

    /// Switch the 3-D view size. Takes effect from the next `begin_frame`;
    /// walls already queued keep drawing at the current size.
    pub fn set_screen_size(&mut self, size: ScreenSize) {
        self.pending_size = (size != self.config.screen_size).then_some(size);
    }

    /// Size the next `begin_frame` switches to, if any.
    #[inline]
    pub fn pending_screen_size(&self) -> Option<ScreenSize> {
        self.pending_size
    }

    fn log_tables(&self) {
        #[cfg(feature = "log")]
        slog::debug!(
            self.logger,
            "View tables built";
            "width" => self.tables.screen_width,
            "height" => self.tables.screen_height,
            "stretch" => self.tables.stretch
        );
    }

    /// Snapshot the camera and forget the previous frame's walls, planes and
    /// silhouettes.
    pub fn begin_frame(&mut self, camera: &Camera, sky_texture: TextureId) {
        if let Some(size) = self.pending_size.take() {
            self.config.screen_size = size;
            self.tables = ViewTables::new(size);
            self.log_tables();
        }
        self.camera = *camera;
        self.sky_texture = sky_texture;
        self.walls.clear();
        self.frame.reset(self.tables.screen_width as usize);
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Queue a visible wall for this frame. Walls must arrive far to near.
    ///
    /// Walls with nothing on screen are dropped (`Ok(None)`); partly visible
    /// ones are clipped to the screen first.
    pub fn add_wall(&mut self, wall: VisWall) -> Result<Option<usize>, RenderError> {
        #[cfg(feature = "log")]
        let columns = (wall.left_x, wall.right_x);
        let Some(wall) = wall.clipped_to_screen(self.tables.screen_width) else {
            #[cfg(feature = "log")]
            slog::trace!(
                self.logger,
                "Dropped off-screen wall";
                "left_x" => columns.0,
                "right_x" => columns.1
            );
            return Ok(None);
        };

        match self.walls.push(wall, &mut self.frame.openings) {
            Ok(idx) => Ok(Some(idx)),
            Err(err) => Err(self.fatal(err)),
        }
    }

    #[inline]
    pub fn walls(&self) -> &WallList {
        &self.walls
    }

    /// Run both passes over the queued walls.
    ///
    /// Pass one walks the walls in queue order, building clip bounds and
    /// visplanes and painting the sky. Pass two paints the wall textures in
    /// reverse order.
    pub fn draw_all_line_segs<B: ColumnBlitter>(
        &mut self,
        bank: &TextureBank,
        blitter: &mut B,
    ) -> Result<(), RenderError> {
        self.frame
            .clip
            .reset(self.tables.screen_width as usize, self.tables.screen_height);

        let sky = SkyColumns::new(
            &self.tables,
            bank.texture_or_missing(self.sky_texture),
            self.camera.angle(),
        );

        let pass1 = self
            .walls
            .iter()
            .try_for_each(|wall| self.frame.seg_loop(wall, &self.tables, &sky, blitter));
        if let Err(err) = pass1 {
            return Err(self.fatal(err));
        }

        for wall in self.walls.iter().rev() {
            draw_seg(&self.tables, wall, bank, blitter);
        }

        #[cfg(feature = "log")]
        slog::trace!(
            self.logger,
            "Frame done";
            "walls" => self.walls.len(),
            "planes" => self.frame.planes.len(),
            "openings" => self.frame.openings.used()
        );
        Ok(())
    }

    fn fatal(&self, err: RenderError) -> RenderError {
        #[cfg(feature = "log")]
        slog::crit!(self.logger, "{}", err);
        err
    }

    /// Finished floor / ceiling records for the plane rasterizer.
    #[inline]
    pub fn planes(&self) -> &PlaneMap {
        &self.frame.planes
    }

    /// Clip bounds as left by the last `draw_all_line_segs`.
    #[inline]
    pub fn clip_bands(&self) -> &ClipBands {
        &self.frame.clip
    }

    /// Top and bottom sprite silhouettes of wall `idx`, one entry per column
    /// from its `left_x`. Empty where the wall records none.
    pub fn silhouettes(&self, idx: usize) -> Option<(&[u16], &[u16])> {
        let wall = self.walls.get(idx)?;
        Some((
            self.frame.openings.get(wall.top_sil.clone()),
            self.frame.openings.get(wall.bottom_sil.clone()),
        ))
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
