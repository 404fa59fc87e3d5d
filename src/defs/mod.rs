//! Engine-wide constants shared by the projection builder and both passes.

pub mod flags;
pub mod tables;

pub use self::flags::{BlitFlags, WallActions};

/// Widest / tallest 3-D view any screen size class can select.
pub const MAX_SCREEN_WIDTH: usize = 280;
pub const MAX_SCREEN_HEIGHT: usize = 160;

/// Physical frame-buffer the 3-D view is centred in.
pub const FRAME_WIDTH: usize = 320;
pub const FRAME_HEIGHT: usize = 200;

/// View height the sky texture and stretch factors are authored against.
pub const REFERENCE_3D_VIEW_HEIGHT: u32 = 160;

/// Scales above this only produce degenerate, screen-filling spans.
pub const MAX_RENDER_SCALE: f32 = 64.0;

/// Nothing is ever lit darker than this.
pub const MIN_LIGHT_MUL: f32 = 0.025;

/// Number of sector light levels the light curves are tabulated for.
pub const LIGHT_LEVELS: usize = 256;

/// Default pool sizes, see [`crate::config::RenderLimits`].
pub const MAX_VISPLANES: usize = 64;
pub const MAX_WALL_CMDS: usize = 128;
pub const MAX_OPENINGS: usize = MAX_SCREEN_WIDTH * 64;
