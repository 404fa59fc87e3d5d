//! Classic software (CPU) wall rasterizer.
//!
//! * [`projection`] builds the screen-size dependent lookup tables.
//! * [`clip`] is the first pass: clip bounds, visplanes, silhouettes, sky.
//! * [`wall_draw`] is the second pass: textured wall columns, back to front.
//! * [`Software`] owns the per-frame pools and drives both passes.

pub mod blit;
pub mod clip;
pub mod lighting;
pub mod planes;
pub mod projection;
mod renderer;
pub mod sky;
pub mod wall_draw;
pub mod walls;

pub use blit::FrameBuffer;
pub use clip::{ClipBands, FrameRenderState};
pub use lighting::LightParams;
pub use planes::{PlaneMap, PlaneSpan, ScreenYPair, VisPlane, VisplaneId};
pub use projection::ViewTables;
pub use renderer::Software;
pub use walls::{Openings, VisWall, WallList, WallTexture};
