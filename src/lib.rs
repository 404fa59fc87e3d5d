//! Doom-style software wall rasterizer: clip bounds, visplanes, textured
//! wall columns and sky.

pub mod config;
pub mod defs;
pub mod renderer;
pub mod world;
