//! Render configuration: screen size class and pool capacities.

use crate::{
    defs::{MAX_OPENINGS, MAX_VISPLANES, MAX_WALL_CMDS},
    renderer::software::planes::MAX_PLANE_RECORDS,
};

const SCREEN_WIDTHS: [u32; 6] = [280, 256, 224, 192, 160, 128];
const SCREEN_HEIGHTS: [u32; 6] = [160, 144, 128, 112, 96, 80];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("screen size class {0} out of range (0..={max})", max = SCREEN_WIDTHS.len() - 1)]
    BadScreenSize(u8),

    /// The plane pool needs its sentinel record plus at least one real plane.
    #[error("visplane pool of {0} cannot hold the sentinel and a real plane")]
    TooFewVisplanes(usize),

    #[error("visplane pool of {0} exceeds the {max} records a plane id can address", max = MAX_PLANE_RECORDS)]
    TooManyVisplanes(usize),

    #[error("wall pool must hold at least one wall")]
    NoWalls,
}

/// One of the discrete 3-D view sizes; 0 is the largest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenSize(u8);

impl ScreenSize {
    pub const COUNT: u8 = SCREEN_WIDTHS.len() as u8;

    pub fn new(class: u8) -> Result<Self, ConfigError> {
        if class < Self::COUNT {
            Ok(Self(class))
        } else {
            Err(ConfigError::BadScreenSize(class))
        }
    }

    #[inline]
    pub fn class(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn width(self) -> u32 {
        SCREEN_WIDTHS[self.0 as usize]
    }

    #[inline]
    pub fn height(self) -> u32 {
        SCREEN_HEIGHTS[self.0 as usize]
    }
}

/// Capacities of the fixed per-frame pools. Exceeding any of them during a
/// frame is a fatal [`RenderError`](crate::renderer::RenderError): size these
/// for the worst-case level geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderLimits {
    /// Visplane records, *including* the permanent sentinel at index 0.
    pub max_visplanes: usize,
    pub max_walls: usize,
    /// Silhouette entries shared by all walls of a frame.
    pub max_openings: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_visplanes: MAX_VISPLANES,
            max_walls: MAX_WALL_CMDS,
            max_openings: MAX_OPENINGS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub screen_size: ScreenSize,
    pub limits: RenderLimits,
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ScreenSize::new(self.screen_size.class())?;
        if self.limits.max_visplanes < 2 {
            return Err(ConfigError::TooFewVisplanes(self.limits.max_visplanes));
        }
        if self.limits.max_visplanes > MAX_PLANE_RECORDS {
            return Err(ConfigError::TooManyVisplanes(self.limits.max_visplanes));
        }
        if self.limits.max_walls == 0 {
            return Err(ConfigError::NoWalls);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_sizes_map_to_the_discrete_table() {
        let s = ScreenSize::new(2).unwrap();
        assert_eq!((s.width(), s.height()), (224, 128));
        assert_eq!(ScreenSize::default().width(), 280);
        assert_eq!(ScreenSize::new(6), Err(ConfigError::BadScreenSize(6)));
    }

    #[test]
    fn limits_are_validated() {
        let mut cfg = RenderConfig::default();
        assert_eq!(cfg.validate(), Ok(()));

        cfg.limits.max_visplanes = 1;
        assert_eq!(cfg.validate(), Err(ConfigError::TooFewVisplanes(1)));

        cfg.limits.max_visplanes = 65_536;
        assert_eq!(cfg.validate(), Ok(()));
        cfg.limits.max_visplanes = 65_537;
        assert_eq!(cfg.validate(), Err(ConfigError::TooManyVisplanes(65_537)));

        cfg.limits.max_visplanes = 2;
        cfg.limits.max_walls = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::NoWalls));
    }
}
