use crate::{
    defs::{LIGHT_LEVELS, MIN_LIGHT_MUL},
    renderer::software::projection::ViewTables,
};

/// Distance-attenuation curve for one sector light level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    /// Darkest the surface may get, in light-level units (0..=63.75).
    pub light_min: f32,
    /// The clamped sector light level, verbatim.
    pub light_max: f32,
    pub light_sub: f32,
    pub light_coef: f32,
}

impl LightParams {
    /// Blend multiplier for a surface `dist` world units away (true ray
    /// distance, not perpendicular).
    ///
    /// The curve tables make this brightest for level 0 (a flat 0.75) and
    /// flattest for level 255 (pinned at 0.25 by its floor); mid levels get
    /// brighter with distance. Callers rescale it with the surface's own
    /// multiplier, so the table shape is kept as built.
    #[inline]
    pub fn light_mul_for_dist(&self, dist: f32) -> f32 {
        let floor = self.light_min / 255.0;
        let mul = self.light_coef - self.light_sub / dist.max(1.0);
        mul.max(floor).min(1.0)
    }

    /// Final wall multiplier: distance falloff scaled by the surface's own
    /// light multiplier, never below [`MIN_LIGHT_MUL`].
    #[inline]
    pub fn wall_light_mul(&self, dist: f32, surface_mul: f32) -> f32 {
        (self.light_mul_for_dist(dist) * surface_mul).max(MIN_LIGHT_MUL)
    }
}

impl ViewTables {
    /// Light curve for a sector light level; levels past the table clamp to
    /// its last entry.
    pub fn light_params(&self, light_level: u32, _is_floor: bool) -> LightParams {
        let level = (light_level as usize).min(LIGHT_LEVELS - 1);
        LightParams {
            light_min: self.light_mins[level],
            light_max: level as f32,
            light_sub: self.light_subs[level],
            light_coef: self.light_coefs[level],
        }
    }
}
