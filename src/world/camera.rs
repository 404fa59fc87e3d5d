use glam::{Vec2, Vec3, vec2};

use crate::defs::tables::{Angle, angle_to_radians, radians_to_angle};

/// Player view-point snapshot taken once per frame.
///
/// * Only **yaw** is simulated, Doom never tilts up/down.
/// * `pos.z` is the absolute eye height; wall heights handed to the
///   rasterizer are already relative to it.
/// * The yaw is kept as a binary angle so the sky lookup wraps for free.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec3,
    angle: Angle,
}

impl Camera {
    /// Camera at `pos` facing `yaw` radians (0 = east, counter-clockwise).
    pub fn new(pos: Vec3, yaw: f32) -> Self {
        Self {
            pos,
            angle: radians_to_angle(yaw),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    /// View yaw as a binary angle.
    #[inline]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        angle_to_radians(self.angle)
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw().sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector pointing to the camera's left (positive view angles).
    #[inline(always)]
    pub fn left(&self) -> Vec2 {
        self.forward().perp()
    }

    /// Map point → view space: `.x` = depth along forward, `.y` = lateral
    /// offset, positive to the left.
    #[inline]
    pub fn to_view(&self, p: Vec2) -> Vec2 {
        let d = p - self.pos.truncate();
        vec2(d.dot(self.forward()), d.dot(self.left()))
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe right), preserving eye-height.
    pub fn step(&mut self, forward: f32, side: f32) {
        let f = self.forward();
        let l = self.left();
        self.pos.x += f.x * forward - l.x * side;
        self.pos.y += f.y * forward - l.y * side;
    }

    /// Rotate around Z-axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.angle = self.angle.wrapping_add(radians_to_angle(delta_yaw));
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
