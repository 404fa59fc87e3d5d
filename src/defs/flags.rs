use bitflags::bitflags;

bitflags! {
    /// What the clip/plane pass and the wall pass have to do for one visible
    /// wall. Filled in by the BSP stage when it emits the wall.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WallActions: u16 {
        // Register the floor below the wall as a visplane span.
        const ADD_FLOOR      = 0x0001;
        // Register the ceiling above the wall as a visplane span.
        const ADD_CEILING    = 0x0002;
        // Draw the upper (or, for one-sided walls, the whole) texture.
        const TOP_TEXTURE    = 0x0004;
        // Draw the lower texture.
        const BOTTOM_TEXTURE = 0x0008;
        // Lower the ceiling clip to the new ceiling height.
        const NEW_CEILING    = 0x0010;
        // Raise the floor clip to the new floor height.
        const NEW_FLOOR      = 0x0020;
        // Paint sky above the wall during the clip pass.
        const ADD_SKY        = 0x0040;
        // Record the top silhouette for sprite clipping.
        const TOP_SIL        = 0x0080;
        // Record the bottom silhouette for sprite clipping.
        const BOTTOM_SIL     = 0x0100;

        const SOLID_SIL      = Self::TOP_SIL.bits() | Self::BOTTOM_SIL.bits();
    }
}

bitflags! {
    /// How the column blitter samples and shades a column.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BlitFlags: u8 {
        // Advance the texel Y coordinate by `tex_y_step` per pixel.
        const STEP_Y         = 0x01;
        // Wrap the texel Y coordinate around the texture height.
        const V_WRAP         = 0x02;
        // Multiply each sampled channel by `color_mul`.
        const COLOR_MULT_RGB = 0x04;
    }
}
