//! Wall, flat and sky pixels, addressed by small integer handles.

use std::collections::HashMap;

use crate::renderer::Rgba;

/// Handle into a [`TextureBank`]; stable for the bank's lifetime.
pub type TextureId = u16;

/// The checkerboard every bank starts with, drawn for unknown handles.
pub const NO_TEXTURE: TextureId = 0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("a texture named `{0}` is already loaded")]
    Duplicate(String),

    #[error("no texture with id {0}")]
    BadId(TextureId),

    #[error("texture `{name}` is {w}x{h} but carries {len} pixels")]
    BadSize {
        name: String,
        w: usize,
        h: usize,
        len: usize,
    },
}

/// Row-major 0xAARRGGBB texels.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

impl Texture {
    /// Checked constructor: both sides non-zero and exactly `w * h` pixels.
    pub fn new(
        name: impl Into<String>,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if w == 0 || h == 0 || pixels.len() != w * h {
            return Err(TextureError::BadSize {
                name,
                w,
                h,
                len: pixels.len(),
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.w + x]
    }
}

impl Default for Texture {
    /// 8x8 grey checkerboard.
    fn default() -> Self {
        let pixels = (0..64)
            .map(|i| {
                let (x, y) = (i % 8, i / 8);
                if (x + y) % 2 == 0 { 0xFF_A0A0A0 } else { 0xFF_404040 }
            })
            .collect();
        Self {
            name: "CHECKER".into(),
            w: 8,
            h: 8,
            pixels,
        }
    }
}

/// Every texture of a level, each stored once under a unique name.
pub struct TextureBank {
    textures: Vec<Texture>,
    ids: HashMap<String, TextureId>,
}

impl TextureBank {
    /// A bank holding only `missing` as [`NO_TEXTURE`].
    pub fn new(missing: Texture) -> Self {
        Self {
            ids: HashMap::from([(missing.name.clone(), NO_TEXTURE)]),
            textures: vec![missing],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Count, fallback included.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Nothing loaded besides the fallback.
    pub fn is_empty(&self) -> bool {
        self.textures.len() <= 1
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.ids.get(name).copied()
    }

    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.textures
            .get(id as usize)
            .ok_or(TextureError::BadId(id))
    }

    /// Unknown handles draw the fallback instead of failing the frame.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        match self.textures.get(id as usize) {
            Some(tex) => tex,
            None => &self.textures[NO_TEXTURE as usize],
        }
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.ids.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.textures.len() as TextureId;
        self.ids.insert(name, id);
        self.textures.push(tex);
        Ok(id)
    }
}
