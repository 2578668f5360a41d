//! Image textures, sampled by UV coordinate
//!
//! A [TextureMap] is an immutable grid of colours, shared between materials through an [Arc](std::sync::Arc).
//! Textures loaded from disk go through the [cache::TextureCache], so every material using the same file
//! shares the same map.

use derivative::Derivative;
use getset::CopyGetters;
use std::path::Path;
use thiserror::Error;

use crate::core::types::{Colour, Number, Point2};
use crate::shared::math::lerp;

pub mod cache;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("unable to load texture map '{file}'")]
    Decode {
        file: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture map '{file}' contains no pixels")]
    Empty { file: String },
}

#[derive(Clone, Derivative, CopyGetters)]
#[derivative(Debug, PartialEq)]
pub struct TextureMap {
    #[get_copy = "pub"]
    width: usize,
    #[get_copy = "pub"]
    height: usize,
    /// Pixels, row by row from the top-left, with channels in `[0, 1]`
    #[derivative(Debug = "ignore")]
    data: Vec<Colour>,
}

// region Constructors

impl TextureMap {
    /// Creates a texture from a buffer of pixels, stored row by row.
    ///
    /// Returns [None] if the image has no pixels, or the buffer doesn't match the dimensions
    pub fn from_colours(width: usize, height: usize, data: Vec<Colour>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Creates a texture from tightly packed 8-bit RGB triples
    pub fn from_rgb8(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        let data = bytes
            .chunks_exact(3)
            .map(|c| Colour::new(c[0] as Number, c[1] as Number, c[2] as Number) / 255.)
            .collect();
        Self::from_colours(width, height, data)
    }

    /// Converts a decoded image, discarding any alpha channel. [None] if the image is empty
    pub fn from_image(img: image::DynamicImage) -> Option<Self> {
        let img = img.into_rgb8();
        let (width, height) = (img.width() as usize, img.height() as usize);
        Self::from_rgb8(width, height, img.as_raw())
    }

    /// Loads and decodes an image file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let img = image::open(path).map_err(|source| TextureError::Decode {
            file: file.clone(),
            source,
        })?;
        Self::from_image(img).ok_or(TextureError::Empty { file })
    }
}

// endregion Constructors

// region Pixel Accessors

impl TextureMap {
    /// Reads a single pixel. Out of range coordinates are clamped to the edge of the image
    pub fn pixel_at(&self, x: isize, y: isize) -> Colour {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.data[y * self.width + x]
    }

    /// Bilinearly filtered lookup, with `(0, 0)` at the first pixel and `(1, 1)` at the last
    ///
    /// UVs outside `[0, 1]` clamp to the edge. `NaN` reads as `0`
    pub fn mapped_value(&self, uv: Point2) -> Colour {
        let x = texel_coord(uv.x, self.width);
        let y = texel_coord(uv.y, self.height);
        let (x0, y0) = (x.floor(), y.floor());
        let (dx, dy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as isize, y0 as isize);

        let c00 = self.pixel_at(x0, y0);
        let c10 = self.pixel_at(x0 + 1, y0);
        let c01 = self.pixel_at(x0, y0 + 1);
        let c11 = self.pixel_at(x0 + 1, y0 + 1);

        let top = lerp(c00, c10, dx);
        let bottom = lerp(c01, c11, dx);
        lerp(top, bottom, dy)
    }
}

/// Maps a texture coordinate into `[0, len - 1]` pixel space
fn texel_coord(t: Number, len: usize) -> Number {
    let max = (len - 1) as Number;
    if t.is_nan() {
        0.
    } else {
        (t * max).clamp(0., max)
    }
}

// endregion Pixel Accessors
