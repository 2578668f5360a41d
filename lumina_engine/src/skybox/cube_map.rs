use std::sync::Arc;
use strum_macros::{Display, EnumIter};

use crate::core::types::{Colour, Number, Point2, Vector3};
use crate::shared::ray::Ray;
use crate::texture::TextureMap;

/// One face of a [CubeMap], in storage order
#[derive(Copy, Clone, Debug, Display, EnumIter, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub fn index(self) -> usize { self as usize }
}

/// An environment map made of six textures, one per face of a cube around the scene
///
/// Rays that escape the scene pick up the colour of the face in the direction they are heading.
/// Faces without a texture are black
#[derive(Clone, Debug, Default)]
pub struct CubeMap {
    faces: [Option<Arc<TextureMap>>; 6],
}

impl CubeMap {
    pub fn new() -> Self { Self::default() }

    pub fn set_face(&mut self, face: CubeFace, map: impl Into<Arc<TextureMap>>) {
        self.faces[face.index()] = Some(map.into());
    }

    pub fn face(&self, face: CubeFace) -> Option<&Arc<TextureMap>> { self.faces[face.index()].as_ref() }

    /// Maps a direction onto the face it points at, and the UV coordinate on that face
    ///
    /// Returns [None] for a zero direction
    pub fn project(dir: Vector3) -> Option<(CubeFace, Point2)> {
        let abs = dir.abs();
        let (face, u, v, max): (CubeFace, Number, Number, Number) = if abs.x >= abs.y && abs.x >= abs.z {
            if dir.x > 0. {
                (CubeFace::PosX, -dir.z, dir.y, abs.x)
            } else {
                (CubeFace::NegX, dir.z, dir.y, abs.x)
            }
        } else if abs.y >= abs.z {
            if dir.y > 0. {
                (CubeFace::PosY, dir.x, -dir.z, abs.y)
            } else {
                (CubeFace::NegY, dir.x, dir.z, abs.y)
            }
        } else if dir.z > 0. {
            (CubeFace::PosZ, dir.x, dir.y, abs.z)
        } else {
            (CubeFace::NegZ, -dir.x, dir.y, abs.z)
        };

        if !(max > 0.) {
            return None;
        }
        let uv = Point2::new(0.5 * (u / max + 1.), 0.5 * (v / max + 1.));
        Some((face, uv))
    }

    /// Environment colour seen by the ray
    pub fn colour(&self, ray: &Ray) -> Colour {
        let Some((face, uv)) = Self::project(ray.dir()) else {
            return Colour::ZERO;
        };
        match self.face(face) {
            Some(map) => map.mapped_value(uv),
            None => Colour::ZERO,
        }
    }
}
