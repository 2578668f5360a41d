use getset::CopyGetters;
use strum_macros::{Display, EnumIter};

use crate::core::types::{Number, Point3, Vector3};

/// What a ray is being cast for. Only informational, the intersection code treats all kinds identically
#[derive(Copy, Clone, Debug, Default, Display, EnumIter, Hash, Eq, PartialEq)]
pub enum RayKind {
    /// Primary rays, from the camera
    #[default]
    Visibility,
    Reflection,
    Refraction,
    /// Rays cast towards a light to find occluders
    Shadow,
}

#[derive(Copy, Clone, PartialEq, Debug, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Ray {
    /// World-space coordinate of the ray
    pos: Point3,
    /// Direction vector of the ray.
    ///
    /// # Requirements
    /// Must be normalised
    dir: Vector3,
    /// Component-wise reciprocal of [Self::dir()]. Axes with a zero direction become infinite
    inv_dir: Vector3,
    kind: RayKind,
}

impl Ray {
    /// Creates a new [RayKind::Visibility] ray, normalising the direction vector.
    ///
    /// A zero direction stays zero, and such a ray will not hit anything
    pub fn new(pos: impl Into<Point3>, dir: impl Into<Vector3>) -> Self { Self::new_kind(pos, dir, RayKind::default()) }

    pub fn new_kind(pos: impl Into<Point3>, dir: impl Into<Vector3>, kind: RayKind) -> Self {
        let dir = dir.into().normalize_or_zero();
        Self {
            pos: pos.into(),
            dir,
            inv_dir: dir.recip(),
            kind,
        }
    }

    /// Gets the position at a given distance along the ray
    ///
    /// `pos + (t * dir)`
    pub fn at(&self, t: Number) -> Point3 { self.pos + (self.dir * t) }
}
