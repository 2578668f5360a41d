//! This module contains utility functions for helping with object transformations
//!
//! # Terminology
//!
//! ## Transform
//! The object's 3D affine transform matrix (see [Transform3]). This represents the transformation from
//! mesh-space to world-space; e.g. a [Transform3::from_scale()] with a scale of `Vector3::splat(2.)`,
//! would cause the mesh to appear twice as large.
//!
//! ## Inverse Transform
//! The matrix inverse of `transform`. This is the matrix corresponding to the transformation from
//! world-space to mesh-space

use getset::CopyGetters;

use crate::core::types::{Matrix3, Number, Transform3, Vector3};
use crate::shared::ray::Ray;

/// A struct that holds a [Transform3], it's inverse, and the matrix used to carry normals back out to world space.
///
/// # Requirements
/// The transform must be invertible
#[derive(Copy, Clone, Debug, PartialEq, CopyGetters)]
#[get_copy = "pub"]
pub struct ObjectTransform {
    transform: Transform3,
    inv_transform: Transform3,
    /// Inverse-transpose of the linear part of the transform
    normal_matrix: Matrix3,
}

impl ObjectTransform {
    pub const IDENTITY: Self = Self {
        transform: Transform3::IDENTITY,
        inv_transform: Transform3::IDENTITY,
        normal_matrix: Matrix3::IDENTITY,
    };

    pub fn new(transform: Transform3) -> Self {
        let inv_transform = transform.inverse();
        Self {
            transform,
            inv_transform,
            normal_matrix: inv_transform.matrix3.transpose(),
        }
    }
}

impl Default for ObjectTransform {
    fn default() -> Self { Self::IDENTITY }
}

impl From<Transform3> for ObjectTransform {
    fn from(value: Transform3) -> Self { Self::new(value) }
}

impl ObjectTransform {
    /// Transforms the incoming ray from world-space to mesh-space, using the inverse transform
    ///
    /// # Return Value
    /// The local ray, and the length that the world-space direction was scaled to on the way in. Local distances
    /// must be divided by this length to get world-space distances.
    /// Returns [None] if the direction collapsed to zero, which can't hit anything
    pub fn incoming_ray(&self, ray: &Ray) -> Option<(Ray, Number)> {
        let pos = self.inv_transform.transform_point3(ray.pos());
        let end = self.inv_transform.transform_point3(ray.pos() + ray.dir());
        let dir = end - pos;
        let length = dir.length();

        // Also catches NaN
        if !(length > 0.) {
            return None;
        }
        Some((Ray::new_kind(pos, dir / length, ray.kind()), length))
    }

    /// Transforms a mesh-space surface normal into world-space, renormalising it
    pub fn outgoing_normal(&self, normal: Vector3) -> Vector3 { (self.normal_matrix * normal).normalize_or_zero() }
}
