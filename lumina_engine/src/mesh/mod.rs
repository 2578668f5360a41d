//! # Module [crate::mesh]
//!
//! This module contains the submodules for different mesh (see [Mesh] and [MeshInstance]) types.
//!
//! Every mesh is defined in its own canonical local space (a unit sphere at the origin, a unit cube, etc).
//! Placement in the world is handled by the [Geometry](crate::object::geometry::Geometry) that owns the mesh,
//! which transforms rays into local space before calling [Mesh::local_intersect()].
//!
//! # DEV: Code Structure
//!
//! Meshes are placed into named submodules, which are publicly exported. Each mesh type
//! needs an entry in [MeshInstance] for static dispatch. Meshes with non-trivial construction
//! (see [trimesh]) are split into a builder and the built, immutable mesh.

use enum_dispatch::enum_dispatch;

use crate::shared::aabb::BoundingBox;
use crate::shared::intersect::MeshIntersection;
use crate::shared::ray::Ray;
use crate::shared::ComponentRequirements;
// noinspection ALL - Used by enum_dispatch macro
#[allow(unused_imports)]
use self::{
    axis_box::AxisBoxMesh, cylinder::CylinderMesh, infinite_plane::InfinitePlaneMesh, sphere::SphereMesh,
    square::SquareMesh, trimesh::TrimeshMesh,
};

pub mod axis_box;
pub mod cylinder;
pub mod infinite_plane;
pub mod sphere;
pub mod square;
pub mod trimesh;

// region Mesh traits

#[enum_dispatch]
pub trait Mesh: ComponentRequirements {
    /// Attempts to intersect the given local-space ray with the mesh
    ///
    /// # Return Value
    /// This should return the *first* intersection further along the ray than [RAY_EPSILON](crate::shared::RAY_EPSILON),
    /// else [None]. The distance is measured along the (normalised) local ray
    fn local_intersect(&self, ray: &Ray) -> Option<MeshIntersection>;

    /// The bounding box of the mesh in its local space, or [None] if the mesh is unbounded
    fn local_aabb(&self) -> Option<BoundingBox>;
}

/// An optimised implementation of [Mesh], using static dispatch over the closed set of primitives
#[enum_dispatch(Mesh)]
#[derive(Clone, Debug)]
pub enum MeshInstance {
    SphereMesh,
    AxisBoxMesh,
    SquareMesh,
    CylinderMesh,
    InfinitePlaneMesh,
    TrimeshMesh,
}

// endregion Mesh traits
