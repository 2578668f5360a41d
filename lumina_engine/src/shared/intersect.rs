use derivative::Derivative;

use crate::core::types::{Number, Point2, Vector3};
use crate::material::Material;
use crate::shared::ray::Ray;
use crate::shared::token::ObjectToken;

/// A ray-mesh intersection, in the mesh's local coordinate space
///
/// This is what primitives return from [crate::mesh::Mesh::local_intersect()], before the
/// [Geometry](crate::object::geometry::Geometry) maps it back into world-space and attaches a material
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshIntersection {
    /// Distance along the (local-space, normalised) ray that the intersection occurred
    pub dist: Number,
    /// Surface normal at intersection, in local space.
    ///
    /// # Invariants
    ///  - Must be normalised
    ///  - Cannot be zero/nan
    pub normal: Vector3,
    /// The UV coordinates for the point on the mesh's surface. Normally used for texture mapping.
    pub uv: Point2,
}

impl MeshIntersection {
    pub fn make_full<'s>(self, material: &'s Material) -> Intersection<'s> {
        Intersection {
            t: self.dist,
            normal: self.normal,
            uv: self.uv,
            material: Some(material),
            object: None,
        }
    }
}

/// A struct representing a ray-object intersection, in world space
#[derive(Clone, Debug, Derivative)]
#[derivative(PartialEq)]
pub struct Intersection<'s> {
    /// Distance along the world-space ray that the intersection occurred.
    ///
    /// Set to [Self::MISS_DIST] for records that describe a miss
    pub t: Number,
    /// World-space normal at the intersection, normalised
    pub normal: Vector3,
    pub uv: Point2,
    /// Material of the surface that was hit
    #[derivative(PartialEq = "ignore")]
    pub material: Option<&'s Material>,
    /// The object that was hit. Only set for intersections obtained through a [Scene](crate::scene::Scene)
    pub object: Option<ObjectToken>,
}

impl<'s> Intersection<'s> {
    /// Sentinel distance reported for rays that hit nothing
    pub const MISS_DIST: Number = 1000.;

    /// A record describing a miss
    pub fn miss() -> Self {
        Self {
            t: Self::MISS_DIST,
            normal: Vector3::ZERO,
            uv: Point2::ZERO,
            material: None,
            object: None,
        }
    }
}

impl Default for Intersection<'_> {
    fn default() -> Self { Self::miss() }
}

// region Collectors

/// Receives every ray query made through [Scene::intersect_with()](crate::scene::Scene::intersect_with),
/// together with its result. Used for debug visualisation of the rays that were traced
pub trait IntersectCollector {
    fn record(&mut self, ray: &Ray, intersection: &Intersection<'_>);
}

/// Collector that throws everything away
#[derive(Copy, Clone, Debug, Default)]
pub struct NoCollector;

impl IntersectCollector for NoCollector {
    fn record(&mut self, _ray: &Ray, _intersection: &Intersection<'_>) {}
}

/// An owned copy of the parts of an [Intersection] that a [VecCollector] keeps
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollectedIntersection {
    pub ray: Ray,
    pub t: Number,
    pub normal: Vector3,
    pub uv: Point2,
    pub object: Option<ObjectToken>,
}

impl CollectedIntersection {
    pub fn is_miss(&self) -> bool { self.object.is_none() && self.t == Intersection::MISS_DIST }
}

/// Collector that stores every query in order
#[derive(Clone, Debug, Default)]
pub struct VecCollector {
    pub records: Vec<CollectedIntersection>,
}

impl IntersectCollector for VecCollector {
    fn record(&mut self, ray: &Ray, intersection: &Intersection<'_>) {
        self.records.push(CollectedIntersection {
            ray: *ray,
            t: intersection.t,
            normal: intersection.normal,
            uv: intersection.uv,
            object: intersection.object,
        });
    }
}

// endregion Collectors
