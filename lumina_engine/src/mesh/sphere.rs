use std::f64::consts::{PI, TAU};

use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::mesh::Mesh;
use crate::shared::aabb::BoundingBox;
use crate::shared::intersect::MeshIntersection;
use crate::shared::ray::Ray;
use crate::shared::{validate, RAY_EPSILON};

/// The canonical sphere: centred at the origin with radius `1`
///
/// Use a transform on the owning geometry to move, scale or squash it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SphereMesh;

impl SphereMesh {
    pub fn new() -> Self { Self }
}

impl Mesh for SphereMesh {
    fn local_intersect(&self, ray: &Ray) -> Option<MeshIntersection> {
        let (pos, dir) = (ray.pos(), ray.dir());

        let b = Vector3::dot(-pos, dir);
        let discriminant = (b * b) - Vector3::dot(pos, pos) + 1.;
        if discriminant < 0. {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        // Far root first: if that's behind us then so is the near one
        let t2 = b + sqrt_d;
        if t2 <= RAY_EPSILON {
            return None;
        }
        let t1 = b - sqrt_d;
        let dist = if t1 > RAY_EPSILON { t1 } else { t2 };

        let normal = ray.at(dist).normalize();
        let intersection = MeshIntersection {
            dist,
            normal,
            uv: sphere_uv(normal),
        };
        validate::mesh_intersection(&intersection);
        Some(intersection)
    }

    fn local_aabb(&self) -> Option<BoundingBox> { Some(BoundingBox::new(Point3::NEG_ONE, Point3::ONE)) }
}

/// Converts a point on the unit sphere into a UV coordinate
///
/// The `u` seam sits where `atan2` wraps, on the negative X axis.
pub fn sphere_uv(n: Vector3) -> Point2 {
    let u = 0.5 + Number::atan2(n.z, n.x) / TAU;
    let v = 0.5 + Number::asin(n.y.clamp(-1., 1.)) / PI;
    Point2::new(u, v)
}
