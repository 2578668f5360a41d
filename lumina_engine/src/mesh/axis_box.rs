use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::mesh::Mesh;
use crate::shared::aabb::BoundingBox;
use crate::shared::intersect::MeshIntersection;
use crate::shared::ray::Ray;
use crate::shared::{validate, RAY_EPSILON};

/// The unit cube, spanning `[-0.5, 0.5]` on every axis
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AxisBoxMesh;

impl AxisBoxMesh {
    pub fn new() -> Self { Self }

    fn unit_box() -> BoundingBox { BoundingBox::new(Point3::splat(-0.5), Point3::splat(0.5)) }
}

impl Mesh for AxisBoxMesh {
    fn local_intersect(&self, ray: &Ray) -> Option<MeshIntersection> {
        let (t_min, t_max) = Self::unit_box().intersect(ray)?;

        // Entry point if it's in front of us, otherwise we started inside and take the exit
        let dist = if t_min > RAY_EPSILON {
            t_min
        } else if t_max > RAY_EPSILON {
            t_max
        } else {
            return None;
        };

        let p = ray.at(dist);
        // The face we hit is the axis where the point is furthest from the centre
        let abs = p.abs();
        let axis = if abs.x >= abs.y && abs.x >= abs.z {
            0
        } else if abs.y >= abs.z {
            1
        } else {
            2
        };

        let mut normal = Vector3::ZERO;
        normal[axis] = Number::signum(p[axis]);
        // Remaining two axes, in cyclic order, map from [-0.5, 0.5] to [0, 1]
        let uv = Point2::new(p[(axis + 1) % 3], p[(axis + 2) % 3]) + Point2::splat(0.5);

        let intersection = MeshIntersection { dist, normal, uv };
        validate::mesh_intersection(&intersection);
        Some(intersection)
    }

    fn local_aabb(&self) -> Option<BoundingBox> { Some(Self::unit_box()) }
}
