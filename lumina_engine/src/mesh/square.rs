use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::mesh::Mesh;
use crate::shared::aabb::BoundingBox;
use crate::shared::intersect::MeshIntersection;
use crate::shared::ray::Ray;
use crate::shared::{validate, RAY_EPSILON};

/// The unit square on the `z = 0` plane, spanning `[-0.5, 0.5]` in `x` and `y`
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SquareMesh;

impl SquareMesh {
    pub fn new() -> Self { Self }
}

/// Intersects the ray with the `z = 0` plane, returning the distance and the normal facing back at the ray
pub(crate) fn intersect_z_plane(ray: &Ray) -> Option<(Number, Vector3)> {
    let (pos, dir) = (ray.pos(), ray.dir());
    if dir.z == 0. {
        return None;
    }
    let dist = -pos.z / dir.z;
    if dist <= RAY_EPSILON {
        return None;
    }
    let normal = if dir.z > 0. { Vector3::NEG_Z } else { Vector3::Z };
    Some((dist, normal))
}

impl Mesh for SquareMesh {
    fn local_intersect(&self, ray: &Ray) -> Option<MeshIntersection> {
        let (dist, normal) = intersect_z_plane(ray)?;
        let p = ray.at(dist);
        if p.x.abs() > 0.5 || p.y.abs() > 0.5 {
            return None;
        }

        let intersection = MeshIntersection {
            dist,
            normal,
            uv: Point2::new(p.x + 0.5, p.y + 0.5),
        };
        validate::mesh_intersection(&intersection);
        Some(intersection)
    }

    fn local_aabb(&self) -> Option<BoundingBox> {
        Some(BoundingBox::new(Point3::new(-0.5, -0.5, 0.), Point3::new(0.5, 0.5, 0.)))
    }
}
