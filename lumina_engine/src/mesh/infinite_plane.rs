use crate::core::types::Point2;
use crate::mesh::square::intersect_z_plane;
use crate::mesh::Mesh;
use crate::shared::aabb::BoundingBox;
use crate::shared::intersect::MeshIntersection;
use crate::shared::ray::Ray;
use crate::shared::validate;

/// The whole `z = 0` plane. Has no bounding box, so it is never culled by a BVH
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InfinitePlaneMesh;

impl InfinitePlaneMesh {
    pub fn new() -> Self { Self }
}

impl Mesh for InfinitePlaneMesh {
    fn local_intersect(&self, ray: &Ray) -> Option<MeshIntersection> {
        let (dist, normal) = intersect_z_plane(ray)?;
        let p = ray.at(dist);
        // Repeat the texture once per unit square
        let uv = Point2::new(p.x.rem_euclid(1.), p.y.rem_euclid(1.));

        let intersection = MeshIntersection { dist, normal, uv };
        validate::mesh_intersection(&intersection);
        Some(intersection)
    }

    fn local_aabb(&self) -> Option<BoundingBox> { None }
}
