use getset::CopyGetters;
use std::f64::consts::TAU;

use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::mesh::Mesh;
use crate::shared::aabb::BoundingBox;
use crate::shared::intersect::MeshIntersection;
use crate::shared::ray::Ray;
use crate::shared::{validate, RAY_EPSILON};

/// A cylinder of radius `1` around the Z axis, spanning `z` in `[0, 1]`
///
/// When `capped`, the discs at either end are solid. Otherwise the cylinder is an open tube
#[derive(Copy, Clone, Debug, PartialEq, CopyGetters)]
#[get_copy = "pub"]
pub struct CylinderMesh {
    capped: bool,
}

impl CylinderMesh {
    pub fn new(capped: bool) -> Self { Self { capped } }

    /// Intersection with the curved side of the cylinder
    fn side_intersect(ray: &Ray) -> Option<MeshIntersection> {
        let (pos, dir) = (ray.pos(), ray.dir());

        let a = dir.x * dir.x + dir.y * dir.y;
        // Parallel to the axis, the side can't be hit
        if a == 0. {
            return None;
        }
        let b = 2. * (pos.x * dir.x + pos.y * dir.y);
        let c = pos.x * pos.x + pos.y * pos.y - 1.;
        let discriminant = (b * b) - (4. * a * c);
        if discriminant < 0. {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let roots = [(-b - sqrt_d) / (2. * a), (-b + sqrt_d) / (2. * a)];
        roots.into_iter().find_map(|dist| {
            if dist <= RAY_EPSILON {
                return None;
            }
            let p = ray.at(dist);
            if !(0. ..=1.).contains(&p.z) {
                return None;
            }
            let normal = Vector3::new(p.x, p.y, 0.).normalize();
            let u = 0.5 + Number::atan2(p.y, p.x) / TAU;
            Some(MeshIntersection {
                dist,
                normal,
                uv: Point2::new(u, p.z),
            })
        })
    }

    /// Intersection with the closest end cap
    fn cap_intersect(ray: &Ray) -> Option<MeshIntersection> {
        let (pos, dir) = (ray.pos(), ray.dir());
        if dir.z == 0. {
            return None;
        }

        [(0., Vector3::NEG_Z), (1., Vector3::Z)]
            .into_iter()
            .filter_map(|(z, normal)| {
                let dist = (z - pos.z) / dir.z;
                if dist <= RAY_EPSILON {
                    return None;
                }
                let p = ray.at(dist);
                if p.x * p.x + p.y * p.y > 1. {
                    return None;
                }
                Some(MeshIntersection {
                    dist,
                    normal,
                    uv: Point2::new((p.x + 1.) / 2., (p.y + 1.) / 2.),
                })
            })
            .min_by(|a, b| Number::total_cmp(&a.dist, &b.dist))
    }
}

impl Default for CylinderMesh {
    fn default() -> Self { Self::new(true) }
}

impl Mesh for CylinderMesh {
    fn local_intersect(&self, ray: &Ray) -> Option<MeshIntersection> {
        let side = Self::side_intersect(ray);
        let cap = if self.capped { Self::cap_intersect(ray) } else { None };

        let closest = match (side, cap) {
            (Some(s), Some(c)) => Some(if c.dist < s.dist { c } else { s }),
            (s, None) => s,
            (None, c) => c,
        };
        if let Some(i) = &closest {
            validate::mesh_intersection(i);
        }
        closest
    }

    fn local_aabb(&self) -> Option<BoundingBox> { Some(BoundingBox::new(Point3::new(-1., -1., 0.), Point3::ONE)) }
}
