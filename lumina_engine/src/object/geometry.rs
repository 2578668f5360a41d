use getset::Getters;

use crate::material::Material;
use crate::mesh::{Mesh, MeshInstance};
use crate::object::transform::ObjectTransform;
use crate::shared::aabb::{Bounded, BoundingBox};
use crate::shared::intersect::Intersection;
use crate::shared::ray::Ray;
use crate::shared::validate;

/// A renderable object in a scene: a mesh, placed in the world with a transform, with a material
///
/// The world-space bounding box is computed once on creation, by transforming the mesh's local box.
/// Unbounded meshes produce unbounded geometry.
#[derive(Clone, Debug, Getters)]
#[get = "pub"]
pub struct Geometry {
    mesh: MeshInstance,
    material: Material,
    transform: ObjectTransform,
    aabb: Option<BoundingBox>,
}

// region Constructors

impl Geometry {
    pub fn new(mesh: impl Into<MeshInstance>, material: Material, transform: impl Into<ObjectTransform>) -> Self {
        let (mesh, transform) = (mesh.into(), transform.into());
        let aabb = mesh
            .local_aabb()
            .map(|local| local.transformed(&transform.transform()));
        Self {
            mesh,
            material,
            transform,
            aabb,
        }
    }

    /// Creates a geometry object that sits at the mesh's own local coordinates
    pub fn untransformed(mesh: impl Into<MeshInstance>, material: Material) -> Self {
        Self::new(mesh, material, ObjectTransform::IDENTITY)
    }
}

// endregion Constructors

impl Geometry {
    /// Intersects a world-space ray with this object
    ///
    /// The returned intersection is in world-space, and has no [Intersection::object] set.
    /// That is filled in by the scene, which knows this object's token
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        if let Some(aabb) = &self.aabb {
            if !aabb.hit(ray) {
                return None;
            }
        }

        let (local_ray, length) = self.transform.incoming_ray(ray)?;
        let local = self.mesh.local_intersect(&local_ray)?;

        let mut intersection = local.make_full(&self.material);
        intersection.t = local.dist / length;
        intersection.normal = self.transform.outgoing_normal(local.normal);

        validate::number(intersection.t);
        validate::normal3(intersection.normal);
        Some(intersection)
    }
}

impl Bounded for Geometry {
    fn bounding_box(&self) -> Option<&BoundingBox> { self.aabb.as_ref() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Number, Point3, Transform3, Vector3};
    use crate::mesh::infinite_plane::InfinitePlaneMesh;
    use crate::mesh::sphere::SphereMesh;
    use approx::assert_relative_eq;
    use glam::DQuat;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn translated_scaled_sphere() {
        let transform = Transform3::from_scale_rotation_translation(
            Vector3::splat(2.),
            DQuat::IDENTITY,
            Vector3::new(0., 0., 10.),
        );
        let sphere = Geometry::new(SphereMesh, Material::default(), transform);
        let hit = sphere
            .intersect(&Ray::new(Point3::ZERO, Vector3::Z))
            .expect("should hit sphere");
        assert_relative_eq!(hit.t, 8., epsilon = 1e-12);
        assert_relative_eq!(hit.normal, Vector3::NEG_Z, epsilon = 1e-12);

        let aabb = sphere.aabb().as_ref().unwrap();
        assert_relative_eq!(aabb.min(), Point3::new(-2., -2., 8.));
        assert_relative_eq!(aabb.max(), Point3::new(2., 2., 12.));
    }

    #[test]
    fn does_not_modify_world_ray() {
        let transform = Transform3::from_scale(Vector3::splat(3.));
        let sphere = Geometry::new(SphereMesh, Material::default(), transform);
        let ray = Ray::new((0., 0., -10.), Vector3::Z);
        let copy = ray;
        let _ = sphere.intersect(&ray);
        assert_eq!(ray, copy);
    }

    #[test]
    fn unbounded_plane_has_no_aabb() {
        let plane = Geometry::untransformed(InfinitePlaneMesh, Material::default());
        assert!(plane.bounding_box().is_none());
        assert!(plane.intersect(&Ray::new((50., 50., 1.), Vector3::NEG_Z)).is_some());
    }

    #[test]
    fn world_hit_point_round_trips() {
        let mut rng = SmallRng::seed_from_u64(0x7A45);
        for _ in 0..100 {
            let scale = Vector3::new(rng.gen_range(0.2..5.), rng.gen_range(0.2..5.), rng.gen_range(0.2..5.));
            let rotation = DQuat::from_euler(
                glam::EulerRot::XYZ,
                rng.gen_range(-3.0..3.),
                rng.gen_range(-3.0..3.),
                rng.gen_range(-3.0..3.),
            );
            let translation = Vector3::new(rng.gen_range(-10.0..10.), rng.gen_range(-10.0..10.), rng.gen_range(-10.0..10.));
            let transform = Transform3::from_scale_rotation_translation(scale, rotation, translation);
            let sphere = Geometry::new(SphereMesh, Material::default(), transform);

            // Aim at the world-space image of the sphere's centre from far outside
            let origin = translation + Vector3::new(50., 40., 30.);
            let ray = Ray::new(origin, translation - origin);
            let hit = sphere.intersect(&ray).expect("ray through centre must hit");

            // The hit point, mapped back into local space, lies on the unit sphere
            let world = ray.at(hit.t);
            let local = transform.inverse().transform_point3(world);
            assert_relative_eq!(local.length(), 1., epsilon = 1e-9);
            assert!(hit.t > 0. && hit.t < (translation - origin).length());

            // Normal is perpendicular to the surface: stays perpendicular to a tangent mapped through the transform
            let local_normal = local.normalize();
            let tangent = local_normal.any_orthonormal_vector();
            let world_tangent = transform.transform_vector3(tangent);
            let dot: Number = hit.normal.dot(world_tangent);
            assert_relative_eq!(dot, 0., epsilon = 1e-9);
        }
    }
}
