//! The scene: every object and light that can be rendered, plus the acceleration structure over the objects
//!
//! Objects are added with [Scene::add_object()], which hands back an [ObjectToken] that intersections refer to.
//! The tree over the objects is built on the first query after a change (or eagerly, with [Scene::build_bvh()]),
//! and after that the scene can be queried from any number of threads.

use getset::{CopyGetters, Getters};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::accel::bvh::Bvh;
use crate::core::targets::SCENE;
use crate::core::types::Colour;
use crate::light::LightInstance;
use crate::mesh::trimesh::{MeshError, TrimeshBuilder, TrimeshMesh};
use crate::object::geometry::Geometry;
use crate::shared::aabb::{Bounded, BoundingBox};
use crate::shared::intersect::{IntersectCollector, Intersection, NoCollector};
use crate::shared::ray::Ray;
use crate::shared::token::{LightToken, ObjectToken};
use crate::skybox::cube_map::CubeMap;
use crate::texture::cache::TextureCache;
use crate::texture::{TextureError, TextureMap};

use self::opts::SceneOpts;

pub mod opts;

#[derive(Debug, Getters, CopyGetters)]
pub struct Scene {
    #[get = "pub"]
    objects: Vec<Geometry>,
    #[get = "pub"]
    lights: Vec<LightInstance>,
    /// Lazily built tree over [Self::objects]. Unset whenever the objects change
    bvh: OnceCell<Bvh>,
    /// Union of the bounds of every bounded object
    #[get = "pub"]
    bounds: BoundingBox,
    /// Scene-wide ambient light intensity
    #[get_copy = "pub"]
    ambient: Colour,
    #[get = "pub"]
    cube_map: Option<CubeMap>,
    textures: TextureCache,
    #[get_copy = "pub"]
    opts: SceneOpts,
}

// region Constructors

impl Scene {
    pub fn new() -> Self { Self::with_opts(SceneOpts::default()) }

    pub fn with_opts(opts: SceneOpts) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            bvh: OnceCell::new(),
            bounds: BoundingBox::empty(),
            ambient: Colour::ZERO,
            cube_map: None,
            textures: TextureCache::new(),
            opts,
        }
    }
}

impl Default for Scene {
    fn default() -> Self { Self::new() }
}

// endregion Constructors

// region Building

impl Scene {
    /// Adds an object to the scene, returning the token that intersections with it will carry
    pub fn add_object(&mut self, object: Geometry) -> ObjectToken {
        let token = ObjectToken(self.objects.len());
        if let Some(aabb) = object.bounding_box() {
            self.bounds.merge(aabb);
        }
        trace!(target: SCENE, %token, bounded = object.bounding_box().is_some(), "added object");
        self.objects.push(object);
        self.invalidate_bvh();
        token
    }

    pub fn add_light(&mut self, light: impl Into<LightInstance>) -> LightToken {
        let token = LightToken(self.lights.len());
        self.lights.push(light.into());
        trace!(target: SCENE, %token, "added light");
        token
    }

    pub fn set_ambient(&mut self, ambient: impl Into<Colour>) { self.ambient = ambient.into(); }

    pub fn set_cube_map(&mut self, cube_map: Option<CubeMap>) { self.cube_map = cube_map; }

    /// Builds a triangle mesh with this scene's mesh tree options
    pub fn build_mesh(&self, builder: TrimeshBuilder) -> Result<TrimeshMesh, MeshError> {
        builder.build_with(self.opts.mesh_bvh)
    }

    /// Builds the tree over the objects, if it isn't already built.
    ///
    /// Queries do this automatically; calling this up front moves the cost out of the first query
    pub fn build_bvh(&self) -> &Bvh {
        self.bvh.get_or_init(|| {
            let bvh = Bvh::new(&self.objects, self.opts.scene_bvh);
            debug!(
                target: SCENE,
                objects = self.objects.len(),
                nodes = bvh.node_count(),
                depth = bvh.depth(),
                "built scene bvh"
            );
            bvh
        })
    }

    /// Throws away the tree, so the next query rebuilds it
    pub fn invalidate_bvh(&mut self) {
        if self.bvh.take().is_some() {
            trace!(target: SCENE, "invalidated scene bvh");
        }
    }

    /// Whether the tree is currently built
    pub fn has_bvh(&self) -> bool { self.bvh.get().is_some() }
}

// endregion Building

// region Queries

impl Scene {
    /// Finds the closest object hit by the world-space ray
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> { self.intersect_with(ray, &mut NoCollector) }

    /// Same as [Self::intersect()], but also hands the query and its result to the `collector`.
    /// Misses are reported with [Intersection::miss()]
    pub fn intersect_with(&self, ray: &Ray, collector: &mut dyn IntersectCollector) -> Option<Intersection<'_>> {
        let bvh = self.build_bvh();
        let hit = bvh.intersect(ray, |i| {
            let mut hit = self.objects[i].intersect(ray)?;
            hit.object = Some(ObjectToken(i));
            Some(hit)
        });

        match &hit {
            Some(hit) => collector.record(ray, hit),
            None => collector.record(ray, &Intersection::miss()),
        }
        hit
    }

    /// Colour of the environment seen by a ray that missed everything
    pub fn background(&self, ray: &Ray) -> Colour {
        match &self.cube_map {
            Some(map) => map.colour(ray),
            None => Colour::ZERO,
        }
    }

    pub fn object(&self, token: ObjectToken) -> Option<&Geometry> { self.objects.get(token.0) }

    pub fn light(&self, token: LightToken) -> Option<&LightInstance> { self.lights.get(token.0) }
}

// endregion Queries

// region Textures

impl Scene {
    /// Gets a texture by filename, loading it the first time it's asked for
    pub fn get_texture(&self, name: &str) -> Result<Arc<TextureMap>, TextureError> { self.textures.get_or_load(name) }

    /// Registers an in-memory texture, so that [Self::get_texture()] returns it for `name`
    pub fn insert_texture(&self, name: impl Into<String>, map: TextureMap) -> Arc<TextureMap> {
        self.textures.insert(name, map)
    }
}

// endregion Textures

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Point3, Transform3, Vector3};
    use crate::material::Material;
    use crate::mesh::infinite_plane::InfinitePlaneMesh;
    use crate::mesh::sphere::SphereMesh;
    use crate::shared::intersect::VecCollector;
    use approx::assert_relative_eq;

    fn sphere_at(z: f64) -> Geometry {
        Geometry::new(SphereMesh, Material::default(), Transform3::from_translation(Vector3::new(0., 0., z)))
    }

    #[test]
    fn empty_scene_misses() {
        let scene = Scene::new();
        assert!(scene.intersect(&Ray::new(Point3::ZERO, Vector3::Z)).is_none());
        assert!(scene.bounds().is_empty());
    }

    #[test]
    fn closest_object_wins() {
        let mut scene = Scene::new();
        let far = scene.add_object(sphere_at(20.));
        let near = scene.add_object(sphere_at(10.));
        let hit = scene.intersect(&Ray::new(Point3::ZERO, Vector3::Z)).unwrap();
        assert_eq!(hit.object, Some(near));
        assert_relative_eq!(hit.t, 9.);
        assert_ne!(hit.object, Some(far));
        assert!(hit.material.is_some());
    }

    #[test]
    fn adding_invalidates_tree() {
        let mut scene = Scene::new();
        scene.add_object(sphere_at(20.));
        scene.build_bvh();
        assert!(scene.has_bvh());

        let near = scene.add_object(sphere_at(5.));
        assert!(!scene.has_bvh());
        let hit = scene.intersect(&Ray::new(Point3::ZERO, Vector3::Z)).unwrap();
        assert_eq!(hit.object, Some(near));
    }

    #[test]
    fn bounds_grow_with_bounded_objects() {
        let mut scene = Scene::new();
        scene.add_object(sphere_at(10.));
        scene.add_object(Geometry::untransformed(InfinitePlaneMesh, Material::default()));
        assert_relative_eq!(scene.bounds().min(), Point3::new(-1., -1., 9.));
        assert_relative_eq!(scene.bounds().max(), Point3::new(1., 1., 11.));
    }

    #[test]
    fn collector_records_hits_and_misses() {
        let mut scene = Scene::new();
        let token = scene.add_object(sphere_at(10.));
        let mut collector = VecCollector::default();

        scene.intersect_with(&Ray::new(Point3::ZERO, Vector3::Z), &mut collector);
        scene.intersect_with(&Ray::new(Point3::ZERO, Vector3::NEG_Z), &mut collector);

        assert_eq!(collector.records.len(), 2);
        assert_eq!(collector.records[0].object, Some(token));
        assert!(!collector.records[0].is_miss());
        assert!(collector.records[1].is_miss());
        assert_eq!(collector.records[1].t, Intersection::MISS_DIST);
    }

    #[test]
    fn tokens_resolve() {
        let mut scene = Scene::new();
        let token = scene.add_object(sphere_at(0.));
        assert!(scene.object(token).is_some());
        assert!(scene.object(ObjectToken(7)).is_none());
    }
}
