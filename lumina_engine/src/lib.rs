//! # Lumina Engine
//!
//! The acceleration, intersection and local shading core of an offline ray tracer.
//!
//! A [scene::Scene] owns a list of [object::geometry::Geometry] nodes and lights. World-space rays are
//! answered by [scene::Scene::intersect()], which traverses a lazily built bounding volume hierarchy
//! ([accel::bvh::Bvh]), and the resulting [shared::intersect::Intersection] can be shaded with
//! [material::Material::shade()].

pub mod accel;
pub mod core;
pub mod light;
pub mod material;
pub mod mesh;
pub mod object;
pub mod scene;
pub mod shared;
pub mod skybox;
pub mod texture;
