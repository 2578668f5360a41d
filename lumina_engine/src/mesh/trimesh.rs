//! Triangle meshes, accelerated with their own [Bvh] over the faces
//!
//! Meshes are assembled with a [TrimeshBuilder], which validates the face indices as they are added,
//! and then built into an immutable [TrimeshMesh].

use derivative::Derivative;
use getset::{CopyGetters, Getters};
use thiserror::Error;
use tracing::debug;

use crate::accel::bvh::{Bvh, BvhOpts};
use crate::core::targets::MESH;
use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::mesh::Mesh;
use crate::shared::aabb::{Bounded, BoundingBox};
use crate::shared::intersect::MeshIntersection;
use crate::shared::ray::Ray;
use crate::shared::{validate, RAY_EPSILON};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, but the mesh only has {count} vertices")]
    InvalidIndex { face: usize, index: usize, count: usize },
    #[error("face {face} is degenerate (zero area)")]
    DegenerateFace { face: usize },
    #[error("mesh has {normals} normals for {vertices} vertices")]
    MismatchedNormals { normals: usize, vertices: usize },
    #[error("mesh has {uvs} uv coordinates for {vertices} vertices")]
    MismatchedUvs { uvs: usize, vertices: usize },
}

// region Builder

/// Assembles the vertex data for a [TrimeshMesh]
///
/// Normals and UVs are optional, but if any are given there must be exactly one per vertex by the time
/// the mesh is built.
#[derive(Clone, Debug, Default)]
pub struct TrimeshBuilder {
    pub vertices: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub uvs: Vec<Point2>,
    faces: Vec<[usize; 3]>,
}

impl TrimeshBuilder {
    pub fn new() -> Self { Self::default() }

    /// Adds a vertex, returning its index
    pub fn add_vertex(&mut self, v: impl Into<Point3>) -> usize {
        self.vertices.push(v.into());
        self.vertices.len() - 1
    }

    /// Adds a per-vertex normal. Normals correspond to vertices by index
    pub fn add_normal(&mut self, n: impl Into<Vector3>) { self.normals.push(n.into().normalize_or_zero()); }

    /// Adds a per-vertex UV coordinate. UVs correspond to vertices by index
    pub fn add_uv(&mut self, uv: impl Into<Point2>) { self.uvs.push(uv.into()); }

    /// Adds a triangular face over three existing vertices, returning the face index
    pub fn add_face(&mut self, a: usize, b: usize, c: usize) -> Result<usize, MeshError> {
        let face = self.faces.len();
        let count = self.vertices.len();
        if let Some(&index) = [a, b, c].iter().find(|&&i| i >= count) {
            return Err(MeshError::InvalidIndex { face, index, count });
        }

        let [va, vb, vc] = [a, b, c].map(|i| self.vertices[i]);
        if Vector3::cross(vb - va, vc - va).length() < RAY_EPSILON {
            return Err(MeshError::DegenerateFace { face });
        }

        self.faces.push([a, b, c]);
        Ok(face)
    }

    pub fn faces(&self) -> &[[usize; 3]] { &self.faces }

    /// Replaces any existing normals with smooth per-vertex normals, averaged from
    /// the (area weighted) normals of the faces around each vertex
    pub fn generate_normals(&mut self) {
        let mut normals = vec![Vector3::ZERO; self.vertices.len()];
        for &[a, b, c] in &self.faces {
            let [va, vb, vc] = [a, b, c].map(|i| self.vertices[i]);
            let face_normal = Vector3::cross(vb - va, vc - va);
            for i in [a, b, c] {
                normals[i] += face_normal;
            }
        }
        self.normals = normals.into_iter().map(Vector3::normalize_or_zero).collect();
    }

    /// Builds the mesh with the default tree options for meshes
    pub fn build(self) -> Result<TrimeshMesh, MeshError> { self.build_with(BvhOpts::MESH) }

    pub fn build_with(self, opts: BvhOpts) -> Result<TrimeshMesh, MeshError> {
        puffin::profile_function!();

        let Self {
            vertices,
            normals,
            uvs,
            faces,
        } = self;

        if !normals.is_empty() && normals.len() != vertices.len() {
            return Err(MeshError::MismatchedNormals {
                normals: normals.len(),
                vertices: vertices.len(),
            });
        }
        if !uvs.is_empty() && uvs.len() != vertices.len() {
            return Err(MeshError::MismatchedUvs {
                uvs: uvs.len(),
                vertices: vertices.len(),
            });
        }

        let faces = faces
            .into_iter()
            .map(|indices| TrimeshFace {
                indices,
                aabb: BoundingBox::encompass_points(indices.map(|i| vertices[i])),
            })
            .collect::<Vec<_>>();
        let bvh = Bvh::new(&faces, opts);
        let aabb = BoundingBox::encompass_iter(faces.iter().map(|f| &f.aabb));

        debug!(
            target: MESH,
            vertices = vertices.len(),
            faces = faces.len(),
            smooth = !normals.is_empty(),
            "built trimesh"
        );

        Ok(TrimeshMesh {
            vertices,
            normals,
            uvs,
            faces,
            bvh,
            aabb,
        })
    }
}

// endregion Builder

// region Mesh

/// A single triangle of a [TrimeshMesh], referencing the vertices by index
#[derive(Clone, Debug, Getters, CopyGetters)]
pub struct TrimeshFace {
    #[get_copy = "pub"]
    indices: [usize; 3],
    #[get = "pub"]
    aabb: BoundingBox,
}

impl Bounded for TrimeshFace {
    fn bounding_box(&self) -> Option<&BoundingBox> { Some(&self.aabb) }
}

#[derive(Clone, Derivative, Getters)]
#[derivative(Debug)]
#[get = "pub"]
pub struct TrimeshMesh {
    #[derivative(Debug = "ignore")]
    vertices: Vec<Point3>,
    #[derivative(Debug = "ignore")]
    normals: Vec<Vector3>,
    #[derivative(Debug = "ignore")]
    uvs: Vec<Point2>,
    #[derivative(Debug = "ignore")]
    faces: Vec<TrimeshFace>,
    #[derivative(Debug = "ignore")]
    bvh: Bvh,
    aabb: BoundingBox,
}

impl TrimeshMesh {
    /// Möller–Trumbore intersection against one face
    fn intersect_face(&self, face: &TrimeshFace, ray: &Ray) -> Option<MeshIntersection> {
        let [ia, ib, ic] = face.indices;
        let [a, b, c] = [ia, ib, ic].map(|i| self.vertices[i]);
        let (pos, dir) = (ray.pos(), ray.dir());

        let e1 = b - a;
        let e2 = c - a;
        let p = Vector3::cross(dir, e2);
        let det = Vector3::dot(e1, p);
        // Parallel to the triangle's plane
        if det.abs() < RAY_EPSILON {
            return None;
        }
        let inv_det = 1. / det;

        let s = pos - a;
        let u = Vector3::dot(s, p) * inv_det;
        if !(0. ..=1.).contains(&u) {
            return None;
        }
        let q = Vector3::cross(s, e1);
        let v = Vector3::dot(dir, q) * inv_det;
        if v < 0. || u + v > 1. {
            return None;
        }
        let dist = Vector3::dot(e2, q) * inv_det;
        if dist <= RAY_EPSILON {
            return None;
        }

        let w = 1. - u - v;
        let interpolate_normal = || {
            let [na, nb, nc] = [ia, ib, ic].map(|i| self.normals[i]);
            (na * w + nb * u + nc * v).try_normalize()
        };
        let smooth = if self.normals.is_empty() { None } else { interpolate_normal() };
        // Opposing vertex normals can cancel out, in which case use the flat face normal
        let normal = smooth.unwrap_or_else(|| Vector3::cross(e1, e2).normalize());

        let uv = if self.uvs.is_empty() {
            Point2::new(u, v)
        } else {
            let [ta, tb, tc] = [ia, ib, ic].map(|i| self.uvs[i]);
            ta * w + tb * u + tc * v
        };

        Some(MeshIntersection { dist, normal, uv })
    }

    /// Intersects every face without using the tree
    pub fn brute_force_intersect(&self, ray: &Ray) -> Option<MeshIntersection> {
        self.faces
            .iter()
            .filter_map(|f| self.intersect_face(f, ray))
            .min_by(|a, b| Number::total_cmp(&a.dist, &b.dist))
    }
}

impl Mesh for TrimeshMesh {
    fn local_intersect(&self, ray: &Ray) -> Option<MeshIntersection> {
        let intersection = self
            .bvh
            .intersect(ray, |i| self.intersect_face(&self.faces[i], ray))?;
        validate::mesh_intersection(&intersection);
        Some(intersection)
    }

    fn local_aabb(&self) -> Option<BoundingBox> { Some(self.aabb.clone()) }
}

// endregion Mesh
