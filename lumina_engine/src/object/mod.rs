//! Objects placed in a scene. An object combines a [mesh](crate::mesh) with a material and a world transform
//!
//! See [geometry::Geometry]

pub mod geometry;
pub mod transform;
