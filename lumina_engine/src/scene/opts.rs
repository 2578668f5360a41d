use serde::{Deserialize, Serialize};

use crate::core::types::Number;

pub use crate::accel::bvh::BvhOpts;

/// Options for a [Scene](super::Scene)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneOpts {
    /// How the top-level tree over the scene's objects is built
    pub scene_bvh: BvhOpts,
    /// How the trees inside triangle meshes are built by [Scene::build_mesh()](super::Scene::build_mesh)
    pub mesh_bvh: BvhOpts,
    pub shadow: ShadowOpts,
}

impl Default for SceneOpts {
    fn default() -> Self {
        Self {
            scene_bvh: BvhOpts::SCENE,
            mesh_bvh: BvhOpts::MESH,
            shadow: ShadowOpts::default(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadowOpts {
    /// How far along the ray shadow rays start, and restart after passing through an occluder,
    /// to avoid hitting the surface they just left
    pub bias: Number,
    /// Upper limit on how many transmissive occluders a shadow ray may pass through.
    /// Rays that reach the limit count as fully blocked. [None] removes the limit
    pub max_occluders: Option<usize>,
}

impl Default for ShadowOpts {
    fn default() -> Self {
        Self {
            bias: 1e-4,
            max_occluders: Some(64),
        }
    }
}
