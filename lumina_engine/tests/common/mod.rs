#![allow(dead_code)]

use lumina_engine::core::types::*;
use lumina_engine::material::Material;
use lumina_engine::mesh::MeshInstance;
use lumina_engine::object::geometry::Geometry;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub type Rng = rand::rngs::SmallRng;

static INIT_LOGGING: Once = Once::new();

/// Installs a log subscriber for the test binary, filtered by `RUST_LOG`
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A mesh placed with a uniform scale and a translation
pub fn placed(mesh: impl Into<MeshInstance>, material: Material, centre: Point3, scale: Number) -> Geometry {
    let transform = Transform3::from_scale_rotation_translation(Vector3::splat(scale), glam::DQuat::IDENTITY, centre);
    Geometry::new(mesh, material, transform)
}

/// Purely diffuse material, with no ambient, specular or transmission
pub fn diffuse(colour: Colour) -> Material {
    Material {
        kd: colour.into(),
        ..Default::default()
    }
}

/// Material that lets `kt` of the light through when it casts a shadow
pub fn transmissive(kt: Number) -> Material {
    Material {
        kt: kt.into(),
        ..Default::default()
    }
}
