//! The shadow ray walk shared by all lights
//!
//! A shadow ray is cast from the shaded point towards the light. Each surface it hits multiplies the
//! running attenuation by that surface's transmission, and the walk continues from just past the hit,
//! until the ray escapes, reaches the light, or hits something opaque.

use tracing::trace;

use crate::core::targets::LIGHT;
use crate::core::types::{Colour, Number, Point3, Vector3};
use crate::scene::Scene;
use crate::shared::ray::{Ray, RayKind};

/// Transmission coefficients shorter than this count as opaque
const OPAQUE_EPSILON: Number = 1e-6;

/// Walks a shadow ray from `p` along the (normalised) direction `dir`
///
/// For point lights `light_pos` is the light's position, and occluders at or beyond it are ignored.
/// Directional lights pass [None], and any occluder along the ray counts.
pub fn walk(scene: &Scene, p: Point3, dir: Vector3, light_pos: Option<Point3>) -> Colour {
    let opts = scene.opts().shadow;
    let cast = |from: Point3| Ray::new_kind(from + dir * opts.bias, dir, RayKind::Shadow);

    let mut attenuation = Colour::ONE;
    let mut remaining = light_pos.map(|light| light.distance(p));
    let mut ray = cast(p);
    let mut occluders = 0_usize;

    while let Some(hit) = scene.intersect(&ray) {
        if remaining.is_some_and(|dist| hit.t >= dist) {
            break;
        }

        let kt = hit.material.map_or(Colour::ZERO, |m| m.kt_at(&hit));
        if kt.length() < OPAQUE_EPSILON {
            return Colour::ZERO;
        }

        occluders += 1;
        if opts.max_occluders.is_some_and(|max| occluders > max) {
            trace!(target: LIGHT, occluders, "shadow ray hit occluder limit, treating as blocked");
            return Colour::ZERO;
        }

        attenuation *= kt;
        let hit_point = ray.at(hit.t);
        if let Some(light) = light_pos {
            remaining = Some(light.distance(hit_point));
        }
        ray = cast(hit_point);
    }

    attenuation
}
