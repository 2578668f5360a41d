//! Light sources, used by [Material::shade()](crate::material::Material::shade)
//!
//! All lights describe themselves relative to a point being shaded: which way the light is, how much
//! its intensity has fallen off by the time it gets there, and how much of it is blocked by the scene.

use enum_dispatch::enum_dispatch;

use crate::core::types::{Colour, Number, Point3, Vector3};
use crate::scene::Scene;
use crate::shared::ComponentRequirements;
// noinspection ALL - Used by enum_dispatch macro
#[allow(unused_imports)]
use self::{directional::DirectionalLight, point::PointLight};

pub mod directional;
pub mod point;
pub mod shadow;

#[enum_dispatch]
pub trait Light: ComponentRequirements {
    /// Normalised direction from the point `p` towards the light
    fn direction(&self, p: Point3) -> Vector3;

    /// Falloff factor in `[0, 1]` for light arriving at `p`
    fn distance_attenuation(&self, p: Point3) -> Number;

    fn colour(&self) -> Colour;

    /// How much of the light reaches `p`, per channel. Opaque occluders block it entirely, while
    /// transmissive ones tint it by their transmission coefficient
    fn shadow_attenuation(&self, scene: &Scene, p: Point3) -> Colour;
}

#[enum_dispatch(Light)]
#[derive(Clone, Debug)]
pub enum LightInstance {
    DirectionalLight,
    PointLight,
}
