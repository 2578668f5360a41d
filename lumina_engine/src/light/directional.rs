use getset::CopyGetters;

use crate::core::types::{Colour, Number, Point3, Vector3};
use crate::light::{shadow, Light};
use crate::scene::Scene;

/// A light infinitely far away, shining uniformly along one direction (e.g. the sun)
#[derive(Copy, Clone, Debug, PartialEq, CopyGetters)]
#[get_copy = "pub"]
pub struct DirectionalLight {
    /// Normalised direction the light travels in
    orientation: Vector3,
    colour: Colour,
}

impl DirectionalLight {
    pub fn new(orientation: impl Into<Vector3>, colour: impl Into<Colour>) -> Self {
        Self {
            orientation: orientation.into().normalize_or_zero(),
            colour: colour.into(),
        }
    }
}

impl Light for DirectionalLight {
    fn direction(&self, _p: Point3) -> Vector3 { -self.orientation }

    /// No falloff, the light is infinitely far away
    fn distance_attenuation(&self, _p: Point3) -> Number { 1. }

    fn colour(&self) -> Colour { self.colour }

    fn shadow_attenuation(&self, scene: &Scene, p: Point3) -> Colour { shadow::walk(scene, p, self.direction(p), None) }
}
