use getset::CopyGetters;

use crate::core::types::{Colour, Number, Point3, Vector3};
use crate::light::{shadow, Light};
use crate::scene::Scene;

/// A light radiating from a single point, with quadratic falloff
///
/// The intensity at distance `d` is scaled by `1 / (constant + linear*d + quadratic*d^2)`, capped at `1`
#[derive(Copy, Clone, Debug, PartialEq, CopyGetters)]
#[get_copy = "pub"]
pub struct PointLight {
    position: Point3,
    colour: Colour,
    constant: Number,
    linear: Number,
    quadratic: Number,
}

impl PointLight {
    pub fn new(
        position: impl Into<Point3>,
        colour: impl Into<Colour>,
        constant: Number,
        linear: Number,
        quadratic: Number,
    ) -> Self {
        Self {
            position: position.into(),
            colour: colour.into(),
            constant,
            linear,
            quadratic,
        }
    }

    /// A light with no falloff
    pub fn unattenuated(position: impl Into<Point3>, colour: impl Into<Colour>) -> Self {
        Self::new(position, colour, 1., 0., 0.)
    }
}

impl Light for PointLight {
    fn direction(&self, p: Point3) -> Vector3 { (self.position - p).normalize_or_zero() }

    fn distance_attenuation(&self, p: Point3) -> Number {
        let d = self.position.distance(p);
        let denominator = self.constant + (self.linear * d) + (self.quadratic * d * d);
        if denominator < 1e-7 {
            return 1.;
        }
        Number::min(1., 1. / denominator)
    }

    fn colour(&self) -> Colour { self.colour }

    fn shadow_attenuation(&self, scene: &Scene, p: Point3) -> Colour {
        shadow::walk(scene, p, self.direction(p), Some(self.position))
    }
}
