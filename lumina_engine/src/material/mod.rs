//! Surface materials, and the Phong shading model used to light them
//!
//! Every coefficient of a [Material] is a [MaterialParameter], so any of them may be texture mapped.

use crate::core::types::{Colour, Number};
use crate::light::Light;
use crate::scene::Scene;
use crate::shared::intersect::Intersection;
use crate::shared::math::reflect;
use crate::shared::ray::Ray;
use crate::shared::validate;

pub use self::param::MaterialParameter;

pub mod param;

/// Surface properties for the Phong model
///
/// All parameters default to zero (black), except [Self::index] which defaults to `1` (vacuum)
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Emissive
    pub ke: MaterialParameter,
    /// Ambient
    pub ka: MaterialParameter,
    /// Specular
    pub ks: MaterialParameter,
    /// Diffuse
    pub kd: MaterialParameter,
    /// Reflective
    pub kr: MaterialParameter,
    /// Transmissive. Also controls how much light passes through the surface when it casts a shadow
    pub kt: MaterialParameter,
    /// Specular exponent, read as an intensity
    pub shininess: MaterialParameter,
    /// Index of refraction, read as an intensity
    pub index: MaterialParameter,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ke: MaterialParameter::ZERO,
            ka: MaterialParameter::ZERO,
            ks: MaterialParameter::ZERO,
            kd: MaterialParameter::ZERO,
            kr: MaterialParameter::ZERO,
            kt: MaterialParameter::ZERO,
            shininess: MaterialParameter::ZERO,
            index: MaterialParameter::Constant(Colour::ONE),
        }
    }
}

// region Parameter lookup

impl Material {
    pub fn ke_at(&self, i: &Intersection) -> Colour { self.ke.value(i.uv) }
    pub fn ka_at(&self, i: &Intersection) -> Colour { self.ka.value(i.uv) }
    pub fn ks_at(&self, i: &Intersection) -> Colour { self.ks.value(i.uv) }
    pub fn kd_at(&self, i: &Intersection) -> Colour { self.kd.value(i.uv) }
    pub fn kr_at(&self, i: &Intersection) -> Colour { self.kr.value(i.uv) }
    pub fn kt_at(&self, i: &Intersection) -> Colour { self.kt.value(i.uv) }

    /// Texture values are in `[0, 1]`, so mapped shininess is rescaled into `[0, 128]`
    pub fn shininess_at(&self, i: &Intersection) -> Number {
        let s = self.shininess.intensity_value(i.uv);
        if self.shininess.is_mapped() {
            128. * s
        } else {
            s
        }
    }

    pub fn index_at(&self, i: &Intersection) -> Number { self.index.intensity_value(i.uv) }

    /// Whether any light can reflect off the surface
    pub fn reflective(&self) -> bool { self.kr != MaterialParameter::ZERO }
    /// Whether any light can pass through the surface
    pub fn transmissive(&self) -> bool { self.kt != MaterialParameter::ZERO }
}

// endregion Parameter lookup

// region Shading

impl Material {
    /// Applies the Phong model at the intersection, returning the colour of that point on the surface
    ///
    /// This is the local contribution only: emission, ambient, and the diffuse and specular terms
    /// of every light in the scene (attenuated by distance and shadows). Reflection and refraction
    /// are left to the caller.
    pub fn shade(&self, scene: &Scene, ray: &Ray, i: &Intersection) -> Colour {
        let p = ray.at(i.t);
        let n = i.normal.normalize_or_zero();
        let v = -ray.dir();

        let (kd, ks, shininess) = (self.kd_at(i), self.ks_at(i), self.shininess_at(i));
        let mut colour = self.ke_at(i) + self.ka_at(i) * scene.ambient();

        for light in scene.lights() {
            let l = light.direction(p).normalize_or_zero();
            let n_dot_l = Number::max(0., n.dot(l));
            let diffuse = kd * n_dot_l;

            let specular = if n_dot_l > 0. {
                let r = reflect(-l, n).normalize_or_zero();
                let r_dot_v = Number::max(0., r.dot(v));
                ks * r_dot_v.powf(shininess)
            } else {
                Colour::ZERO
            };

            let distance_attenuation = light.distance_attenuation(p);
            let shadow_attenuation = light.shadow_attenuation(scene, p);
            colour += shadow_attenuation * distance_attenuation * light.colour() * (diffuse + specular);
        }

        validate::vector3(colour);
        colour
    }
}

// endregion Shading
