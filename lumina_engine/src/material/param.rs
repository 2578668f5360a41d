use std::sync::Arc;

use crate::core::types::{Colour, Number, Point2};
use crate::shared::math::luminance;
use crate::texture::TextureMap;

/// A single coefficient of a [Material](super::Material), either constant over the surface or read from a texture
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialParameter {
    Constant(Colour),
    Texture(Arc<TextureMap>),
}

impl MaterialParameter {
    pub const ZERO: Self = Self::Constant(Colour::ZERO);

    /// The value of the parameter at a point on the surface
    pub fn value(&self, uv: Point2) -> Colour {
        match self {
            Self::Constant(c) => *c,
            Self::Texture(tex) => tex.mapped_value(uv),
        }
    }

    /// Scalar version of [Self::value()], the luminance of the colour
    pub fn intensity_value(&self, uv: Point2) -> Number { luminance(self.value(uv)) }

    pub fn is_mapped(&self) -> bool { matches!(self, Self::Texture(_)) }
}

impl Default for MaterialParameter {
    fn default() -> Self { Self::ZERO }
}

impl From<Colour> for MaterialParameter {
    fn from(value: Colour) -> Self { Self::Constant(value) }
}

impl From<[Number; 3]> for MaterialParameter {
    fn from(value: [Number; 3]) -> Self { Self::Constant(value.into()) }
}

/// A greyscale constant. The luminance weights sum to one, so [MaterialParameter::intensity_value()] gives back `value`
impl From<Number> for MaterialParameter {
    fn from(value: Number) -> Self { Self::Constant(Colour::splat(value)) }
}

impl From<Arc<TextureMap>> for MaterialParameter {
    fn from(value: Arc<TextureMap>) -> Self { Self::Texture(value) }
}

impl From<TextureMap> for MaterialParameter {
    fn from(value: TextureMap) -> Self { Self::Texture(Arc::new(value)) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_ignores_uv() {
        let p = MaterialParameter::from(Colour::new(0.1, 0.2, 0.3));
        assert_eq!(p.value(Point2::ZERO), p.value(Point2::ONE));
        assert!(!p.is_mapped());
    }

    #[test]
    fn intensity_of_grey_is_grey() {
        assert_relative_eq!(MaterialParameter::from(0.6 as Number).intensity_value(Point2::ZERO), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn texture_is_sampled() {
        let tex = TextureMap::from_colours(2, 1, vec![Colour::ZERO, Colour::ONE]).unwrap();
        let p = MaterialParameter::from(tex);
        assert!(p.is_mapped());
        assert_relative_eq!(p.value(Point2::new(0.25, 0.)), Colour::splat(0.25));
        assert_relative_eq!(p.intensity_value(Point2::new(1., 0.)), 1., epsilon = 1e-12);
    }
}
